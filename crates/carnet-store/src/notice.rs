//! Transient, auto-expiring messages.

use std::time::Duration;

use tokio::time::Instant;

/// A message with a deadline after which it is no longer shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  text:       String,
  expires_at: Instant,
}

impl Notice {
  /// A notice that expires `ttl` from now.
  pub fn new(text: impl Into<String>, ttl: Duration) -> Self {
    Self {
      text:       text.into(),
      expires_at: Instant::now() + ttl,
    }
  }

  pub fn text(&self) -> &str { &self.text }

  pub fn is_expired(&self, now: Instant) -> bool { now >= self.expires_at }
}
