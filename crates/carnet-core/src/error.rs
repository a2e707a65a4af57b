//! Error types shared by every carnet crate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field name (camelCase) → human-readable message.
pub type FieldErrors = BTreeMap<String, String>;

/// Status reported when no HTTP response was received at all.
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// The uniform failure value produced by the API client.
///
/// Every failure, whether a transport error, a 4xx or a 5xx, is normalised
/// into this shape before it leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{status} {error}: {message}")]
pub struct ApiError {
  pub timestamp: DateTime<Utc>,
  pub status:    u16,
  pub error:     String,
  pub message:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub errors:    Option<FieldErrors>,
  /// Set when `message` was filled in locally because the service sent none.
  #[serde(skip)]
  pub generated: bool,
}

impl ApiError {
  pub fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      timestamp: Utc::now(),
      status,
      error: error.into(),
      message: message.into(),
      errors: None,
      generated: false,
    }
  }

  /// Mark `message` as locally generated rather than sent by the service.
  pub fn with_generated_message(mut self) -> Self {
    self.generated = true;
    self
  }

  /// The service's own message, if it sent a non-blank one.
  pub fn server_message(&self) -> Option<&str> {
    if self.generated || self.message.trim().is_empty() {
      None
    } else {
      Some(&self.message)
    }
  }

  pub fn with_errors(mut self, errors: FieldErrors) -> Self {
    self.errors = Some(errors);
    self
  }

  pub fn is_not_found(&self) -> bool { self.status == 404 }

  pub fn is_client_error(&self) -> bool { (400..500).contains(&self.status) }
}

/// Local validation failure for a [`ContactInput`](crate::ContactInput).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid contact: {}", summarize(.0))]
pub struct InvalidInput(pub FieldErrors);

fn summarize(errors: &FieldErrors) -> String {
  errors
    .iter()
    .map(|(field, msg)| format!("{field}: {msg}"))
    .collect::<Vec<_>>()
    .join(", ")
}
