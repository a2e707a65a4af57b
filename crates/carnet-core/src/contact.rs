//! Contact records and the payload used to create or update them.
//!
//! Field names are serialised in camelCase to match the remote service.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FieldErrors, InvalidInput};

/// Server-assigned contact identifier.
pub type ContactId = i64;

static EMAIL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?[\d\s-]{7,}$").expect("valid phone pattern"));

// ─── Contact ──────────────────────────────────────────────────────────────────

/// A single address-book record as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:          ContactId,
  pub first_name:  String,
  pub last_name:   String,
  pub email:       String,
  pub phone:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub postal_code: Option<String>,
  /// Opaque server timestamp; never parsed on the client.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at:  Option<String>,
}

impl Contact {
  /// `"First Last"`, used in notices and listings.
  pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }
}

// ─── ContactInput ─────────────────────────────────────────────────────────────

/// Client-authored payload for `POST /contacts` and `PUT /contacts/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
  pub first_name:  String,
  pub last_name:   String,
  pub email:       String,
  pub phone:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub postal_code: Option<String>,
}

impl ContactInput {
  /// Check the required fields and the email/phone patterns.
  ///
  /// Errors are keyed by the camelCase field name, the same keys the server
  /// uses in its `errors` map.
  pub fn validate(&self) -> Result<(), InvalidInput> {
    let mut errors = FieldErrors::new();

    if self.first_name.trim().is_empty() {
      errors.insert("firstName".into(), "first name is required".into());
    }
    if self.last_name.trim().is_empty() {
      errors.insert("lastName".into(), "last name is required".into());
    }

    if self.email.trim().is_empty() {
      errors.insert("email".into(), "email is required".into());
    } else if !EMAIL_RE.is_match(&self.email) {
      errors.insert("email".into(), "invalid email address".into());
    }

    let phone: String = self.phone.chars().filter(|c| !c.is_whitespace()).collect();
    if phone.is_empty() {
      errors.insert("phone".into(), "phone is required".into());
    } else if !PHONE_RE.is_match(&phone) {
      errors.insert("phone".into(), "invalid phone number (at least 7 digits)".into());
    }

    if errors.is_empty() { Ok(()) } else { Err(InvalidInput(errors)) }
  }

  /// Drop optional fields that are blank, so they are sent as absent.
  pub fn normalized(mut self) -> Self {
    for field in [&mut self.address, &mut self.city, &mut self.postal_code] {
      if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *field = None;
      }
    }
    self
  }
}

impl From<&Contact> for ContactInput {
  fn from(c: &Contact) -> Self {
    ContactInput {
      first_name:  c.first_name.clone(),
      last_name:   c.last_name.clone(),
      email:       c.email.clone(),
      phone:       c.phone.clone(),
      address:     c.address.clone(),
      city:        c.city.clone(),
      postal_code: c.postal_code.clone(),
    }
  }
}
