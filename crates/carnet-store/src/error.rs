//! Error type for `carnet-store`.

use carnet_core::{ApiError, ContactId, InvalidInput};
use thiserror::Error;

/// A store action, used to pick the fallback failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Load,
  Create,
  Update,
  Delete,
  RemoteQuery,
}

impl Action {
  /// Shown when the failure itself carries no usable message.
  pub fn failure_message(self) -> &'static str {
    match self {
      Action::Load => "Failed to load contacts",
      Action::Create => "Failed to create the contact",
      Action::Update => "Failed to update the contact",
      Action::Delete => "Failed to delete the contact",
      Action::RemoteQuery => "Contact search failed",
    }
  }
}

/// Failure re-raised to the caller of a store action after state is updated.
#[derive(Debug, Error)]
pub enum ActionError {
  /// The input failed local validation; no request was sent.
  #[error(transparent)]
  Invalid(#[from] InvalidInput),

  #[error(transparent)]
  Api(#[from] ApiError),

  #[error("no loaded contact with id {0}")]
  UnknownContact(ContactId),
}

pub type Result<T, E = ActionError> = std::result::Result<T, E>;
