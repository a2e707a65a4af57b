//! Client-side state container for the carnet contact client.
//!
//! [`ContactStore`] holds the contact collection, the form/selection flags,
//! the search filter and the transient notices. Every mutation of the
//! collection goes through an action that calls the injected
//! [`carnet_core::ContactApi`].

mod notice;
mod store;

pub mod error;

pub use error::{Action, ActionError};
pub use notice::Notice;
pub use store::{ContactStore, RemoteQuery, StoreConfig};
