//! Core types and trait definitions for the carnet contact client.
//!
//! This crate is free of HTTP and runtime dependencies. The client, store
//! and CLI crates all depend on it.

pub mod api;
pub mod contact;
pub mod error;
pub mod search;

pub use api::ContactApi;
pub use contact::{Contact, ContactId, ContactInput};
pub use error::{ApiError, FieldErrors, InvalidInput};
