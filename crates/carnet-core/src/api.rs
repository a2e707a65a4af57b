//! The `ContactApi` trait.
//!
//! Implemented by `carnet-client` over HTTP. The store depends on this
//! abstraction, so tests can substitute an in-memory implementation.

use std::future::Future;

use crate::{
  contact::{Contact, ContactId, ContactInput},
  error::ApiError,
};

/// Remote contact service, one method per REST endpoint.
///
/// Every method reaches the network; implementations neither retry nor cache.
/// Failures are always returned as a normalised [`ApiError`].
pub trait ContactApi: Send + Sync {
  /// `GET /contacts`
  fn list_contacts(&self) -> impl Future<Output = Result<Vec<Contact>, ApiError>> + Send + '_;

  /// `GET /contacts/{id}`; 404 if absent.
  fn get_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Contact, ApiError>> + Send + '_;

  /// `POST /contacts`; returns the contact with its assigned id.
  fn create_contact<'a>(
    &'a self,
    input: &'a ContactInput,
  ) -> impl Future<Output = Result<Contact, ApiError>> + Send + 'a;

  /// `PUT /contacts/{id}`
  fn update_contact<'a>(
    &'a self,
    id: ContactId,
    input: &'a ContactInput,
  ) -> impl Future<Output = Result<Contact, ApiError>> + Send + 'a;

  /// `DELETE /contacts/{id}`
  fn delete_contact(&self, id: ContactId)
  -> impl Future<Output = Result<(), ApiError>> + Send + '_;

  /// `GET /contacts/search?name=`
  fn search_contacts<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<Contact>, ApiError>> + Send + 'a;

  /// `GET /contacts/city?city=`
  fn contacts_by_city<'a>(
    &'a self,
    city: &'a str,
  ) -> impl Future<Output = Result<Vec<Contact>, ApiError>> + Send + 'a;
}
