//! Async HTTP client wrapping the contact service's JSON API.

use std::time::Duration;

use carnet_core::{ApiError, Contact, ContactApi, ContactId, ContactInput};
use reqwest::{
  Client, RequestBuilder, Response,
  header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;

use crate::normalize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Connection settings for the contact service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Base URL, including any path prefix (e.g. `http://host:8080/api`).
  pub base_url: String,
  /// Per-request timeout. `None` leaves failure detection to the transport.
  pub timeout:  Option<Duration>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_owned(),
      timeout:  None,
    }
  }
}

/// Async HTTP client for the contact REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone, Debug)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> reqwest::Result<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut builder = Client::builder().default_headers(headers);
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    Ok(Self { client: builder.build()?, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Send `req`, returning the response only if its status is 2xx.
  async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
    let resp = req.send().await.map_err(|e| normalize::from_transport(&e))?;
    let status = resp.status();
    tracing::debug!(url = %resp.url(), %status, "response");

    if status.is_success() {
      return Ok(resp);
    }
    // An unreadable body is treated like an absent one.
    let body = resp.bytes().await.unwrap_or_default();
    let err = normalize::from_response(status, &body);
    tracing::warn!(status = err.status, message = %err.message, "request rejected");
    Err(err)
  }

  async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
    let resp = self.send(req).await?;
    let status = resp.status();
    let body = resp.bytes().await.map_err(|e| normalize::from_transport(&e))?;
    serde_json::from_slice(&body).map_err(|e| normalize::from_decode(status, &e))
  }
}

impl ContactApi for ApiClient {
  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
    self.json(self.client.get(self.url("/contacts"))).await
  }

  async fn get_contact(&self, id: ContactId) -> Result<Contact, ApiError> {
    self.json(self.client.get(self.url(&format!("/contacts/{id}")))).await
  }

  async fn search_contacts(&self, name: &str) -> Result<Vec<Contact>, ApiError> {
    self
      .json(self.client.get(self.url("/contacts/search")).query(&[("name", name)]))
      .await
  }

  async fn contacts_by_city(&self, city: &str) -> Result<Vec<Contact>, ApiError> {
    self
      .json(self.client.get(self.url("/contacts/city")).query(&[("city", city)]))
      .await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_contact(&self, input: &ContactInput) -> Result<Contact, ApiError> {
    self
      .json(self.client.post(self.url("/contacts")).json(input))
      .await
  }

  async fn update_contact(
    &self,
    id: ContactId,
    input: &ContactInput,
  ) -> Result<Contact, ApiError> {
    self
      .json(self.client.put(self.url(&format!("/contacts/{id}"))).json(input))
      .await
  }

  async fn delete_contact(&self, id: ContactId) -> Result<(), ApiError> {
    // The service may answer with a `{message}` body; it carries nothing we use.
    self
      .send(self.client.delete(self.url(&format!("/contacts/{id}"))))
      .await
      .map(drop)
  }
}
