//! Conversion of failed requests into [`ApiError`].

use carnet_core::{
  ApiError, FieldErrors,
  error::TRANSPORT_FAILURE_STATUS,
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// The parts of a server error body the client understands. Anything else in
/// the body is ignored; a body that is not JSON at all counts as empty.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
  error:   Option<String>,
  message: Option<String>,
  /// Kept loose so one odd entry does not discard the rest of the body.
  errors:  Option<Value>,
}

fn non_empty(s: Option<String>) -> Option<String> { s.filter(|s| !s.trim().is_empty()) }

/// String entries of an `errors` object; `None` if there are none.
fn field_errors(value: Option<Value>) -> Option<FieldErrors> {
  let Value::Object(map) = value? else {
    return None;
  };
  let errors: FieldErrors = map
    .into_iter()
    .filter_map(|(field, msg)| match msg {
      Value::String(msg) => Some((field, msg)),
      _ => None,
    })
    .collect();
  (!errors.is_empty()).then_some(errors)
}

/// Build an [`ApiError`] from a non-2xx response.
///
/// Only a `message` sent by the service counts as the service's message;
/// every other fallback is marked as generated.
pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> ApiError {
  let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
  let server_error = non_empty(parsed.error);

  let error = server_error
    .clone()
    .or_else(|| status.canonical_reason().map(str::to_owned))
    .unwrap_or_else(|| "Server error".to_owned());

  let api_error = match non_empty(parsed.message) {
    Some(message) => ApiError::new(status.as_u16(), error, message),
    None => {
      let message = server_error
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
      ApiError::new(status.as_u16(), error, message).with_generated_message()
    }
  };
  match field_errors(parsed.errors) {
    Some(errors) => api_error.with_errors(errors),
    None => api_error,
  }
}

/// Build an [`ApiError`] for a request that never produced a response.
pub(crate) fn from_transport(err: &reqwest::Error) -> ApiError {
  tracing::warn!(error = %err, "request did not reach the contact service");
  ApiError::new(
    TRANSPORT_FAILURE_STATUS,
    "Server error",
    "could not reach the contact service",
  )
  .with_generated_message()
}

/// Build an [`ApiError`] for a 2xx response whose body could not be decoded.
pub(crate) fn from_decode(status: StatusCode, err: &serde_json::Error) -> ApiError {
  tracing::warn!(error = %err, %status, "undecodable response body");
  ApiError::new(
    status.as_u16(),
    "Invalid response",
    format!("could not decode the response: {err}"),
  )
  .with_generated_message()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_body_is_used_verbatim() {
    let body = br#"{"timestamp":"2024-01-01T00:00:00","status":404,
      "error":"Not Found","message":"Contact 9 not found","path":"/api/contacts/9"}"#;
    let e = from_response(StatusCode::NOT_FOUND, body);
    assert_eq!(e.status, 404);
    assert_eq!(e.error, "Not Found");
    assert_eq!(e.message, "Contact 9 not found");
    assert_eq!(e.errors, None);
    assert_eq!(e.server_message(), Some("Contact 9 not found"));
  }

  #[test]
  fn error_only_body_doubles_as_message() {
    let body = br#"{"error":"a contact with this email already exists"}"#;
    let e = from_response(StatusCode::CONFLICT, body);
    assert_eq!(e.status, 409);
    assert_eq!(e.message, "a contact with this email already exists");
    assert_eq!(e.server_message(), None);
  }

  #[test]
  fn field_errors_are_kept() {
    let body = br#"{"error":"Validation failed","message":"invalid data",
      "errors":{"email":"must be a well-formed email address"}}"#;
    let e = from_response(StatusCode::BAD_REQUEST, body);
    let errors = e.errors.unwrap();
    assert_eq!(errors["email"], "must be a well-formed email address");
  }

  #[test]
  fn non_json_body_falls_back() {
    let e = from_response(StatusCode::BAD_GATEWAY, b"<html>upstream down</html>");
    assert_eq!(e.status, 502);
    assert_eq!(e.error, "Bad Gateway");
    assert_eq!(e.message, "request failed with status 502");
    assert_eq!(e.server_message(), None);
  }

  #[test]
  fn blank_fields_count_as_absent() {
    let e = from_response(StatusCode::INTERNAL_SERVER_ERROR, br#"{"message":"  ","errors":{}}"#);
    assert_eq!(e.message, "request failed with status 500");
    assert_eq!(e.errors, None);
  }

  #[test]
  fn non_string_field_errors_keep_the_rest_of_the_body() {
    let body = br#"{"error":"Bad Request","message":"invalid data",
      "errors":{"email":"must be a well-formed email address","age":18,"tags":["x"]}}"#;
    let e = from_response(StatusCode::BAD_REQUEST, body);
    assert_eq!(e.server_message(), Some("invalid data"));
    let errors = e.errors.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["email"], "must be a well-formed email address");
  }

  #[test]
  fn non_object_errors_are_dropped() {
    let body = br#"{"message":"invalid data","errors":["email"]}"#;
    let e = from_response(StatusCode::BAD_REQUEST, body);
    assert_eq!(e.message, "invalid data");
    assert_eq!(e.errors, None);
  }
}
