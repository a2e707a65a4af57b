//! Integration tests for `ApiClient` against an in-process axum service.

use std::sync::{Arc, Mutex};

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::get,
};
use carnet_core::{Contact, ContactApi, ContactInput};
use carnet_store::ContactStore;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use crate::{ApiClient, ApiConfig};

// ─── In-memory service ───────────────────────────────────────────────────────

#[derive(Default)]
struct Db {
  contacts: Vec<Contact>,
  next_id:  i64,
}

type Shared = Arc<Mutex<Db>>;

fn to_contact(id: i64, input: ContactInput) -> Contact {
  Contact {
    id,
    first_name: input.first_name,
    last_name: input.last_name,
    email: input.email,
    phone: input.phone,
    address: input.address,
    city: input.city,
    postal_code: input.postal_code,
    created_at: Some("2024-05-01T12:00:00".into()),
    updated_at: Some("2024-05-01T12:00:00".into()),
  }
}

fn input(first: &str, last: &str, email: &str, city: Option<&str>) -> ContactInput {
  ContactInput {
    first_name: first.into(),
    last_name: last.into(),
    email: email.into(),
    phone: "0600000000".into(),
    city: city.map(Into::into),
    ..Default::default()
  }
}

fn not_found(id: i64) -> Response {
  let body = json!({
    "timestamp": "2024-05-01T12:00:00",
    "status":    404,
    "error":     "Not Found",
    "message":   format!("Contact not found with id: {id}"),
    "path":      format!("/api/contacts/{id}"),
  });
  (StatusCode::NOT_FOUND, Json(body)).into_response()
}

fn rejected(body: &ContactInput, db: &Db, own_id: Option<i64>) -> Option<Response> {
  if !body.email.contains('@') {
    let body = json!({
      "timestamp": "2024-05-01T12:00:00",
      "status":    400,
      "error":     "Validation failed",
      "message":   "The submitted data is invalid",
      "errors":    { "email": "must be a well-formed email address" },
    });
    return Some((StatusCode::BAD_REQUEST, Json(body)).into_response());
  }
  if db
    .contacts
    .iter()
    .any(|c| c.email == body.email && Some(c.id) != own_id)
  {
    let body = json!({ "error": "A contact with this email already exists" });
    return Some((StatusCode::CONFLICT, Json(body)).into_response());
  }
  None
}

async fn list(State(db): State<Shared>) -> Json<Vec<Contact>> {
  Json(db.lock().unwrap().contacts.clone())
}

async fn create(State(db): State<Shared>, Json(body): Json<ContactInput>) -> Response {
  let mut db = db.lock().unwrap();
  if let Some(resp) = rejected(&body, &db, None) {
    return resp;
  }
  db.next_id += 1;
  let contact = to_contact(db.next_id, body);
  db.contacts.push(contact.clone());
  (StatusCode::CREATED, Json(contact)).into_response()
}

async fn get_one(State(db): State<Shared>, Path(id): Path<i64>) -> Response {
  let db = db.lock().unwrap();
  match db.contacts.iter().find(|c| c.id == id) {
    Some(c) => Json(c.clone()).into_response(),
    None => not_found(id),
  }
}

async fn update(
  State(db): State<Shared>,
  Path(id): Path<i64>,
  Json(body): Json<ContactInput>,
) -> Response {
  let mut db = db.lock().unwrap();
  let Some(pos) = db.contacts.iter().position(|c| c.id == id) else {
    return not_found(id);
  };
  if let Some(resp) = rejected(&body, &db, Some(id)) {
    return resp;
  }
  db.contacts[pos] = to_contact(id, body);
  Json(db.contacts[pos].clone()).into_response()
}

async fn delete(State(db): State<Shared>, Path(id): Path<i64>) -> Response {
  let mut db = db.lock().unwrap();
  let Some(pos) = db.contacts.iter().position(|c| c.id == id) else {
    return not_found(id);
  };
  db.contacts.remove(pos);
  Json(json!({ "message": "Contact deleted" })).into_response()
}

#[derive(Deserialize)]
struct NameParams {
  name: String,
}

async fn search(State(db): State<Shared>, Query(p): Query<NameParams>) -> Json<Vec<Contact>> {
  let q = p.name.to_lowercase();
  let db = db.lock().unwrap();
  Json(
    db.contacts
      .iter()
      .filter(|c| {
        c.first_name.to_lowercase().contains(&q) || c.last_name.to_lowercase().contains(&q)
      })
      .cloned()
      .collect(),
  )
}

#[derive(Deserialize)]
struct CityParams {
  city: String,
}

async fn by_city(State(db): State<Shared>, Query(p): Query<CityParams>) -> Json<Vec<Contact>> {
  let db = db.lock().unwrap();
  Json(
    db.contacts
      .iter()
      .filter(|c| c.city.as_deref() == Some(p.city.as_str()))
      .cloned()
      .collect(),
  )
}

async fn serve(router: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
  format!("http://{addr}/api")
}

fn client(base_url: String) -> ApiClient {
  ApiClient::new(ApiConfig { base_url, timeout: None }).unwrap()
}

/// A base URL on a port nothing listens on.
async fn unreachable_url() -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);
  format!("http://{addr}/api")
}

/// A running service seeded with two contacts, and a client pointed at it.
async fn service() -> (ApiClient, Shared) {
  let db = Shared::default();
  {
    let mut guard = db.lock().unwrap();
    guard.contacts = vec![
      to_contact(1, input("Jean", "Dupont", "jean@x.com", Some("Paris"))),
      to_contact(2, input("Marie", "Curie", "marie@lab.fr", Some("Lyon"))),
    ];
    guard.next_id = 2;
  }

  let api = Router::new()
    .route("/contacts", get(list).post(create))
    .route("/contacts/search", get(search))
    .route("/contacts/city", get(by_city))
    .route("/contacts/{id}", get(get_one).put(update).delete(delete))
    .with_state(db.clone());

  let base = serve(Router::new().nest("/api", api)).await;
  (client(base), db)
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_contacts_in_server_order() {
  let (api, _) = service().await;
  let all = api.list_contacts().await.unwrap();
  let ids: Vec<i64> = all.iter().map(|c| c.id).collect();
  assert_eq!(ids, [1, 2]);
  assert_eq!(all[0].created_at.as_deref(), Some("2024-05-01T12:00:00"));
}

#[tokio::test]
async fn get_contact_by_id() {
  let (api, _) = service().await;
  let c = api.get_contact(2).await.unwrap();
  assert_eq!(c.full_name(), "Marie Curie");
}

#[tokio::test]
async fn get_missing_contact_is_404() {
  let (api, _) = service().await;
  let err = api.get_contact(99).await.unwrap_err();
  assert!(err.is_not_found());
  assert_eq!(err.error, "Not Found");
  assert_eq!(err.message, "Contact not found with id: 99");
}

#[tokio::test]
async fn search_by_name_uses_query_string() {
  let (api, _) = service().await;
  let found = api.search_contacts("dup").await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].id, 1);
}

#[tokio::test]
async fn filter_by_city() {
  let (api, _) = service().await;
  let found = api.contacts_by_city("Lyon").await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].id, 2);
  assert!(api.contacts_by_city("Nantes").await.unwrap().is_empty());
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_assigned_id() {
  let (api, db) = service().await;
  let created = api
    .create_contact(&input("Paul", "Martin", "paul@x.com", None))
    .await
    .unwrap();
  assert_eq!(created.id, 3);
  assert_eq!(created.first_name, "Paul");
  assert_eq!(db.lock().unwrap().contacts.len(), 3);
}

#[tokio::test]
async fn create_rejection_carries_field_errors() {
  let (api, db) = service().await;
  let err = api
    .create_contact(&input("Paul", "Martin", "not-an-email", None))
    .await
    .unwrap_err();
  assert_eq!(err.status, 400);
  assert_eq!(err.message, "The submitted data is invalid");
  let errors = err.errors.expect("field errors");
  assert_eq!(errors["email"], "must be a well-formed email address");
  assert_eq!(db.lock().unwrap().contacts.len(), 2);
}

#[tokio::test]
async fn create_conflict_uses_error_as_message() {
  let (api, _) = service().await;
  let err = api
    .create_contact(&input("Jean", "Bis", "jean@x.com", None))
    .await
    .unwrap_err();
  assert_eq!(err.status, 409);
  assert_eq!(err.message, "A contact with this email already exists");
  assert!(err.errors.is_none());
}

#[tokio::test]
async fn update_replaces_contact() {
  let (api, db) = service().await;
  let updated = api
    .update_contact(1, &input("Jean", "Dupond", "jean@x.com", Some("Nice")))
    .await
    .unwrap();
  assert_eq!(updated.id, 1);
  assert_eq!(updated.last_name, "Dupond");
  assert_eq!(db.lock().unwrap().contacts[0].city.as_deref(), Some("Nice"));
}

#[tokio::test]
async fn update_missing_contact_is_404() {
  let (api, _) = service().await;
  let err = api
    .update_contact(42, &input("A", "B", "a@b.co", None))
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_removes_contact() {
  let (api, db) = service().await;
  api.delete_contact(1).await.unwrap();
  let left: Vec<i64> = db.lock().unwrap().contacts.iter().map(|c| c.id).collect();
  assert_eq!(left, [2]);
}

#[tokio::test]
async fn delete_missing_contact_is_404() {
  let (api, _) = service().await;
  let err = api.delete_contact(7).await.unwrap_err();
  assert_eq!(err.status, 404);
}

// ─── Degraded responses ──────────────────────────────────────────────────────

#[tokio::test]
async fn plain_text_error_body_falls_back_to_generic_message() {
  let router = Router::new().route(
    "/api/contacts",
    get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
  );
  let api = client(serve(router).await);
  let err = api.list_contacts().await.unwrap_err();
  assert_eq!(err.status, 503);
  assert_eq!(err.error, "Service Unavailable");
  assert_eq!(err.message, "request failed with status 503");
  assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn undecodable_success_body_is_normalised() {
  let router = Router::new().route("/api/contacts", get(|| async { "[{not json" }));
  let api = client(serve(router).await);
  let err = api.list_contacts().await.unwrap_err();
  assert_eq!(err.status, 200);
  assert_eq!(err.error, "Invalid response");
}

#[tokio::test]
async fn unreachable_service_is_a_500() {
  let api = client(unreachable_url().await);
  let err = api.list_contacts().await.unwrap_err();
  assert_eq!(err.status, 500);
  assert_eq!(err.message, "could not reach the contact service");
  assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn base_url_trailing_slash_is_ignored() {
  let (api, _) = service().await;
  let api = client(format!("{}/", api.base_url()));
  assert_eq!(api.list_contacts().await.unwrap().len(), 2);
}

// ─── Store notices ───────────────────────────────────────────────────────────

#[tokio::test]
async fn store_shows_action_default_when_service_is_unreachable() {
  let mut store = ContactStore::new(client(unreachable_url().await));
  store.load_contacts().await;
  assert_eq!(store.error(), Some("Failed to load contacts"));
  assert!(!store.loading());
}

#[tokio::test]
async fn store_shows_action_default_for_plain_text_error() {
  let router = Router::new().route(
    "/api/contacts",
    get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
  );
  let mut store = ContactStore::new(client(serve(router).await));
  store.load_contacts().await;
  assert_eq!(store.error(), Some("Failed to load contacts"));
}

#[tokio::test]
async fn store_shows_server_message_when_present() {
  let (api, _) = service().await;
  let mut store = ContactStore::new(api);
  store.load_contacts().await;

  let err = store
    .update_contact(99, input("No", "Body", "no@x.com", None))
    .await
    .unwrap_err();
  assert!(matches!(err, carnet_store::ActionError::Api(ref e) if e.is_not_found()));
  assert_eq!(store.error(), Some("Contact not found with id: 99"));
}
