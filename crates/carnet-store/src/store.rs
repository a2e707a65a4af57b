//! [`ContactStore`] — contact collection, UI flags and notices.

use std::time::Duration;

use carnet_core::{ApiError, Contact, ContactApi, ContactId, ContactInput, search};
use tokio::{sync::watch, time::Instant};

use crate::{
  error::{Action, ActionError, Result},
  notice::Notice,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// How long notices stay up before they expire on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
  pub error_ttl:   Duration,
  pub success_ttl: Duration,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      error_ttl:   Duration::from_secs(5),
      success_ttl: Duration::from_secs(4),
    }
  }
}

/// Server-side lookups exposed by [`ContactStore::query_remote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteQuery {
  /// `GET /contacts/search?name=`
  Name(String),
  /// `GET /contacts/city?city=`
  City(String),
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Top-level client state. Construct once per session and pass by reference.
pub struct ContactStore<A> {
  api:          A,
  config:       StoreConfig,
  /// Authoritative collection, in the order of the last full load.
  contacts:     Vec<Contact>,
  /// Edit target, if any.
  selected:     Option<Contact>,
  form_open:    bool,
  /// Number of actions awaiting the API; `loading` is `in_flight > 0`.
  in_flight:    usize,
  /// Mirrors `loading` for observers that cannot borrow the store.
  loading:      watch::Sender<bool>,
  error:        Option<Notice>,
  success:      Option<Notice>,
  search_query: String,
}

impl<A: ContactApi> ContactStore<A> {
  /// Create an idle store with no contacts.
  pub fn new(api: A) -> Self { Self::with_config(api, StoreConfig::default()) }

  pub fn with_config(api: A, config: StoreConfig) -> Self {
    Self {
      api,
      config,
      contacts: Vec::new(),
      selected: None,
      form_open: false,
      in_flight: 0,
      loading: watch::channel(false).0,
      error: None,
      success: None,
      search_query: String::new(),
    }
  }

  // ── Read accessors ────────────────────────────────────────────────────────

  pub fn api(&self) -> &A { &self.api }

  pub fn contacts(&self) -> &[Contact] { &self.contacts }

  /// Contacts matching the current search query, in collection order.
  ///
  /// Always derived from `contacts` and `search_query`, so it cannot drift
  /// from either.
  pub fn filtered_contacts(&self) -> Vec<&Contact> {
    search::filter(&self.contacts, &self.search_query)
  }

  pub fn contact(&self, id: ContactId) -> Option<&Contact> {
    self.contacts.iter().find(|c| c.id == id)
  }

  pub fn selected_contact(&self) -> Option<&Contact> { self.selected.as_ref() }

  pub fn is_form_open(&self) -> bool { self.form_open }

  pub fn loading(&self) -> bool { self.in_flight > 0 }

  /// Follows [`loading`](Self::loading), including while an action holds
  /// the store across an API call.
  pub fn watch_loading(&self) -> watch::Receiver<bool> { self.loading.subscribe() }

  pub fn search_query(&self) -> &str { &self.search_query }

  pub fn error(&self) -> Option<&str> { self.error.as_ref().map(Notice::text) }

  pub fn success_message(&self) -> Option<&str> { self.success.as_ref().map(Notice::text) }

  // ── Pending/idle transitions ──────────────────────────────────────────────

  fn publish_loading(&self) {
    let busy = self.in_flight > 0;
    self.loading.send_if_modified(|loading| std::mem::replace(loading, busy) != busy);
  }

  fn begin(&mut self, action: Action) {
    self.in_flight += 1;
    self.publish_loading();
    self.error = None;
    tracing::debug!(?action, in_flight = self.in_flight, "action pending");
  }

  fn settle(&mut self) {
    self.in_flight = self.in_flight.saturating_sub(1);
    self.publish_loading();
  }

  fn fail(&mut self, action: Action, err: &ApiError) {
    self.settle();
    let message = err
      .server_message()
      .unwrap_or(action.failure_message())
      .to_owned();
    tracing::warn!(?action, status = err.status, %message, "action failed");
    self.set_error(Some(message));
  }

  /// Validate `input` locally. On failure the error notice is set and no
  /// request is made.
  fn check(&mut self, input: ContactInput) -> Result<ContactInput> {
    let input = input.normalized();
    if let Err(invalid) = input.validate() {
      tracing::debug!(%invalid, "rejected before submission");
      self.set_error(Some(invalid.to_string()));
      return Err(invalid.into());
    }
    Ok(input)
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  /// Replace the collection with the service's full list.
  ///
  /// Failures are recorded in the error notice and not returned.
  pub async fn load_contacts(&mut self) {
    self.begin(Action::Load);
    let result = self.api.list_contacts().await;
    match result {
      Ok(contacts) => {
        tracing::info!(count = contacts.len(), "contacts loaded");
        self.contacts = contacts;
        self.settle();
      }
      Err(e) => self.fail(Action::Load, &e),
    }
  }

  /// Create a contact and append it to the collection.
  pub async fn add_contact(&mut self, input: ContactInput) -> Result<Contact> {
    let input = self.check(input)?;
    self.begin(Action::Create);
    let result = self.api.create_contact(&input).await;
    match result {
      Ok(created) => {
        tracing::info!(id = created.id, "contact created");
        self.contacts.push(created.clone());
        self.settle();
        self.set_form_open(false);
        self.show_success_message(format!("{} was created", created.full_name()));
        Ok(created)
      }
      Err(e) => {
        self.fail(Action::Create, &e);
        Err(e.into())
      }
    }
  }

  /// Update contact `id` and replace it in the collection.
  pub async fn update_contact(&mut self, id: ContactId, input: ContactInput) -> Result<Contact> {
    let input = self.check(input)?;
    self.begin(Action::Update);
    let result = self.api.update_contact(id, &input).await;
    match result {
      Ok(updated) => {
        tracing::info!(id, "contact updated");
        if let Some(slot) = self.contacts.iter_mut().find(|c| c.id == id) {
          *slot = updated.clone();
        }
        self.settle();
        self.set_form_open(false);
        self.show_success_message(format!("{} was updated", updated.full_name()));
        Ok(updated)
      }
      Err(e) => {
        self.fail(Action::Update, &e);
        Err(e.into())
      }
    }
  }

  /// Delete contact `id` and remove it from the collection.
  pub async fn delete_contact(&mut self, id: ContactId) -> Result<()> {
    let name = self.contact(id).map(Contact::full_name);
    self.begin(Action::Delete);
    let result = self.api.delete_contact(id).await;
    match result {
      Ok(()) => {
        tracing::info!(id, "contact deleted");
        self.contacts.retain(|c| c.id != id);
        self.settle();
        let name = name.unwrap_or_else(|| format!("Contact {id}"));
        self.show_success_message(format!("{name} was deleted"));
        Ok(())
      }
      Err(e) => {
        self.fail(Action::Delete, &e);
        Err(e.into())
      }
    }
  }

  /// Run a server-side lookup. The result is returned to the caller; the
  /// collection and the client-side filter are left alone.
  pub async fn query_remote(&mut self, query: RemoteQuery) -> Result<Vec<Contact>> {
    self.begin(Action::RemoteQuery);
    let result = match &query {
      RemoteQuery::Name(name) => self.api.search_contacts(name).await,
      RemoteQuery::City(city) => self.api.contacts_by_city(city).await,
    };
    match result {
      Ok(found) => {
        tracing::debug!(?query, count = found.len(), "remote query");
        self.settle();
        Ok(found)
      }
      Err(e) => {
        self.fail(Action::RemoteQuery, &e);
        Err(e.into())
      }
    }
  }

  // ── Search ────────────────────────────────────────────────────────────────

  /// Set the client-side filter. Never touches the network.
  pub fn search_contacts(&mut self, query: &str) { self.search_query = query.to_owned(); }

  // ── Form lifecycle ────────────────────────────────────────────────────────

  pub fn set_selected_contact(&mut self, contact: Option<Contact>) { self.selected = contact; }

  /// Opening keeps the current selection; closing always clears it.
  pub fn set_form_open(&mut self, open: bool) {
    self.form_open = open;
    if !open {
      self.selected = None;
    }
  }

  /// Clear the selection and open the form for a new contact.
  pub fn open_for_create(&mut self) {
    self.selected = None;
    self.set_form_open(true);
  }

  /// Select loaded contact `id` and open the form on it.
  pub fn open_for_edit(&mut self, id: ContactId) -> Result<&Contact> {
    let contact = self.contact(id).cloned().ok_or(ActionError::UnknownContact(id))?;
    self.form_open = true;
    Ok(self.selected.insert(contact))
  }

  // ── Notices ───────────────────────────────────────────────────────────────

  /// Replace the error notice (restarting its deadline), or clear it.
  pub fn set_error(&mut self, message: Option<String>) {
    self.error = message.map(|m| Notice::new(m, self.config.error_ttl));
  }

  pub fn dismiss_error(&mut self) { self.error = None; }

  /// Replace the success notice, restarting its deadline.
  pub fn show_success_message(&mut self, message: impl Into<String>) {
    self.success = Some(Notice::new(message, self.config.success_ttl));
  }

  pub fn clear_success_message(&mut self) { self.success = None; }

  /// Drop every notice whose deadline is at or before `now`.
  /// Returns `true` if anything was cleared.
  pub fn expire_notices(&mut self, now: Instant) -> bool {
    let mut changed = false;
    for slot in [&mut self.error, &mut self.success] {
      if slot.as_ref().is_some_and(|n| n.is_expired(now)) {
        *slot = None;
        changed = true;
      }
    }
    changed
  }
}
