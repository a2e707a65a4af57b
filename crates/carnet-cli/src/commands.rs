//! Subcommands and their dispatch onto store actions.

use std::io::Write;

use anyhow::{Context as _, anyhow};
use carnet_core::{ContactApi, ContactId, ContactInput};
use carnet_store::{ContactStore, RemoteQuery};
use clap::{Args, Subcommand};

use crate::display;

// ─── Arguments ────────────────────────────────────────────────────────────────

/// Fields for a new contact.
#[derive(Args, Debug, Clone)]
pub struct NewContact {
  #[arg(long)]
  pub first_name:  String,
  #[arg(long)]
  pub last_name:   String,
  #[arg(long)]
  pub email:       String,
  #[arg(long)]
  pub phone:       String,
  #[arg(long)]
  pub address:     Option<String>,
  #[arg(long)]
  pub city:        Option<String>,
  #[arg(long)]
  pub postal_code: Option<String>,
}

impl From<NewContact> for ContactInput {
  fn from(n: NewContact) -> Self {
    ContactInput {
      first_name:  n.first_name,
      last_name:   n.last_name,
      email:       n.email,
      phone:       n.phone,
      address:     n.address,
      city:        n.city,
      postal_code: n.postal_code,
    }
  }
}

/// Field overrides for `edit`. Unset flags keep the current value; an empty
/// string clears an optional field.
#[derive(Args, Debug, Clone, Default)]
pub struct Changes {
  #[arg(long)]
  pub first_name:  Option<String>,
  #[arg(long)]
  pub last_name:   Option<String>,
  #[arg(long)]
  pub email:       Option<String>,
  #[arg(long)]
  pub phone:       Option<String>,
  #[arg(long)]
  pub address:     Option<String>,
  #[arg(long)]
  pub city:        Option<String>,
  #[arg(long)]
  pub postal_code: Option<String>,
}

impl Changes {
  pub fn apply(self, mut input: ContactInput) -> ContactInput {
    if let Some(v) = self.first_name {
      input.first_name = v;
    }
    if let Some(v) = self.last_name {
      input.last_name = v;
    }
    if let Some(v) = self.email {
      input.email = v;
    }
    if let Some(v) = self.phone {
      input.phone = v;
    }
    input.address = self.address.or(input.address);
    input.city = self.city.or(input.city);
    input.postal_code = self.postal_code.or(input.postal_code);
    // Blank optionals are dropped by the store before submission.
    input
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
  /// List contacts, optionally narrowed by a filter.
  List {
    /// Match first name, last name, email (any case) or phone.
    #[arg(short, long)]
    query: Option<String>,
  },
  /// Show every field of one contact.
  Show { id: ContactId },
  /// Create a contact.
  Add(NewContact),
  /// Change fields of an existing contact.
  Edit {
    id:      ContactId,
    #[command(flatten)]
    changes: Changes,
  },
  /// Delete a contact.
  Delete { id: ContactId },
  /// Search by name; locally unless `--remote` is given.
  Search {
    name:   String,
    /// Ask the server instead of filtering the loaded list.
    #[arg(long)]
    remote: bool,
  },
  /// Ask the server for contacts in a city.
  City { city: String },
}

impl Command {
  /// Whether the command works on the loaded collection.
  pub fn needs_contacts(&self) -> bool {
    match self {
      Command::List { .. } | Command::Show { .. } | Command::Edit { .. } | Command::Delete { .. } => {
        true
      }
      Command::Search { remote, .. } => !remote,
      Command::Add(_) | Command::City { .. } => false,
    }
  }
}

/// Load the collection, turning an absorbed load failure into an error.
pub async fn load<A: ContactApi>(store: &mut ContactStore<A>) -> anyhow::Result<()> {
  store.load_contacts().await;
  match store.error() {
    Some(msg) => Err(anyhow!("loading contacts: {msg}")),
    None => Ok(()),
  }
}

/// Run `command` against `store`, writing results to `out`.
pub async fn run<A: ContactApi>(
  store: &mut ContactStore<A>,
  command: Command,
  out: &mut impl Write,
) -> anyhow::Result<()> {
  match command {
    Command::List { query } => {
      store.search_contacts(query.as_deref().unwrap_or_default());
      display::list(out, store)?;
    }

    Command::Show { id } => {
      let contact = store
        .contact(id)
        .ok_or_else(|| anyhow!("no contact with id {id}"))?;
      display::detail(out, contact)?;
    }

    Command::Add(fields) => {
      store.open_for_create();
      let created = store
        .add_contact(fields.into())
        .await
        .context("creating contact")?;
      display::detail(out, &created)?;
    }

    Command::Edit { id, changes } => {
      let current = store.open_for_edit(id)?;
      let input = changes.apply(ContactInput::from(current));
      let updated = store
        .update_contact(id, input)
        .await
        .with_context(|| format!("updating contact {id}"))?;
      display::detail(out, &updated)?;
    }

    Command::Delete { id } => {
      store
        .delete_contact(id)
        .await
        .with_context(|| format!("deleting contact {id}"))?;
    }

    Command::Search { name, remote: false } => {
      store.search_contacts(&name);
      display::list(out, store)?;
    }

    Command::Search { name, remote: true } => {
      let found = store
        .query_remote(RemoteQuery::Name(name))
        .await
        .context("searching contacts")?;
      display::contacts(out, &found.iter().collect::<Vec<_>>())?;
    }

    Command::City { city } => {
      let found = store
        .query_remote(RemoteQuery::City(city))
        .await
        .context("filtering by city")?;
      display::contacts(out, &found.iter().collect::<Vec<_>>())?;
    }
  }
  Ok(())
}
