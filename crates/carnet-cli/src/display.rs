//! Plain-text rendering of store state.

use std::io::{self, Write};

use carnet_core::{Contact, ContactApi};
use carnet_store::ContactStore;

/// One row of a contact listing.
pub fn contact_row(c: &Contact) -> String {
  let mut row = format!(
    "{:>4}  {:<24} {:<28} {}",
    c.id,
    c.full_name(),
    c.email,
    c.phone
  );
  if let Some(city) = &c.city {
    row.push_str("  ");
    row.push_str(city);
  }
  row
}

/// `(label, value)` pairs for every field that is set.
pub fn contact_fields(c: &Contact) -> Vec<(&'static str, &str)> {
  let optional = [
    ("address", c.address.as_deref()),
    ("city", c.city.as_deref()),
    ("postal code", c.postal_code.as_deref()),
    ("created", c.created_at.as_deref()),
    ("updated", c.updated_at.as_deref()),
  ];
  let mut fields = vec![
    ("first name", c.first_name.as_str()),
    ("last name", c.last_name.as_str()),
    ("email", c.email.as_str()),
    ("phone", c.phone.as_str()),
  ];
  fields.extend(optional.into_iter().filter_map(|(label, v)| v.map(|v| (label, v))));
  fields
}

pub fn contacts(out: &mut impl Write, found: &[&Contact]) -> io::Result<()> {
  if found.is_empty() {
    return writeln!(out, "No contacts found.");
  }
  for c in found {
    writeln!(out, "{}", contact_row(c))?;
  }
  Ok(())
}

/// The filtered list, with a count header like `Contacts (2/5)`.
pub fn list<A: ContactApi>(out: &mut impl Write, store: &ContactStore<A>) -> io::Result<()> {
  let filtered = store.filtered_contacts();
  let total = store.contacts().len();
  if store.search_query().trim().is_empty() {
    writeln!(out, "Contacts ({total})")?;
  } else {
    writeln!(
      out,
      "Contacts ({}/{total}) matching {:?}",
      filtered.len(),
      store.search_query()
    )?;
  }
  contacts(out, &filtered)
}

pub fn detail(out: &mut impl Write, c: &Contact) -> io::Result<()> {
  writeln!(out, "#{} {}", c.id, c.full_name())?;
  for (label, value) in contact_fields(c) {
    writeln!(out, "  {label:<12} {value}")?;
  }
  Ok(())
}

/// Print whichever notices are currently up.
pub fn notices<A: ContactApi>(
  out: &mut impl Write,
  err: &mut impl Write,
  store: &ContactStore<A>,
) -> io::Result<()> {
  if let Some(msg) = store.success_message() {
    writeln!(out, "✓ {msg}")?;
  }
  if let Some(msg) = store.error() {
    writeln!(err, "✗ {msg}")?;
  }
  Ok(())
}
