//! Client-side contact matching.
//!
//! A blank query matches everything. Otherwise a contact matches when the
//! lowercased query occurs in the lowercased first name, last name or email,
//! or when the raw query occurs in the phone number.

use crate::contact::Contact;

/// Whether `contact` matches `query`.
pub fn matches(contact: &Contact, query: &str) -> bool {
  if query.trim().is_empty() {
    return true;
  }
  let q = query.to_lowercase();
  contact.first_name.to_lowercase().contains(&q)
    || contact.last_name.to_lowercase().contains(&q)
    || contact.email.to_lowercase().contains(&q)
    || contact.phone.contains(query)
}

/// Contacts matching `query`, in collection order.
pub fn filter<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
  contacts.iter().filter(|c| matches(c, query)).collect()
}
