//! HTTP implementation of [`carnet_core::ContactApi`].
//!
//! Wraps [`reqwest`] and turns every failure, including transport errors and
//! undecodable bodies, into a [`carnet_core::ApiError`].

mod client;
mod normalize;

pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL};

#[cfg(test)]
mod tests;
