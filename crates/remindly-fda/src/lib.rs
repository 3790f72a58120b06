//! openFDA drug-label search client.
//!
//! Thin typed wrapper over the public `api.fda.gov/drug/label.json`
//! endpoint, used by the medicine-search screen. Searches run up to three
//! query shapes of decreasing strictness and stop at the first that
//! returns results.
//!
//! The record store never calls this crate; the shell bridges a selected
//! search result into an add-medication input.

pub mod client;
pub mod types;

pub use client::*;
pub use types::*;
