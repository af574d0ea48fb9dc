//! Domain core of the transaction-to-table sync engine.
//!
//! This crate holds the models, the category rule engine, the sync
//! orchestrator and the collaborator traits. Concrete HTTP adapters live in
//! `avery-sync-remote`; the configuration store in `avery-sync-storage-json`.

pub mod categories;
pub mod destination;
pub mod errors;
pub mod settings;
pub mod sync;
pub mod transactions;

#[cfg(test)]
mod test_support;

pub use errors::{Error, Result};
