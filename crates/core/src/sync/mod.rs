//! Sync orchestration: window, results and the reconciliation service.

mod sync_model;
mod sync_service;

pub use sync_model::*;
pub use sync_service::*;
