//! Destination table schema, store contract and provisioning.

mod destination_model;
mod destination_service;
mod destination_traits;

pub use destination_model::*;
pub use destination_service::*;
pub use destination_traits::*;
