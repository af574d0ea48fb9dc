//! Source transactions and the feed contract.

mod transactions_model;
mod transactions_traits;

pub use transactions_model::*;
pub use transactions_traits::*;
