//! User-defined category rules and the rule engine.

mod categories_model;
mod categorizer;

pub use categories_model::*;
pub use categorizer::*;
