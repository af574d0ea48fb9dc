//! File-backed configuration store.

pub mod errors;
pub mod settings;

pub use errors::StorageError;
pub use settings::{JsonSettingsRepository, CONFIG_FILE_NAME};
