mod model;
mod repository;

pub use repository::{JsonSettingsRepository, CONFIG_FILE_NAME};
