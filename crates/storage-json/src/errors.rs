use thiserror::Error;

/// Failures reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Configuration file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration lock poisoned")]
    LockPoisoned,
}

impl From<StorageError> for avery_sync_core::Error {
    fn from(err: StorageError) -> Self {
        avery_sync_core::Error::Storage(err.to_string())
    }
}
