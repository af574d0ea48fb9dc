//! Error taxonomy shared by the sync engine and its collaborators.

use std::fmt;

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the sync engine.
///
/// `NotConfigured`, `SourceUnavailable` and `Remote` are fatal to a run and
/// unwind to the caller. `RowWrite` is recovered inside a run and only
/// reaches callers through [`crate::sync::SyncReport::failures`].
#[derive(Debug, Error)]
pub enum Error {
    /// A precondition such as the destination table or an access token is unset.
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// The transaction feed rejected our credentials or the request.
    #[error("Transaction source unavailable: {0}")]
    SourceUnavailable(String),

    /// Non-2xx from a remote service after the retry ceiling was reached.
    #[error("Remote error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// A single destination row could not be looked up, created or updated.
    #[error(transparent)]
    RowWrite(#[from] RowWriteFailure),

    /// Network or protocol failure that carries no HTTP status.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration store failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured(message.into())
    }

    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable(message.into())
    }

    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// HTTP status if this error came from a remote response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::RowWrite(failure) => failure.cause.status_code(),
            _ => None,
        }
    }
}

/// Which step of the per-transaction upsert failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOperation {
    Lookup,
    Create,
    Update,
}

impl RowOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for RowOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to write one destination row. The cause is kept for reporting.
#[derive(Debug, Error)]
#[error("Row {operation} failed for transaction {transaction_id}: {cause}")]
pub struct RowWriteFailure {
    pub transaction_id: String,
    pub operation: RowOperation,
    #[source]
    pub cause: Box<Error>,
}

impl RowWriteFailure {
    pub fn new(transaction_id: impl Into<String>, operation: RowOperation, cause: Error) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            operation,
            cause: Box::new(cause),
        }
    }
}
