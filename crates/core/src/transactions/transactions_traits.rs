use async_trait::async_trait;

use super::Transaction;
use crate::errors::Result;
use crate::sync::SyncWindow;

/// Feed of transactions for an account owner.
#[async_trait]
pub trait TransactionSourceTrait: Send + Sync {
    /// Fetches every transaction for `owner_identity` within `window`.
    ///
    /// Omitted window bounds request the source's default window. Invalid
    /// credentials and non-rate-limit 4xx responses fail with
    /// [`crate::Error::SourceUnavailable`].
    async fn fetch_transactions(
        &self,
        owner_identity: &str,
        window: &SyncWindow,
    ) -> Result<Vec<Transaction>>;
}
