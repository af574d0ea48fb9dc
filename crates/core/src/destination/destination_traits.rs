use async_trait::async_trait;

use super::{PageSummary, RowHandle, TableHandle, TableMetadata};
use crate::errors::Result;
use crate::transactions::Transaction;

/// Tabular store holding one row per source transaction.
///
/// Every listing or search call loops over continuation cursors until the
/// store stops returning one.
#[async_trait]
pub trait TableStoreTrait: Send + Sync {
    /// Creates the transactions table under `parent_page_id` with the fixed schema.
    async fn create_table(&self, parent_page_id: &str, title: &str) -> Result<TableHandle>;

    /// Exact match on the Transaction ID column. Unrelated rows are ignored.
    async fn find_row_by_transaction_id(
        &self,
        table_id: &str,
        transaction_id: &str,
    ) -> Result<Option<RowHandle>>;

    async fn create_row(&self, table_id: &str, transaction: &Transaction) -> Result<RowHandle>;

    async fn update_row(&self, row: &RowHandle, transaction: &Transaction) -> Result<()>;

    async fn get_table(&self, table_id: &str) -> Result<TableMetadata>;

    /// Pages visible to the integration, for choosing a provisioning parent.
    async fn search_pages(&self, query: &str) -> Result<Vec<PageSummary>>;
}
