use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use super::{SyncReport, SyncResult, SyncWindow};
use crate::categories::categorize;
use crate::destination::{RowHandle, TableStoreTrait, MAX_TRANSACTION_ID_CHARS};
use crate::errors::{Error, Result, RowOperation, RowWriteFailure};
use crate::settings::SettingsRepositoryTrait;
use crate::transactions::{Transaction, TransactionSourceTrait};

enum RowOutcome {
    Created,
    Updated,
}

/// Reconciles the transaction feed into the destination table.
///
/// Each transaction is resolved by id before deciding create or update, so
/// repeated runs over overlapping windows never duplicate rows. One run is
/// assumed in flight per table; callers that can race must serialise runs.
pub struct SyncService {
    source: Arc<dyn TransactionSourceTrait>,
    store: Arc<dyn TableStoreTrait>,
    settings: Arc<dyn SettingsRepositoryTrait>,
}

impl SyncService {
    pub fn new(
        source: Arc<dyn TransactionSourceTrait>,
        store: Arc<dyn TableStoreTrait>,
        settings: Arc<dyn SettingsRepositoryTrait>,
    ) -> Self {
        Self {
            source,
            store,
            settings,
        }
    }

    /// Runs a sync and returns only the success count.
    pub async fn run_sync(
        &self,
        table_id: Option<&str>,
        window: &SyncWindow,
        owner_identity: &str,
    ) -> Result<SyncResult> {
        Ok(self
            .run_sync_report(table_id, window, owner_identity)
            .await?
            .result())
    }

    /// Runs a sync and returns per-row detail.
    ///
    /// Errors are only returned for fatal conditions: an unset table, an
    /// invalid window, unreadable rules, or a failed transaction fetch. Row
    /// failures are collected in the report and the batch continues.
    pub async fn run_sync_report(
        &self,
        table_id: Option<&str>,
        window: &SyncWindow,
        owner_identity: &str,
    ) -> Result<SyncReport> {
        let started_at = Instant::now();
        let table_id = table_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::not_configured("Destination table not configured"))?;
        window.validate()?;

        // Read once so the whole batch sees the same rules.
        let rules = self.settings.list_category_rules()?;
        let transactions = self
            .source
            .fetch_transactions(owner_identity, window)
            .await?;
        info!(
            "Syncing {} transaction(s) for window {} into table {} ({} rule(s))",
            transactions.len(),
            window,
            table_id,
            rules.len()
        );

        let mut report = SyncReport::default();
        let mut written: HashMap<String, RowHandle> = HashMap::new();
        for transaction in transactions {
            let transaction = categorize(transaction, &rules);
            match self.upsert_row(table_id, &transaction, &mut written).await {
                Ok(RowOutcome::Created) => report.created += 1,
                Ok(RowOutcome::Updated) => report.updated += 1,
                Err(failure) => {
                    warn!("{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        info!(
            "Sync finished in {}ms: {} created, {} updated, {} failed",
            started_at.elapsed().as_millis(),
            report.created,
            report.updated,
            report.failures.len()
        );
        Ok(report)
    }

    async fn upsert_row(
        &self,
        table_id: &str,
        transaction: &Transaction,
        written: &mut HashMap<String, RowHandle>,
    ) -> std::result::Result<RowOutcome, RowWriteFailure> {
        let id = transaction.id.as_str();
        if id.trim().is_empty() {
            return Err(RowWriteFailure::new(
                id,
                RowOperation::Lookup,
                Error::invalid_input("Transaction has no id"),
            ));
        }
        // A cut-down key would never match on the next lookup.
        if id.chars().count() > MAX_TRANSACTION_ID_CHARS {
            return Err(RowWriteFailure::new(
                id,
                RowOperation::Lookup,
                Error::invalid_input(format!(
                    "Transaction id exceeds {} characters",
                    MAX_TRANSACTION_ID_CHARS
                )),
            ));
        }

        // Rows written earlier in this run are reused; the store's query
        // index may not reflect them yet.
        let existing = match written.get(id) {
            Some(row) => Some(row.clone()),
            None => self
                .store
                .find_row_by_transaction_id(table_id, id)
                .await
                .map_err(|err| RowWriteFailure::new(id, RowOperation::Lookup, err))?,
        };

        match existing {
            Some(row) => {
                debug!("Updating row {} for transaction {}", row.id, id);
                self.store
                    .update_row(&row, transaction)
                    .await
                    .map_err(|err| RowWriteFailure::new(id, RowOperation::Update, err))?;
                written.insert(id.to_string(), row);
                Ok(RowOutcome::Updated)
            }
            None => {
                debug!("Creating row for transaction {}", id);
                let row = self
                    .store
                    .create_row(table_id, transaction)
                    .await
                    .map_err(|err| RowWriteFailure::new(id, RowOperation::Create, err))?;
                written.insert(id.to_string(), row);
                Ok(RowOutcome::Created)
            }
        }
    }
}
