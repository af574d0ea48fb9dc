//! In-memory collaborators for orchestrator and service tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::categories::CategoryRule;
use crate::destination::{PageSummary, RowHandle, TableHandle, TableMetadata, TableStoreTrait};
use crate::errors::{Error, Result};
use crate::settings::{AutosyncSettings, SettingsRepositoryTrait};
use crate::sync::SyncWindow;
use crate::transactions::{Transaction, TransactionSourceTrait, TransactionStatus};

pub fn transaction(id: &str, description: &str, amount: Decimal) -> Transaction {
    Transaction {
        id: id.to_string(),
        description: Some(description.to_string()),
        merchant: None,
        memo: None,
        amount,
        date: None,
        account_name: Some("Current Account".to_string()),
        institution_name: None,
        status: TransactionStatus::Posted,
        avery_category: None,
    }
}

#[derive(Default)]
struct SettingsState {
    table_id: Option<String>,
    owner_identity: Option<String>,
    token: Option<String>,
    rules: Vec<CategoryRule>,
    autosync: Option<AutosyncSettings>,
}

#[derive(Default)]
pub struct InMemorySettings {
    state: Mutex<SettingsState>,
    rule_reads: AtomicUsize,
}

impl InMemorySettings {
    pub fn rule_reads(&self) -> usize {
        self.rule_reads.load(Ordering::SeqCst)
    }
}

impl SettingsRepositoryTrait for InMemorySettings {
    fn get_destination_table_id(&self) -> Result<Option<String>> {
        Ok(self.state.lock().unwrap().table_id.clone())
    }

    fn set_destination_table_id(&self, table_id: &str) -> Result<()> {
        self.state.lock().unwrap().table_id = Some(table_id.to_string());
        Ok(())
    }

    fn get_owner_identity(&self) -> Result<Option<String>> {
        Ok(self.state.lock().unwrap().owner_identity.clone())
    }

    fn set_owner_identity(&self, owner_identity: Option<&str>) -> Result<()> {
        self.state.lock().unwrap().owner_identity = owner_identity.map(str::to_string);
        Ok(())
    }

    fn get_destination_token(&self) -> Result<Option<String>> {
        Ok(self.state.lock().unwrap().token.clone())
    }

    fn set_destination_token(&self, token: Option<&str>) -> Result<()> {
        self.state.lock().unwrap().token = token.map(str::to_string);
        Ok(())
    }

    fn list_category_rules(&self) -> Result<Vec<CategoryRule>> {
        self.rule_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().rules.clone())
    }

    fn add_category_rule(&self, rule: CategoryRule) -> Result<Vec<CategoryRule>> {
        let mut state = self.state.lock().unwrap();
        state.rules.push(rule);
        Ok(state.rules.clone())
    }

    fn reset_category_rules(&self) -> Result<()> {
        self.state.lock().unwrap().rules.clear();
        Ok(())
    }

    fn get_autosync_settings(&self) -> Result<Option<AutosyncSettings>> {
        Ok(self.state.lock().unwrap().autosync.clone())
    }

    fn set_autosync_settings(&self, settings: &AutosyncSettings) -> Result<()> {
        self.state.lock().unwrap().autosync = Some(settings.clone());
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        *self.state.lock().unwrap() = SettingsState::default();
        Ok(())
    }
}

/// Source returning a fixed batch, or a scripted error.
pub struct StaticSource {
    transactions: Mutex<Vec<Transaction>>,
    error: Mutex<Option<Error>>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Mutex::new(transactions),
            error: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: Error) -> Self {
        let source = Self::new(Vec::new());
        *source.error.lock().unwrap() = Some(error);
        source
    }

    pub fn replace(&self, transactions: Vec<Transaction>) {
        *self.transactions.lock().unwrap() = transactions;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSourceTrait for StaticSource {
    async fn fetch_transactions(
        &self,
        _owner_identity: &str,
        _window: &SyncWindow,
    ) -> Result<Vec<Transaction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.transactions.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct StoreState {
    rows: Vec<(String, Transaction)>,
    created_tables: Vec<(String, String)>,
    category_options: Vec<String>,
    fail_get_table: bool,
    fail_writes_for: HashSet<String>,
    stale_lookups: bool,
}

/// Table store keeping rows in a vector, with failure injection.
#[derive(Default)]
pub struct InMemoryTableStore {
    state: Mutex<StoreState>,
    calls: AtomicUsize,
}

impl InMemoryTableStore {
    pub fn rows(&self) -> Vec<(String, Transaction)> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn seed_row(&self, row_id: &str, transaction: Transaction) {
        self.state
            .lock()
            .unwrap()
            .rows
            .push((row_id.to_string(), transaction));
    }

    pub fn created_tables(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().created_tables.clone()
    }

    pub fn set_category_options(&self, options: &[&str]) {
        self.state.lock().unwrap().category_options =
            options.iter().map(|o| o.to_string()).collect();
    }

    pub fn fail_get_table(&self) {
        self.state.lock().unwrap().fail_get_table = true;
    }

    pub fn fail_writes_for(&self, transaction_id: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_writes_for
            .insert(transaction_id.to_string());
    }

    /// Lookups never see rows, as with a lagging query index.
    pub fn stale_lookups(&self) {
        self.state.lock().unwrap().stale_lookups = true;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableStoreTrait for InMemoryTableStore {
    async fn create_table(&self, parent_page_id: &str, title: &str) -> Result<TableHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state
            .created_tables
            .push((parent_page_id.to_string(), title.to_string()));
        Ok(TableHandle {
            id: format!("table-{}", state.created_tables.len()),
            url: None,
        })
    }

    async fn find_row_by_transaction_id(
        &self,
        _table_id: &str,
        transaction_id: &str,
    ) -> Result<Option<RowHandle>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.stale_lookups {
            return Ok(None);
        }
        Ok(state
            .rows
            .iter()
            .find(|(_, tx)| tx.id == transaction_id)
            .map(|(row_id, _)| RowHandle { id: row_id.clone() }))
    }

    async fn create_row(&self, _table_id: &str, transaction: &Transaction) -> Result<RowHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.fail_writes_for.contains(&transaction.id) {
            return Err(Error::remote(400, "validation_error"));
        }
        let row_id = format!("row-{}", state.rows.len() + 1);
        state.rows.push((row_id.clone(), transaction.clone()));
        Ok(RowHandle { id: row_id })
    }

    async fn update_row(&self, row: &RowHandle, transaction: &Transaction) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.fail_writes_for.contains(&transaction.id) {
            return Err(Error::remote(400, "validation_error"));
        }
        match state.rows.iter_mut().find(|(row_id, _)| *row_id == row.id) {
            Some(entry) => {
                entry.1 = transaction.clone();
                Ok(())
            }
            None => Err(Error::remote(404, "object_not_found")),
        }
    }

    async fn get_table(&self, table_id: &str) -> Result<TableMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.fail_get_table {
            return Err(Error::remote(503, "service_unavailable"));
        }
        Ok(TableMetadata {
            id: table_id.to_string(),
            title: "Transactions".to_string(),
            url: None,
            category_options: state.category_options.clone(),
            account_options: Vec::new(),
        })
    }

    async fn search_pages(&self, _query: &str) -> Result<Vec<PageSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}
