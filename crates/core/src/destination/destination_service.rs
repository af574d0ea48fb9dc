use std::collections::HashSet;
use std::sync::Arc;

use log::{info, warn};

use super::{PageSummary, TableHandle, TableMetadata, TableStoreTrait, DEFAULT_TABLE_TITLE};
use crate::errors::{Error, Result};
use crate::settings::SettingsRepositoryTrait;

/// Provisioning and read-side operations on the destination table.
pub struct DestinationService {
    store: Arc<dyn TableStoreTrait>,
    settings: Arc<dyn SettingsRepositoryTrait>,
}

impl DestinationService {
    pub fn new(store: Arc<dyn TableStoreTrait>, settings: Arc<dyn SettingsRepositoryTrait>) -> Self {
        Self { store, settings }
    }

    /// Creates the transactions table under a parent page and records its id.
    pub async fn provision_table(
        &self,
        parent_page_id: &str,
        title: Option<&str>,
    ) -> Result<TableHandle> {
        let parent_page_id = parent_page_id.trim();
        if parent_page_id.is_empty() {
            return Err(Error::invalid_input("Parent page id is required"));
        }
        let title = title
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_TABLE_TITLE);

        let table = self.store.create_table(parent_page_id, title).await?;
        self.settings.set_destination_table_id(&table.id)?;
        info!(
            "Provisioned destination table {} under page {}",
            table.id, parent_page_id
        );
        Ok(table)
    }

    /// Metadata of the configured table, or `None` when none is configured.
    pub async fn table_info(&self) -> Result<Option<TableMetadata>> {
        match self.settings.get_destination_table_id()? {
            Some(table_id) => Ok(Some(self.store.get_table(&table_id).await?)),
            None => Ok(None),
        }
    }

    pub async fn search_pages(&self, query: &str) -> Result<Vec<PageSummary>> {
        self.store.search_pages(query.trim()).await
    }

    /// Category names already on the table followed by those named by rules.
    ///
    /// A failing table read is logged and skipped so rule categories are
    /// still returned.
    pub async fn known_categories(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        if let Some(table_id) = self.settings.get_destination_table_id()? {
            match self.store.get_table(&table_id).await {
                Ok(table) => names.extend(table.category_options),
                Err(err) => warn!("Could not read categories from table {}: {}", table_id, err),
            }
        }
        names.extend(Self::rule_categories(self.settings.as_ref())?);
        Ok(dedup_names(names))
    }

    /// Categories named by the configured rules, without touching the table.
    pub fn rule_categories(settings: &dyn SettingsRepositoryTrait) -> Result<Vec<String>> {
        Ok(dedup_names(
            settings
                .list_category_rules()?
                .into_iter()
                .map(|rule| rule.category),
        ))
    }
}

/// Trimmed, non-blank, first occurrence wins.
fn dedup_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect()
}
