use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use avery_sync_core::destination::{DestinationService, TableStoreTrait};
use avery_sync_core::settings::SettingsRepositoryTrait;
use avery_sync_core::sync::SyncService;
use avery_sync_core::transactions::TransactionSourceTrait;
use avery_sync_core::{Error, Result};
use avery_sync_remote::{AveryClient, NotionClient, Pacer};
use avery_sync_storage_json::JsonSettingsRepository;

use crate::config::Config;

/// Shared server state.
///
/// Remote clients are built per request because the destination token can
/// change at runtime, but each remote service keeps a single pacer for the
/// life of the process.
pub struct AppState {
    pub config: Config,
    pub settings: Arc<dyn SettingsRepositoryTrait>,
    avery_pacer: Arc<Pacer>,
    notion_pacer: Arc<Pacer>,
    sync_guard: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config, settings: Arc<dyn SettingsRepositoryTrait>) -> Self {
        let avery_pacer = Pacer::shared(config.pacing_interval);
        let notion_pacer = Pacer::shared(config.pacing_interval);
        Self {
            config,
            settings,
            avery_pacer,
            notion_pacer,
            sync_guard: Mutex::new(()),
        }
    }

    pub fn avery_client(&self) -> Result<AveryClient> {
        let auth_key = self
            .config
            .avery_auth_key
            .as_deref()
            .ok_or_else(|| Error::not_configured("AVERY_AUTH_KEY is not set"))?;
        AveryClient::new(
            &self.config.avery_base_url,
            auth_key,
            Arc::clone(&self.avery_pacer),
        )
    }

    pub fn transaction_source(&self) -> Result<Arc<dyn TransactionSourceTrait>> {
        Ok(Arc::new(self.avery_client()?))
    }

    /// Environment token first, then the one saved in settings.
    pub fn destination_token(&self) -> Result<Option<String>> {
        match &self.config.notion_access_token {
            Some(token) => Ok(Some(token.clone())),
            None => self.settings.get_destination_token(),
        }
    }

    pub fn table_store(&self) -> Result<Arc<dyn TableStoreTrait>> {
        let token = self
            .destination_token()?
            .ok_or_else(|| Error::not_configured("Notion access token unavailable"))?;
        let client = NotionClient::new(
            &self.config.notion_base_url,
            &token,
            Arc::clone(&self.notion_pacer),
        )?;
        Ok(Arc::new(client))
    }

    pub fn destination_service(&self) -> Result<DestinationService> {
        Ok(DestinationService::new(
            self.table_store()?,
            Arc::clone(&self.settings),
        ))
    }

    pub fn sync_service(&self) -> Result<SyncService> {
        Ok(SyncService::new(
            self.transaction_source()?,
            self.table_store()?,
            Arc::clone(&self.settings),
        ))
    }

    /// Held for the duration of a sync run so runs never overlap.
    pub async fn lock_sync(&self) -> MutexGuard<'_, ()> {
        self.sync_guard.lock().await
    }
}

pub fn build_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let settings = JsonSettingsRepository::new(&config.data_dir)?;
    Ok(Arc::new(AppState::new(config, Arc::new(settings))))
}
