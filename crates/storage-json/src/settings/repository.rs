use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, info};

use avery_sync_core::categories::CategoryRule;
use avery_sync_core::settings::{AutosyncSettings, SettingsRepositoryTrait};
use avery_sync_core::Result;

use super::model::ConfigFile;
use crate::errors::StorageError;

pub const CONFIG_FILE_NAME: &str = "config.json";

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Settings kept in a single JSON document under the data directory.
///
/// Every mutation is a read-modify-write under one lock. The new document is
/// written to a sibling temp file and renamed over the old one.
pub struct JsonSettingsRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonSettingsRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).map_err(StorageError::from)?;
        let path = data_dir.join(CONFIG_FILE_NAME);
        info!("Configuration stored at {}", path.display());
        Ok(JsonSettingsRepository {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_config(&self) -> std::result::Result<ConfigFile, StorageError> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_config(&self, config: &ConfigFile) -> std::result::Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(config)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote configuration to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<ConfigFile> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(self.read_config()?)
    }

    fn update<R>(&self, change: impl FnOnce(&mut ConfigFile) -> R) -> Result<R> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut config = self.read_config()?;
        let result = change(&mut config);
        self.write_config(&config)?;
        Ok(result)
    }
}

impl SettingsRepositoryTrait for JsonSettingsRepository {
    fn get_destination_table_id(&self) -> Result<Option<String>> {
        Ok(normalized(self.load()?.destination_table_id.as_deref()))
    }

    fn set_destination_table_id(&self, table_id: &str) -> Result<()> {
        self.update(|config| config.destination_table_id = normalized(Some(table_id)))
    }

    fn get_owner_identity(&self) -> Result<Option<String>> {
        Ok(normalized(self.load()?.owner_identity.as_deref()))
    }

    fn set_owner_identity(&self, owner_identity: Option<&str>) -> Result<()> {
        self.update(|config| config.owner_identity = normalized(owner_identity))
    }

    fn get_destination_token(&self) -> Result<Option<String>> {
        Ok(normalized(self.load()?.notion_access_token.as_deref()))
    }

    fn set_destination_token(&self, token: Option<&str>) -> Result<()> {
        self.update(|config| config.notion_access_token = normalized(token))
    }

    fn list_category_rules(&self) -> Result<Vec<CategoryRule>> {
        Ok(self.load()?.category_rules)
    }

    fn add_category_rule(&self, rule: CategoryRule) -> Result<Vec<CategoryRule>> {
        self.update(|config| {
            config.category_rules.push(rule);
            config.category_rules.clone()
        })
    }

    fn reset_category_rules(&self) -> Result<()> {
        self.update(|config| config.category_rules.clear())
    }

    fn get_autosync_settings(&self) -> Result<Option<AutosyncSettings>> {
        Ok(self.load()?.autosync)
    }

    fn set_autosync_settings(&self, settings: &AutosyncSettings) -> Result<()> {
        self.update(|config| config.autosync = Some(settings.clone()))
    }

    fn reset(&self) -> Result<()> {
        self.update(|config| *config = ConfigFile::default())
    }
}
