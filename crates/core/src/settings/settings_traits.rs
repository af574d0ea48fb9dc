use super::AutosyncSettings;
use crate::categories::CategoryRule;
use crate::errors::Result;

/// Persistent configuration shared by the trigger, provisioning and sync.
///
/// The sync engine only reads from it; row writes go to the destination table.
pub trait SettingsRepositoryTrait: Send + Sync {
    fn get_destination_table_id(&self) -> Result<Option<String>>;

    fn set_destination_table_id(&self, table_id: &str) -> Result<()>;

    fn get_owner_identity(&self) -> Result<Option<String>>;

    fn set_owner_identity(&self, owner_identity: Option<&str>) -> Result<()>;

    /// Access token for the destination workspace.
    fn get_destination_token(&self) -> Result<Option<String>>;

    fn set_destination_token(&self, token: Option<&str>) -> Result<()>;

    /// Rules in the order they were added.
    fn list_category_rules(&self) -> Result<Vec<CategoryRule>>;

    /// Appends a rule and returns the full list.
    fn add_category_rule(&self, rule: CategoryRule) -> Result<Vec<CategoryRule>>;

    fn reset_category_rules(&self) -> Result<()>;

    fn get_autosync_settings(&self) -> Result<Option<AutosyncSettings>>;

    fn set_autosync_settings(&self, settings: &AutosyncSettings) -> Result<()>;

    /// Clears every stored value.
    fn reset(&self) -> Result<()>;
}
