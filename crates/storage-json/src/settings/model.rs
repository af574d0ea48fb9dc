use serde::{Deserialize, Serialize};

use avery_sync_core::categories::CategoryRule;
use avery_sync_core::settings::AutosyncSettings;

/// On-disk layout of `config.json`. Unknown keys are dropped on rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notion_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_rules: Vec<CategoryRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autosync: Option<AutosyncSettings>,
}
