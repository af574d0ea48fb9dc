use serde::{Deserialize, Serialize};

/// Default trailing window, in days before today, for triggered syncs.
pub const DEFAULT_TRAILING_DAYS: u32 = 1;

/// Preferences consumed by the sync trigger. The scheduler itself lives outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosyncSettings {
    pub enabled: bool,
    #[serde(default, alias = "email")]
    pub owner_identity: Option<String>,
    #[serde(default = "default_trailing_days")]
    pub trailing_days: u32,
}

fn default_trailing_days() -> u32 {
    DEFAULT_TRAILING_DAYS
}

impl Default for AutosyncSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            owner_identity: None,
            trailing_days: DEFAULT_TRAILING_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_email_key_is_accepted() {
        let settings: AutosyncSettings =
            serde_json::from_str(r#"{"enabled":true,"email":"me@example.com"}"#).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.owner_identity.as_deref(), Some("me@example.com"));
        assert_eq!(settings.trailing_days, DEFAULT_TRAILING_DAYS);
    }
}
