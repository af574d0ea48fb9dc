//! Process configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use avery_sync_core::settings::DEFAULT_TRAILING_DAYS;
use avery_sync_remote::{DEFAULT_AVERY_BASE_URL, DEFAULT_MIN_INTERVAL, DEFAULT_NOTION_BASE_URL};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub avery_base_url: String,
    /// Key sent in the `authkey` header to the transaction feed.
    pub avery_auth_key: Option<String>,
    pub notion_base_url: String,
    /// Overrides the token kept in the configuration file when set.
    pub notion_access_token: Option<String>,
    pub data_dir: PathBuf,
    pub pacing_interval: Duration,
    pub trailing_days: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let url = |key: &str, default: &str| {
            get(key)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };
        let pacing_interval = match get("AVERY_SYNC_PACING_MS") {
            Some(raw) => Duration::from_millis(raw.parse().with_context(|| {
                format!("AVERY_SYNC_PACING_MS must be milliseconds, got {:?}", raw)
            })?),
            None => DEFAULT_MIN_INTERVAL,
        };
        let trailing_days = match get("AVERY_SYNC_TRAILING_DAYS") {
            Some(raw) => raw.parse().with_context(|| {
                format!("AVERY_SYNC_TRAILING_DAYS must be a day count, got {:?}", raw)
            })?,
            None => DEFAULT_TRAILING_DAYS,
        };

        Ok(Self {
            port,
            avery_base_url: url("AVERY_BASE_URL", DEFAULT_AVERY_BASE_URL),
            avery_auth_key: get("AVERY_AUTH_KEY"),
            notion_base_url: url("NOTION_BASE_URL", DEFAULT_NOTION_BASE_URL),
            notion_access_token: get("NOTION_ACCESS_TOKEN"),
            data_dir: get("AVERY_SYNC_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            pacing_interval,
            trailing_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = config(&[("AVERY_AUTH_KEY", "  "), ("NOTION_BASE_URL", "")]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.avery_base_url, "https://app.averyapp.ai");
        assert_eq!(config.avery_auth_key, None);
        assert_eq!(config.notion_base_url, "https://api.notion.com/v1");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.pacing_interval, Duration::from_millis(350));
        assert_eq!(config.trailing_days, 1);
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = config(&[
            ("PORT", " 8080 "),
            ("AVERY_BASE_URL", "http://localhost:9000/"),
            ("AVERY_AUTH_KEY", "key-1"),
            ("AVERY_SYNC_PACING_MS", "50"),
            ("AVERY_SYNC_TRAILING_DAYS", "7"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.avery_base_url, "http://localhost:9000");
        assert_eq!(config.avery_auth_key.as_deref(), Some("key-1"));
        assert_eq!(config.pacing_interval, Duration::from_millis(50));
        assert_eq!(config.trailing_days, 7);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
