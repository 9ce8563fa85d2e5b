use livepage_controller::ControllerConfig;
use livepage_history::{FileStorage, HistoryConfig, HistoryStore, DEFAULT_CAPACITY, DEFAULT_KEY};
use livepage_protocol::SandboxPolicy;
use livepage_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "livepage.config.json";

/// Livepage configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub history: HistorySettings,

    /// Pointer and text-sync tuning inside the sandbox
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Capabilities granted to the preview sandbox
    #[serde(default)]
    pub sandbox: SandboxPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySettings {
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Directory holding the history file
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    #[serde(default = "default_key")]
    pub key: String,

    /// Byte limit for the storage directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<usize>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_storage_dir() -> String {
    ".livepage".to_string()
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            storage_dir: default_storage_dir(),
            key: default_key(),
            quota_bytes: None,
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_storage_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.history.storage_dir)
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            runtime: self.runtime.clone(),
            sandbox: self.sandbox,
        }
    }

    /// Open the file-backed history store
    pub fn open_history(&self, cwd: &str) -> anyhow::Result<HistoryStore> {
        let storage =
            FileStorage::new(self.get_storage_dir(cwd)).with_quota(self.history.quota_bytes);
        let config = HistoryConfig {
            capacity: self.history.capacity,
            key: self.history.key.clone(),
        };
        Ok(HistoryStore::open(storage, config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "history": { "capacity": 5, "storageDir": "data", "quotaBytes": 4096 },
            "runtime": { "dragThreshold": 8, "textSyncIntervalMs": 250 },
            "sandbox": { "allowForms": false }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.history.storage_dir, "data");
        assert_eq!(config.history.key, "livepage.history");
        assert_eq!(config.history.quota_bytes, Some(4096));
        assert_eq!(config.runtime.drag_threshold, 8.0);
        assert_eq!(config.runtime.text_sync_interval_ms, 250);
        assert_eq!(config.runtime.viewport_width, 1024.0);
        assert!(!config.sandbox.allow_forms);
        assert!(config.sandbox.allow_scripts);
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.history.capacity, 12);
        assert_eq!(config.history.storage_dir, ".livepage");
        assert_eq!(config.runtime.drag_threshold, 5.0);
        assert_eq!(config.sandbox, SandboxPolicy::default());
    }

    #[test]
    fn test_open_history_in_storage_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let store = Config::default().open_history(&cwd).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 12);
    }
}
