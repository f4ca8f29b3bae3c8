//! Store configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Key the folder snapshot is stored under.
pub const DEFAULT_STORE_KEY: &str = "foldertree.folders";

/// Configuration for the on-disk store.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct StoreConfig {
    /// JSON file holding the key-value map.
    #[builder(default = "default_store_path()")]
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Key the snapshot is stored under.
    #[builder(default = "DEFAULT_STORE_KEY.to_string()")]
    #[serde(default = "default_key")]
    pub key: String,

    /// Pretty-print the JSON file.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Save after every successful mutation.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub autosave: bool,
}

fn default_true() -> bool {
    true
}

fn default_key() -> String {
    DEFAULT_STORE_KEY.to_string()
}

/// `<data dir>/foldertree/store.json`, or `./foldertree/store.json` when the
/// platform has no data directory.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("foldertree")
        .join("store.json")
}

impl StoreConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.path {
            if path.as_os_str().is_empty() {
                return Err("Store path cannot be empty".to_string());
            }
        }
        if let Some(ref key) = self.key {
            if key.trim().is_empty() {
                return Err("Store key cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl StoreConfig {
    /// Create a new store config builder.
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Create a config for a store file with default settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: default_key(),
            pretty: true,
            autosave: true,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(default_store_path())
    }
}
