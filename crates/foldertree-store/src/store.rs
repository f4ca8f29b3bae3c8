//! Loading and saving folder trees through a key-value backend.

use foldertree_core::FolderTree;
use tracing::debug;

use crate::config::{DEFAULT_STORE_KEY, StoreConfig};
use crate::error::StoreError;
use crate::kv::{JsonFileStore, KeyValueStore};
use crate::snapshot::Snapshot;

/// Reads and writes a whole-tree snapshot under a single key.
#[derive(Debug, Clone)]
pub struct FolderStore<S> {
    backend: S,
    key: String,
    pretty: bool,
}

impl<S: KeyValueStore> FolderStore<S> {
    /// Wrap a backend, storing under [`DEFAULT_STORE_KEY`].
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_STORE_KEY)
    }

    /// Wrap a backend, storing under a custom key.
    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            pretty: false,
        }
    }

    /// Key the snapshot lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load the stored tree, `None` if nothing has been saved yet.
    pub fn load(&self) -> Result<Option<FolderTree>, StoreError> {
        let Some(json) = self.backend.get(&self.key)? else {
            debug!(key = %self.key, "no stored snapshot");
            return Ok(None);
        };
        let tree = Snapshot::from_json(&json)?.into_tree()?;
        debug!(key = %self.key, folders = tree.len(), "loaded snapshot");
        Ok(Some(tree))
    }

    /// Load the stored tree or start a fresh one.
    pub fn load_or_default(&self) -> Result<FolderTree, StoreError> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Replace the stored snapshot with the given tree.
    pub fn save(&mut self, tree: &FolderTree) -> Result<(), StoreError> {
        let json = Snapshot::capture(tree).to_json(self.pretty)?;
        self.backend.set(&self.key, json)?;
        debug!(key = %self.key, folders = tree.len(), "saved snapshot");
        Ok(())
    }

    /// Remove the stored snapshot.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove(&self.key)
    }
}

impl FolderStore<JsonFileStore> {
    /// Open the JSON file store described by a config.
    pub fn from_config(config: &StoreConfig) -> Self {
        let backend = JsonFileStore::new(&config.path).with_pretty(config.pretty);
        Self::with_key(backend, config.key.clone())
    }
}
