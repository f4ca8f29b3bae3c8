//! Snapshot persistence for foldertree.
//!
//! The whole folder tree is serialized as one versioned JSON snapshot and
//! written under a fixed key in a flat key-value store:
//!
//! ```rust,ignore
//! use foldertree_store::{FolderStore, JsonFileStore};
//!
//! let mut store = FolderStore::new(JsonFileStore::new("folders.json"));
//! let tree = store.load_or_default()?;
//! store.save(&tree)?;
//! ```

mod config;
mod error;
mod kv;
mod snapshot;
mod store;

pub use config::{DEFAULT_STORE_KEY, StoreConfig, StoreConfigBuilder, default_store_path};
pub use error::StoreError;
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
pub use store::FolderStore;
