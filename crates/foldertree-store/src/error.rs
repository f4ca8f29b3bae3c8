//! Error types for persistence.

use std::path::PathBuf;

use foldertree_core::TreeError;
use thiserror::Error;

/// Errors that can occur while loading or saving snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored data is not valid JSON or does not match the snapshot shape.
    #[error("Malformed store data: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    /// Snapshot was written by an incompatible schema version.
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u64, expected: u64 },

    /// Snapshot decoded but does not describe a valid tree.
    #[error("Invalid snapshot: {0}")]
    Tree(#[from] TreeError),
}

impl StoreError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
