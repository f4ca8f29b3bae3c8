//! Versioned serialized form of a folder tree.

use chrono::{DateTime, Utc};
use foldertree_core::{Folder, FolderId, FolderTree};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Schema version written by this build.
pub const SNAPSHOT_VERSION: u64 = 1;

/// Everything needed to restore a tree: all folder records plus the current
/// location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Schema version.
    pub version: u64,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Folder the user was viewing.
    pub current_folder_id: FolderId,
    /// Folder records in arena order.
    pub folders: Vec<Folder>,
}

impl Snapshot {
    /// Capture the state of a tree.
    pub fn capture(tree: &FolderTree) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            current_folder_id: tree.current(),
            folders: tree.iter().cloned().collect(),
        }
    }

    /// Rebuild the tree, validating every structural invariant.
    pub fn into_tree(self) -> Result<FolderTree, StoreError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(FolderTree::from_parts(self.folders, self.current_folder_id)?)
    }

    /// Encode as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String, StoreError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Decode from JSON.
    ///
    /// The version is checked before the body is decoded, so snapshots from
    /// a newer schema report a version mismatch rather than a parse error.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let found = value
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        if found != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_capture() {
        let mut tree = FolderTree::new();
        let a = tree.create(tree.root(), "a").unwrap();
        tree.navigate(a).unwrap();

        let snapshot = Snapshot::capture(&tree);
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.current_folder_id, a);
        assert_eq!(snapshot.folders.len(), 2);
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let tree = FolderTree::new();
        let json = Snapshot::capture(&tree).to_json(false).unwrap();
        assert!(json.contains("\"currentFolderId\""));
        assert!(json.contains("\"savedAt\""));
        assert!(json.contains("\"childFolderIds\""));
    }

    #[test]
    fn test_snapshot_rejects_other_versions() {
        let err = Snapshot::from_json(r#"{"version":2,"whatever":true}"#).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion {
                found: 2,
                expected: 1
            }
        ));

        let err = Snapshot::from_json(r#"{"folders":[]}"#).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion { found: 0, .. }));
    }
}
