//! Error types for folder tree operations.

use thiserror::Error;

use crate::node::FolderId;

/// Broad category of a [`TreeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced folder does not exist.
    NotFound,
    /// The caller supplied a value the model does not accept.
    InvalidInput,
    /// The operation would break the shape of the tree.
    IllegalOperation,
    /// Loaded data does not form a valid tree.
    Corrupt,
}

/// Errors returned by [`FolderTree`](crate::FolderTree) operations.
///
/// Every operation validates before it mutates, so an error always leaves
/// the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Folder id does not exist.
    #[error("Folder not found: {id}")]
    NotFound { id: FolderId },

    /// Name is empty after trimming whitespace.
    #[error("Folder name cannot be blank")]
    BlankName,

    /// Name exceeds the maximum length.
    #[error("Folder name is too long ({len} characters, max {max})")]
    NameTooLong { len: usize, max: usize },

    /// Color key is not one of the recognized tags.
    #[error("Unknown color tag: {key}")]
    UnknownColor { key: String },

    /// Breadcrumb position past the end of the current path.
    #[error("Breadcrumb index {index} out of range (path has {len} entries)")]
    BreadcrumbIndex { index: usize, len: usize },

    /// The root folder cannot be deleted.
    #[error("The root folder cannot be deleted")]
    DeleteRoot,

    /// The root folder cannot be moved.
    #[error("The root folder cannot be moved")]
    MoveRoot,

    /// Moving a folder under itself or one of its descendants.
    #[error("Cannot move {id} into its own subtree ({target})")]
    Cycle { id: FolderId, target: FolderId },

    /// Already at the root, there is no parent to go to.
    #[error("Already at the root folder")]
    AtRoot,

    /// Folder records do not form a valid tree.
    #[error("Corrupt folder tree: {reason}")]
    Corrupt { reason: String },
}

impl TreeError {
    /// Create a corruption error.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::BlankName
            | Self::NameTooLong { .. }
            | Self::UnknownColor { .. }
            | Self::BreadcrumbIndex { .. } => ErrorKind::InvalidInput,
            Self::DeleteRoot | Self::MoveRoot | Self::Cycle { .. } | Self::AtRoot => {
                ErrorKind::IllegalOperation
            }
            Self::Corrupt { .. } => ErrorKind::Corrupt,
        }
    }
}
