//! User intents dispatched by the view layer.

use foldertree_core::{DeleteOutcome, ErrorKind, FolderId, SortOrder, SortScope, TreeError};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    /// Create a folder inside the current folder.
    Create { name: String },
    /// Create a folder inside a specific folder.
    CreateIn { parent: FolderId, name: String },
    /// Go to a folder.
    Navigate { id: FolderId },
    /// Go to the parent of the current folder.
    NavigateUp,
    /// Jump to an entry of the breadcrumb.
    SelectBreadcrumb { index: usize },
    /// Ask to delete a folder; opens the confirmation gate.
    RequestDelete { id: FolderId },
    /// Carry out the pending deletion.
    ConfirmDelete,
    /// Dismiss the pending deletion.
    CancelDelete,
    /// Rename a folder.
    Rename { id: FolderId, name: String },
    /// Re-parent a folder.
    Move { id: FolderId, parent: FolderId },
    /// Sort child lists alphabetically.
    Sort { scope: SortScope, order: SortOrder },
    /// Open the color menu for a folder.
    OpenTagMenu { id: FolderId },
    /// Close the color menu.
    CloseTagMenu,
    /// Set a folder's color from a tag key.
    Tag { id: FolderId, color: String },
}

impl Intent {
    /// Create a folder in the current location.
    pub fn create(name: impl Into<String>) -> Self {
        Self::Create { name: name.into() }
    }

    /// Set a color tag.
    pub fn tag(id: FolderId, color: impl Into<String>) -> Self {
        Self::Tag {
            id,
            color: color.into(),
        }
    }

    /// Sort the current folder's children A-Z.
    pub fn sort(scope: SortScope) -> Self {
        Self::Sort {
            scope,
            order: SortOrder::default(),
        }
    }

    /// Whether a successful dispatch changes persisted state.
    ///
    /// Navigation counts: the snapshot records the current folder.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::RequestDelete { .. }
                | Self::CancelDelete
                | Self::OpenTagMenu { .. }
                | Self::CloseTagMenu
        )
    }

    /// Short name for logging.
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// A folder was created.
    Created(FolderId),
    /// The current location changed.
    Navigated(FolderId),
    /// Deletion is waiting for confirmation.
    AwaitingConfirmation {
        target: FolderId,
        /// Folders that would be removed, target included.
        affected: usize,
    },
    /// A subtree was deleted.
    Deleted(DeleteOutcome),
    /// A modal was dismissed without changes.
    Dismissed,
    /// The tag menu opened.
    MenuOpened(FolderId),
    /// The tree changed in place (rename, move, sort, tag).
    Updated,
}

/// Errors returned by [`Session::dispatch`](crate::Session::dispatch).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The model rejected the operation.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// `ConfirmDelete` arrived with no deletion pending.
    #[error("No deletion is awaiting confirmation")]
    NothingToConfirm,
}

impl SessionError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Tree(e) => e.kind(),
            Self::NothingToConfirm => ErrorKind::IllegalOperation,
        }
    }
}
