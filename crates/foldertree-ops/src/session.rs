//! Application state and intent dispatch.

use foldertree_core::{Folder, FolderId, FolderTree, TreeError};
use foldertree_store::{FolderStore, KeyValueStore, MemoryStore, StoreError};
use tracing::{debug, warn};

use crate::operation::{Intent, IntentOutcome, SessionError};

/// Which modal, if any, the view should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    /// Waiting for the user to confirm deletion of `target`.
    ConfirmDelete { target: FolderId },
    /// Color menu open for `target`.
    TagMenu { target: FolderId },
}

/// Read-only snapshot handed to the view layer.
#[derive(Debug, Clone)]
pub struct SessionView<'a> {
    /// Folder being viewed.
    pub current: &'a Folder,
    /// Root-to-current trail.
    pub breadcrumb: Vec<&'a Folder>,
    /// Children of the current folder in display order.
    pub children: Vec<&'a Folder>,
    /// Open modal.
    pub mode: AppMode,
}

/// The single owner of all mutable UI state.
///
/// Holds the folder tree, the open modal and an optional store. Every user
/// action goes through [`Session::dispatch`]; after a successful mutation the
/// tree is saved if a store is attached and autosave is on.
#[derive(Debug)]
pub struct Session<S = MemoryStore> {
    tree: FolderTree,
    mode: AppMode,
    store: Option<FolderStore<S>>,
    autosave: bool,
}

impl Session {
    /// Start a session over a tree with no persistence.
    pub fn new(tree: FolderTree) -> Self {
        Self {
            tree,
            mode: AppMode::Normal,
            store: None,
            autosave: false,
        }
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Load the stored tree (or a fresh one) and keep saving to the store.
    pub fn open(store: FolderStore<S>) -> Result<Self, StoreError> {
        let tree = store.load_or_default()?;
        Ok(Self {
            tree,
            mode: AppMode::Normal,
            store: Some(store),
            autosave: true,
        })
    }

    /// Turn saving after each mutation on or off.
    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// The folder tree.
    pub fn tree(&self) -> &FolderTree {
        &self.tree
    }

    /// Open modal.
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Attached store, if any.
    pub fn store(&self) -> Option<&FolderStore<S>> {
        self.store.as_ref()
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            current: self.tree.current_folder(),
            breadcrumb: self.tree.breadcrumb(),
            children: self.tree.children(self.tree.current()),
            mode: self.mode,
        }
    }

    /// Apply one intent.
    ///
    /// On error nothing changes: neither the tree nor the open modal.
    pub fn dispatch(&mut self, intent: Intent) -> Result<IntentOutcome, SessionError> {
        debug!(intent = intent.label(), "dispatching intent");
        let mutating = intent.is_mutating();
        let outcome = self.apply(intent)?;
        if mutating {
            self.persist();
        }
        Ok(outcome)
    }

    /// Save now, regardless of autosave. A no-op without a store.
    pub fn save(&mut self) -> Result<(), StoreError> {
        match self.store.as_mut() {
            Some(store) => store.save(&self.tree),
            None => Ok(()),
        }
    }

    fn apply(&mut self, intent: Intent) -> Result<IntentOutcome, SessionError> {
        let outcome = match intent {
            Intent::Create { name } => {
                let id = self.tree.create(self.tree.current(), &name)?;
                IntentOutcome::Created(id)
            }
            Intent::CreateIn { parent, name } => {
                IntentOutcome::Created(self.tree.create(parent, &name)?)
            }
            Intent::Navigate { id } => {
                self.tree.navigate(id)?;
                IntentOutcome::Navigated(id)
            }
            Intent::NavigateUp => IntentOutcome::Navigated(self.tree.navigate_up()?),
            Intent::SelectBreadcrumb { index } => {
                IntentOutcome::Navigated(self.tree.select_breadcrumb(index)?)
            }
            Intent::RequestDelete { id } => {
                let folder = self.tree.get(id).ok_or(TreeError::NotFound { id })?;
                if folder.is_root() {
                    return Err(TreeError::DeleteRoot.into());
                }
                let affected = 1 + self.tree.descendants(id).len();
                self.mode = AppMode::ConfirmDelete { target: id };
                IntentOutcome::AwaitingConfirmation {
                    target: id,
                    affected,
                }
            }
            Intent::ConfirmDelete => {
                let AppMode::ConfirmDelete { target } = self.mode else {
                    return Err(SessionError::NothingToConfirm);
                };
                let deleted = self.tree.delete(target)?;
                self.mode = AppMode::Normal;
                debug!(
                    removed = deleted.count(),
                    redirected = deleted.redirected,
                    "deleted folder subtree"
                );
                IntentOutcome::Deleted(deleted)
            }
            Intent::CancelDelete => {
                if matches!(self.mode, AppMode::ConfirmDelete { .. }) {
                    self.mode = AppMode::Normal;
                }
                IntentOutcome::Dismissed
            }
            Intent::Rename { id, name } => {
                self.tree.rename(id, &name)?;
                IntentOutcome::Updated
            }
            Intent::Move { id, parent } => {
                self.tree.move_folder(id, parent)?;
                IntentOutcome::Updated
            }
            Intent::Sort { scope, order } => {
                self.tree.sort_children(scope, order)?;
                IntentOutcome::Updated
            }
            Intent::OpenTagMenu { id } => {
                if !self.tree.contains(id) {
                    return Err(TreeError::NotFound { id }.into());
                }
                self.mode = AppMode::TagMenu { target: id };
                IntentOutcome::MenuOpened(id)
            }
            Intent::CloseTagMenu => {
                if matches!(self.mode, AppMode::TagMenu { .. }) {
                    self.mode = AppMode::Normal;
                }
                IntentOutcome::Dismissed
            }
            Intent::Tag { id, color } => {
                self.tree.set_color_tag(id, &color)?;
                if self.mode == (AppMode::TagMenu { target: id }) {
                    self.mode = AppMode::Normal;
                }
                IntentOutcome::Updated
            }
        };
        Ok(outcome)
    }

    fn persist(&mut self) {
        if !self.autosave {
            return;
        }
        if let Some(store) = self.store.as_mut() {
            // Best effort: a failed save never fails the intent.
            if let Err(e) = store.save(&self.tree) {
                warn!(error = %e, key = store.key(), "failed to save folder tree");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_root() {
        let session = Session::new(FolderTree::new());
        let view = session.view();
        assert_eq!(view.current.id(), session.tree().root());
        assert_eq!(view.breadcrumb.len(), 1);
        assert!(view.children.is_empty());
        assert_eq!(view.mode, AppMode::Normal);
    }

    #[test]
    fn test_create_goes_into_current_folder() {
        let mut session = Session::new(FolderTree::new());
        let IntentOutcome::Created(a) = session.dispatch(Intent::create("a")).unwrap() else {
            panic!("expected Created");
        };
        session.dispatch(Intent::Navigate { id: a }).unwrap();
        let IntentOutcome::Created(b) = session.dispatch(Intent::create("b")).unwrap() else {
            panic!("expected Created");
        };
        assert_eq!(session.tree().get(b).unwrap().parent(), Some(a));
    }

    #[test]
    fn test_confirm_without_request() {
        let mut session = Session::new(FolderTree::new());
        assert_eq!(
            session.dispatch(Intent::ConfirmDelete),
            Err(SessionError::NothingToConfirm)
        );
    }
}
