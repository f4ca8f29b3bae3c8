//! Intent dispatch for foldertree.
//!
//! The view layer never mutates the folder tree directly. It reads a
//! [`SessionView`] and sends [`Intent`]s to a [`Session`], which owns the
//! tree, the open modal (delete confirmation or color menu) and the store
//! the tree is saved to after every change.

mod operation;
mod session;

pub use operation::{Intent, IntentOutcome, SessionError};
pub use session::{AppMode, Session, SessionView};
