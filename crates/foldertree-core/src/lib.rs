//! Core types for foldertree.
//!
//! This crate provides the folder tree model: folder records, identifiers,
//! color tags and the [`FolderTree`] arena with its create, navigate, delete,
//! move, sort and tag operations. Every operation either succeeds completely
//! or returns a [`TreeError`] and leaves the tree untouched.

mod error;
mod node;
mod sort;
mod tree;

pub use error::{ErrorKind, TreeError};
pub use node::{ColorTag, Folder, FolderId};
pub use sort::{SortOrder, SortScope, compare_names};
pub use tree::{
    DEFAULT_ROOT_NAME, DeleteOutcome, FolderTree, MAX_NAME_LEN, TreeStats, normalize_name,
};
