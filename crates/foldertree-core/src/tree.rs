//! Folder tree container and its operations.

use std::collections::HashSet;

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::node::{ColorTag, Folder, FolderId};
use crate::sort::{SortOrder, SortScope};

/// Name given to the root of a fresh tree.
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Maximum folder name length, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Summary statistics for a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of folders, root included.
    pub total_folders: usize,
    /// Deepest folder's distance from the root.
    pub max_depth: usize,
    /// Number of folders with a color tag set.
    pub tagged_folders: usize,
}

/// What a cascading delete removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// The deleted folder followed by its descendants, in pre-order.
    pub removed: Vec<FolderId>,
    /// Whether the current location was inside the deleted subtree.
    pub redirected: bool,
}

impl DeleteOutcome {
    /// Number of folders removed.
    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// A rooted tree of folders plus the current location.
///
/// Folders live in a single arena keyed by id. Each folder stores both its
/// parent link and its ordered child list; the methods here are the only
/// place either side changes, and they always change both together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTree {
    folders: IndexMap<FolderId, Folder>,
    root: FolderId,
    current: FolderId,
}

impl Default for FolderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderTree {
    /// Create a tree containing only a root named `root`.
    pub fn new() -> Self {
        Self::with_root_name(DEFAULT_ROOT_NAME)
    }

    /// Create a tree whose root has the given name.
    pub fn with_root_name(name: impl Into<CompactString>) -> Self {
        let root = Folder::new(FolderId::ROOT, name, None);
        let mut folders = IndexMap::new();
        folders.insert(FolderId::ROOT, root);
        Self {
            folders,
            root: FolderId::ROOT,
            current: FolderId::ROOT,
        }
    }

    /// Rebuild a tree from stored records, rejecting anything that is not a
    /// valid tree.
    pub fn from_parts(
        folders: impl IntoIterator<Item = Folder>,
        current: FolderId,
    ) -> Result<Self, TreeError> {
        let mut map = IndexMap::new();
        let mut root = None;

        for folder in folders {
            let id = folder.id();
            if folder.is_root() {
                if let Some(existing) = root {
                    return Err(TreeError::corrupt(format!(
                        "more than one root ({existing} and {id})"
                    )));
                }
                root = Some(id);
            }
            if map.insert(id, folder).is_some() {
                return Err(TreeError::corrupt(format!("duplicate folder id {id}")));
            }
        }

        let root = root.ok_or_else(|| TreeError::corrupt("no root folder"))?;
        let tree = Self {
            folders: map,
            root,
            current,
        };
        tree.check_invariants()?;
        Ok(tree)
    }

    /// Verify every structural invariant of the tree.
    ///
    /// Checks that exactly one folder is parentless, that parent and child
    /// links agree, that every child id resolves, that every folder is
    /// reachable from the root without revisiting anything, and that the
    /// current location exists.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        let root = self
            .folders
            .get(&self.root)
            .ok_or_else(|| TreeError::corrupt("root folder is missing"))?;
        if !root.is_root() {
            return Err(TreeError::corrupt("root folder has a parent"));
        }

        for folder in self.folders.values() {
            let id = folder.id();
            if let Some(parent_id) = folder.parent() {
                let parent = self.folders.get(&parent_id).ok_or_else(|| {
                    TreeError::corrupt(format!("{id} points at missing parent {parent_id}"))
                })?;
                let listed = parent.children().iter().filter(|c| **c == id).count();
                if listed != 1 {
                    return Err(TreeError::corrupt(format!(
                        "{id} listed {listed} times by its parent {parent_id}"
                    )));
                }
            } else if id != self.root {
                return Err(TreeError::corrupt(format!("{id} is a second root")));
            }

            for child_id in folder.children() {
                let child = self.folders.get(child_id).ok_or_else(|| {
                    TreeError::corrupt(format!("{id} lists missing child {child_id}"))
                })?;
                if child.parent() != Some(id) {
                    return Err(TreeError::corrupt(format!(
                        "{child_id} is listed by {id} but has another parent"
                    )));
                }
            }
        }

        let mut seen = HashSet::with_capacity(self.folders.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(TreeError::corrupt(format!("{id} reached twice")));
            }
            if let Some(folder) = self.folders.get(&id) {
                stack.extend(folder.children().iter().copied());
            }
        }
        if seen.len() != self.folders.len() {
            return Err(TreeError::corrupt(format!(
                "{} folders unreachable from the root",
                self.folders.len() - seen.len()
            )));
        }

        if !self.folders.contains_key(&self.current) {
            return Err(TreeError::corrupt(format!(
                "current folder {} does not exist",
                self.current
            )));
        }

        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Root folder id.
    pub fn root(&self) -> FolderId {
        self.root
    }

    /// Root folder record.
    pub fn root_folder(&self) -> &Folder {
        &self.folders[&self.root]
    }

    /// Current location.
    pub fn current(&self) -> FolderId {
        self.current
    }

    /// Folder at the current location.
    pub fn current_folder(&self) -> &Folder {
        &self.folders[&self.current]
    }

    /// Look up a folder.
    pub fn get(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    /// Check if a folder exists.
    pub fn contains(&self, id: FolderId) -> bool {
        self.folders.contains_key(&id)
    }

    /// Number of folders, root included.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// A tree always holds its root, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// All folders in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    /// All folder ids in arena order.
    pub fn ids(&self) -> impl Iterator<Item = FolderId> + '_ {
        self.folders.keys().copied()
    }

    /// Direct children of a folder in display order. Empty for unknown ids.
    pub fn children(&self, id: FolderId) -> Vec<&Folder> {
        self.folders
            .get(&id)
            .map(|folder| {
                folder
                    .children()
                    .iter()
                    .filter_map(|child| self.folders.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every descendant of a folder, in depth-first pre-order, excluding the
    /// folder itself.
    pub fn descendants(&self, id: FolderId) -> Vec<FolderId> {
        let mut out = Vec::new();
        let mut stack: Vec<FolderId> = match self.folders.get(&id) {
            Some(folder) => folder.children().iter().rev().copied().collect(),
            None => return out,
        };

        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(folder) = self.folders.get(&next) {
                stack.extend(folder.children().iter().rev().copied());
            }
        }
        out
    }

    /// Folders from the root down to `id`, root first. Empty for unknown ids.
    pub fn path(&self, id: FolderId) -> Vec<&Folder> {
        let mut path = Vec::new();
        let mut cursor = self.folders.get(&id);
        while let Some(folder) = cursor {
            path.push(folder);
            // Parent links are acyclic, so this bound is never reached on a valid tree.
            if path.len() > self.folders.len() {
                break;
            }
            cursor = folder.parent().and_then(|parent| self.folders.get(&parent));
        }
        path.reverse();
        path
    }

    /// Identifiers from the root down to `id`, root first.
    pub fn path_ids(&self, id: FolderId) -> Vec<FolderId> {
        self.path(id).into_iter().map(Folder::id).collect()
    }

    /// Root-to-current breadcrumb.
    pub fn breadcrumb(&self) -> Vec<&Folder> {
        self.path(self.current)
    }

    /// Distance from the root, `None` for unknown ids.
    pub fn depth(&self, id: FolderId) -> Option<usize> {
        let len = self.path(id).len();
        (len > 0).then(|| len - 1)
    }

    /// Check if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: FolderId, id: FolderId) -> bool {
        ancestor != id && self.path(id).iter().any(|f| f.id() == ancestor)
    }

    /// Compute summary statistics.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            total_folders: self.folders.len(),
            ..TreeStats::default()
        };

        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(folder) = self.folders.get(&id) else {
                continue;
            };
            stats.max_depth = stats.max_depth.max(depth);
            if folder.color_tag().is_set() {
                stats.tagged_folders += 1;
            }
            stack.extend(folder.children().iter().map(|c| (*c, depth + 1)));
        }
        stats
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Create a folder under `parent`. Returns the new folder's id.
    ///
    /// The name is trimmed; blank names are rejected and no id is allocated.
    pub fn create(&mut self, parent: FolderId, name: &str) -> Result<FolderId, TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::NotFound { id: parent });
        }
        let name = normalize_name(name)?;

        let id = FolderId::new_v4();
        self.folders.insert(id, Folder::new(id, name, Some(parent)));
        self.folder_mut(parent)?.children_mut().push(id);
        Ok(id)
    }

    /// Rename a folder.
    pub fn rename(&mut self, id: FolderId, name: &str) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NotFound { id });
        }
        let name = normalize_name(name)?;
        self.folder_mut(id)?.set_name(name);
        Ok(())
    }

    /// Move the current location to `id`.
    pub fn navigate(&mut self, id: FolderId) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NotFound { id });
        }
        self.current = id;
        Ok(())
    }

    /// Move the current location to its parent. Returns the new location.
    pub fn navigate_up(&mut self) -> Result<FolderId, TreeError> {
        let parent = self.current_folder().parent().ok_or(TreeError::AtRoot)?;
        self.current = parent;
        Ok(parent)
    }

    /// Jump to the `index`-th entry of the current breadcrumb.
    pub fn select_breadcrumb(&mut self, index: usize) -> Result<FolderId, TreeError> {
        let trail = self.path_ids(self.current);
        let id = *trail.get(index).ok_or(TreeError::BreadcrumbIndex {
            index,
            len: trail.len(),
        })?;
        self.current = id;
        Ok(id)
    }

    /// Delete a folder together with all of its descendants.
    ///
    /// If the current location is inside the deleted subtree it moves to the
    /// deleted folder's parent, the nearest ancestor that survives.
    pub fn delete(&mut self, id: FolderId) -> Result<DeleteOutcome, TreeError> {
        let folder = self.get(id).ok_or(TreeError::NotFound { id })?;
        let parent = folder.parent().ok_or(TreeError::DeleteRoot)?;

        let mut removed = Vec::with_capacity(1 + folder.child_count());
        removed.push(id);
        removed.extend(self.descendants(id));

        let doomed: HashSet<FolderId> = removed.iter().copied().collect();
        self.folders.retain(|key, _| !doomed.contains(key));
        self.folder_mut(parent)?.children_mut().retain(|child| *child != id);

        let redirected = doomed.contains(&self.current);
        if redirected {
            self.current = parent;
        }

        Ok(DeleteOutcome {
            removed,
            redirected,
        })
    }

    /// Re-parent a folder, appending it to `new_parent`'s children.
    pub fn move_folder(&mut self, id: FolderId, new_parent: FolderId) -> Result<(), TreeError> {
        let folder = self.get(id).ok_or(TreeError::NotFound { id })?;
        if !self.contains(new_parent) {
            return Err(TreeError::NotFound { id: new_parent });
        }
        let old_parent = folder.parent().ok_or(TreeError::MoveRoot)?;
        if id == new_parent || self.is_ancestor(id, new_parent) {
            return Err(TreeError::Cycle {
                id,
                target: new_parent,
            });
        }
        if old_parent == new_parent {
            return Ok(());
        }

        self.folder_mut(old_parent)?
            .children_mut()
            .retain(|child| *child != id);
        self.folder_mut(new_parent)?.children_mut().push(id);
        self.folder_mut(id)?.set_parent(new_parent);
        Ok(())
    }

    /// Reorder child lists alphabetically. Stable for equal names.
    pub fn sort_children(&mut self, scope: SortScope, order: SortOrder) -> Result<(), TreeError> {
        let targets = match scope {
            SortScope::Folder(id) => {
                if !self.contains(id) {
                    return Err(TreeError::NotFound { id });
                }
                vec![id]
            }
            SortScope::Subtree(id) => {
                if !self.contains(id) {
                    return Err(TreeError::NotFound { id });
                }
                let mut ids = vec![id];
                ids.extend(self.descendants(id));
                ids
            }
            SortScope::All => {
                self.folders
                    .sort_by(|_, a, _, b| order.compare(a.name(), b.name()));
                self.folders.keys().copied().collect()
            }
        };

        for id in targets {
            self.sort_one(id, order)?;
        }
        Ok(())
    }

    /// Set a folder's color from a tag key such as `"red"`.
    pub fn set_color_tag(&mut self, id: FolderId, key: &str) -> Result<(), TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NotFound { id });
        }
        let tag: ColorTag = key.trim().parse().map_err(|_| TreeError::UnknownColor {
            key: key.to_string(),
        })?;
        self.set_color(id, tag)
    }

    /// Set a folder's color.
    pub fn set_color(&mut self, id: FolderId, tag: ColorTag) -> Result<(), TreeError> {
        self.folder_mut(id)?.set_color_tag(tag);
        Ok(())
    }

    fn sort_one(&mut self, id: FolderId, order: SortOrder) -> Result<(), TreeError> {
        let mut ids = std::mem::take(self.folder_mut(id)?.children_mut());
        ids.sort_by(|a, b| order.compare(self.name_of(*a), self.name_of(*b)));
        *self.folder_mut(id)?.children_mut() = ids;
        Ok(())
    }

    fn name_of(&self, id: FolderId) -> &str {
        self.folders.get(&id).map(Folder::name).unwrap_or_default()
    }

    fn folder_mut(&mut self, id: FolderId) -> Result<&mut Folder, TreeError> {
        self.folders
            .get_mut(&id)
            .ok_or(TreeError::NotFound { id })
    }
}

/// Trim and validate a folder name.
pub fn normalize_name(name: &str) -> Result<CompactString, TreeError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TreeError::BlankName);
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(TreeError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(CompactString::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &FolderTree, id: FolderId) -> Vec<String> {
        tree.children(id)
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    #[test]
    fn test_new_tree_has_only_root() {
        let tree = FolderTree::new();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.current(), tree.root());
        assert_eq!(tree.root_folder().name(), "root");
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_create_appends_in_order() {
        let mut tree = FolderTree::new();
        let root = tree.root();
        let a = tree.create(root, "A").unwrap();
        let b = tree.create(root, "  B  ").unwrap();

        assert_eq!(tree.root_folder().children(), &[a, b]);
        assert_eq!(tree.get(b).unwrap().name(), "B");
        assert_eq!(tree.get(a).unwrap().parent(), Some(root));
    }

    #[test]
    fn test_create_rejects_blank_and_missing_parent() {
        let mut tree = FolderTree::new();
        let before = tree.clone();

        assert_eq!(tree.create(tree.root(), "   "), Err(TreeError::BlankName));
        let ghost = FolderId::new_v4();
        assert_eq!(
            tree.create(ghost, "x"),
            Err(TreeError::NotFound { id: ghost })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_name_too_long() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            normalize_name(&long),
            Err(TreeError::NameTooLong { .. })
        ));
        assert!(normalize_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_delete_is_cascading_and_iterative() {
        let mut tree = FolderTree::new();
        let mut parent = tree.root();
        let first = tree.create(parent, "level-0").unwrap();
        parent = first;
        for depth in 1..10_000 {
            parent = tree.create(parent, &format!("level-{depth}")).unwrap();
        }
        assert_eq!(tree.len(), 10_001);

        let outcome = tree.delete(first).unwrap();
        assert_eq!(outcome.count(), 10_000);
        assert_eq!(tree.len(), 1);
        assert!(tree.root_folder().children().is_empty());
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_root_rejected() {
        let mut tree = FolderTree::new();
        assert_eq!(tree.delete(tree.root()), Err(TreeError::DeleteRoot));
    }

    #[test]
    fn test_sort_scope_folder_only() {
        let mut tree = FolderTree::new();
        let root = tree.root();
        let z = tree.create(root, "zeta").unwrap();
        tree.create(root, "alpha").unwrap();
        tree.create(z, "y").unwrap();
        tree.create(z, "b").unwrap();

        tree.sort_children(SortScope::Folder(root), SortOrder::NameAscending)
            .unwrap();
        assert_eq!(names(&tree, root), vec!["alpha", "zeta"]);
        assert_eq!(names(&tree, z), vec!["y", "b"]);

        tree.sort_children(SortScope::Subtree(root), SortOrder::NameAscending)
            .unwrap();
        assert_eq!(names(&tree, z), vec!["b", "y"]);
    }

    #[test]
    fn test_sort_all_reorders_arena() {
        let mut tree = FolderTree::new();
        let root = tree.root();
        tree.create(root, "m").unwrap();
        tree.create(root, "c").unwrap();

        tree.sort_children(SortScope::All, SortOrder::NameAscending)
            .unwrap();
        let order: Vec<&str> = tree.iter().map(Folder::name).collect();
        assert_eq!(order, vec!["c", "m", "root"]);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_stats() {
        let mut tree = FolderTree::new();
        let a = tree.create(tree.root(), "a").unwrap();
        let b = tree.create(a, "b").unwrap();
        tree.set_color(b, ColorTag::Red).unwrap();

        let stats = tree.stats();
        assert_eq!(stats.total_folders, 3);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.tagged_folders, 1);
    }

    #[test]
    fn test_from_parts_rejects_two_roots() {
        let a = Folder::new(FolderId::ROOT, "root", None);
        let b = Folder::new(FolderId::new_v4(), "other", None);
        let err = FolderTree::from_parts(vec![a, b], FolderId::ROOT).unwrap_err();
        assert!(matches!(err, TreeError::Corrupt { .. }));
    }

    #[test]
    fn test_from_parts_rejects_dangling_child() {
        let mut root = Folder::new(FolderId::ROOT, "root", None);
        root.children_mut().push(FolderId::new_v4());
        let err = FolderTree::from_parts(vec![root], FolderId::ROOT).unwrap_err();
        assert!(matches!(err, TreeError::Corrupt { .. }));
    }

    #[test]
    fn test_from_parts_rejects_missing_current() {
        let root = Folder::new(FolderId::ROOT, "root", None);
        let err = FolderTree::from_parts(vec![root], FolderId::new_v4()).unwrap_err();
        assert!(matches!(err, TreeError::Corrupt { .. }));
    }
}
