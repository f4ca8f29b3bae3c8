//! Folder records and their identifiers.

use std::fmt;
use std::str::FromStr;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Unique identifier for a folder within a tree.
///
/// Identifiers are random (UUID v4) and never reused, so an id that has been
/// deleted will not come back attached to a different folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(Uuid);

impl FolderId {
    /// Identifier used for the root of a freshly created tree.
    pub const ROOT: FolderId = FolderId(Uuid::nil());

    /// Allocate a fresh random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex digits, enough to tell folders apart in listings.
    pub fn short(&self) -> String {
        let mut hex = self.0.simple().to_string();
        hex.truncate(8);
        hex
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for FolderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Display-only color label attached to a folder.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    #[default]
    None,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Gray,
}

impl ColorTag {
    /// Whether a real color (anything but `none`) is set.
    pub fn is_set(&self) -> bool {
        !matches!(self, ColorTag::None)
    }
}

/// A single folder in the tree.
///
/// Fields are private: parent and child links are only ever changed by
/// [`FolderTree`](crate::FolderTree), which keeps both sides in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    id: FolderId,

    #[serde(default)]
    parent_folder_id: Option<FolderId>,

    #[serde(default)]
    child_folder_ids: Vec<FolderId>,

    name: CompactString,

    #[serde(default)]
    color_tag: ColorTag,
}

impl Folder {
    pub(crate) fn new(
        id: FolderId,
        name: impl Into<CompactString>,
        parent: Option<FolderId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent_folder_id: parent,
            child_folder_ids: Vec::new(),
            color_tag: ColorTag::None,
        }
    }

    /// Unique identifier of this folder.
    pub fn id(&self) -> FolderId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning folder, `None` for the root.
    pub fn parent(&self) -> Option<FolderId> {
        self.parent_folder_id
    }

    /// Child identifiers in display order.
    pub fn children(&self) -> &[FolderId] {
        &self.child_folder_ids
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.child_folder_ids.len()
    }

    /// Color label.
    pub fn color_tag(&self) -> ColorTag {
        self.color_tag
    }

    /// Check if this folder is the root.
    pub fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    pub(crate) fn set_name(&mut self, name: CompactString) {
        self.name = name;
    }

    pub(crate) fn set_parent(&mut self, parent: FolderId) {
        self.parent_folder_id = Some(parent);
    }

    pub(crate) fn set_color_tag(&mut self, tag: ColorTag) {
        self.color_tag = tag;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<FolderId> {
        &mut self.child_folder_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_folder_id_roundtrip_string() {
        let id = FolderId::new_v4();
        let parsed: FolderId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.short().len(), 8);
    }

    #[test]
    fn test_folder_ids_are_unique() {
        let a = FolderId::new_v4();
        let b = FolderId::new_v4();
        assert_ne!(a, b);
        assert_ne!(a, FolderId::ROOT);
    }

    #[test]
    fn test_color_tag_parsing() {
        assert_eq!("red".parse::<ColorTag>().unwrap(), ColorTag::Red);
        assert_eq!("BLUE".parse::<ColorTag>().unwrap(), ColorTag::Blue);
        assert_eq!("none".parse::<ColorTag>().unwrap(), ColorTag::None);
        assert!("magenta".parse::<ColorTag>().is_err());
        assert_eq!(ColorTag::Purple.to_string(), "purple");
        assert_eq!(ColorTag::iter().count(), 8);
    }

    #[test]
    fn test_folder_serializes_camel_case() {
        let mut folder = Folder::new(FolderId::new_v4(), "docs", Some(FolderId::ROOT));
        folder.set_color_tag(ColorTag::Green);
        let json = serde_json::to_value(&folder).unwrap();
        assert!(json.get("parentFolderId").is_some());
        assert!(json.get("childFolderIds").is_some());
        assert_eq!(json["colorTag"], "green");
        assert_eq!(json["name"], "docs");
    }

    #[test]
    fn test_folder_color_tag_defaults_to_none() {
        let json = format!(
            r#"{{"id":"{}","parentFolderId":null,"childFolderIds":[],"name":"root"}}"#,
            FolderId::ROOT
        );
        let folder: Folder = serde_json::from_str(&json).unwrap();
        assert_eq!(folder.color_tag(), ColorTag::None);
        assert!(folder.is_root());
    }
}
