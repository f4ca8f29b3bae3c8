//! Alphabetical ordering of folders.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::node::FolderId;

/// Direction for alphabetical sorting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum SortOrder {
    /// A-Z.
    #[default]
    #[strum(to_string = "Name ↓", serialize = "asc")]
    NameAscending,
    /// Z-A.
    #[strum(to_string = "Name ↑", serialize = "desc")]
    NameDescending,
}

impl SortOrder {
    /// Reverse the sort direction.
    pub fn reverse(self) -> Self {
        match self {
            Self::NameAscending => Self::NameDescending,
            Self::NameDescending => Self::NameAscending,
        }
    }

    /// Compare two folder names in this order.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::NameAscending => compare_names(a, b),
            Self::NameDescending => compare_names(b, a),
        }
    }
}

/// Which child lists a sort touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortScope {
    /// Only the direct children of one folder.
    Folder(FolderId),
    /// Every child list in the subtree rooted at a folder.
    Subtree(FolderId),
    /// Every child list, plus the arena's own iteration order.
    All,
}

/// Case-aware name comparison.
///
/// Names are compared case-insensitively first; ties fall back to the exact
/// string so that `"Banana"` sorts before `"banana"` and the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_names_case_aware() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Banana", "banana"), Ordering::Less);
        assert_eq!(compare_names("banana", "cherry"), Ordering::Less);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_sort_order_reverse() {
        assert_eq!(SortOrder::default(), SortOrder::NameAscending);
        assert_eq!(SortOrder::NameAscending.reverse(), SortOrder::NameDescending);
        assert_eq!(
            SortOrder::NameDescending.compare("a", "b"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::NameAscending);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::NameDescending);
    }
}
