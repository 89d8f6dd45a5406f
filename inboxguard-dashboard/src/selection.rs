//! Copy-on-write set of selected row identifiers
//!
//! Cloning a [`SelectionSet`] is cheap: clones share storage until one of them
//! is mutated. A snapshot given to a renderer therefore stays fixed while the
//! owning controller keeps changing its own copy.
//!
//! # Example
//!
//! ```rust
//! use inboxguard_dashboard::selection::SelectionSet;
//!
//! let mut selected = SelectionSet::new();
//! selected.insert("mbx_1");
//! let snapshot = selected.clone();
//!
//! selected.toggle("mbx_1");
//! assert!(selected.is_empty());
//! assert!(snapshot.contains("mbx_1"));
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unordered set of unique item identifiers
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: Arc<HashSet<String>>,
}

impl SelectionSet {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is selected
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Add `id`; returns `true` if it was not already present
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.ids.contains(&id) {
            return false;
        }
        Arc::make_mut(&mut self.ids).insert(id)
    }

    /// Remove `id`; returns `true` if it was present
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.ids.contains(id) {
            return false;
        }
        Arc::make_mut(&mut self.ids).remove(id)
    }

    /// Flip membership of `id`; returns whether it is selected afterwards
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.insert(id)
        }
    }

    /// Drop every id
    pub fn clear(&mut self) {
        if !self.ids.is_empty() {
            self.ids = Arc::default();
        }
    }

    /// Number of selected ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over selected ids in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Selected ids sorted lexicographically
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

impl PartialEq for SelectionSet {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ids, &other.ids) || self.ids == other.ids
    }
}

impl Eq for SelectionSet {}

impl FromIterator<String> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<'a> FromIterator<&'a str> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl Extend<String> for SelectionSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl Serialize for SelectionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_sorted_vec().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SelectionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<String>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut set = SelectionSet::new();
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
        assert_eq!(set.len(), 1);
        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_toggle_reports_membership() {
        let mut set = SelectionSet::new();
        assert!(set.toggle("a"));
        assert!(set.contains("a"));
        assert!(!set.toggle("a"));
        assert!(!set.contains("a"));
    }

    #[test]
    fn test_clone_is_isolated_from_later_mutation() {
        let mut set: SelectionSet = ["a", "b"].into_iter().collect();
        let snapshot = set.clone();

        set.remove("a");
        set.insert("c");

        assert_eq!(snapshot.to_sorted_vec(), vec!["a", "b"]);
        assert_eq!(set.to_sorted_vec(), vec!["b", "c"]);
    }

    #[test]
    fn test_clear() {
        let mut set: SelectionSet = ["a", "b"].into_iter().collect();
        let snapshot = set.clone();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let left: SelectionSet = ["a", "b", "c"].into_iter().collect();
        let right: SelectionSet = ["c", "a", "b"].into_iter().collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_extend_deduplicates() {
        let mut set: SelectionSet = ["a"].into_iter().collect();
        set.extend(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serializes_sorted() {
        let set: SelectionSet = ["c", "a", "b"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b","c"]"#);

        let back: SelectionSet = serde_json::from_str(r#"["b","a","b"]"#).unwrap();
        assert_eq!(back.to_sorted_vec(), vec!["a", "b"]);
    }
}
