//! Pagination and cross-page selection state for dashboard tables
//!
//! Every dashboard list (leads, mailboxes, domains, campaigns, audit log) owns
//! one [`PaginationSelectionController`]. It stores two independent pieces of
//! state:
//!
//! - the [`PaginationMeta`] of the page currently on screen, replaced wholesale
//!   after each fetch;
//! - a [`SelectionSet`] of row ids marked for a bulk action. It survives page
//!   changes and only shrinks through toggles or an explicit clear.
//!
//! The controller never holds item records, only their ids. Operations that
//! take items accept any slice of [`Identified`] values and read nothing but
//! the id.
//!
//! Stopping a checkbox click from also triggering a row's "open detail"
//! handler is the host's job.
//!
//! # Example
//!
//! ```rust
//! use inboxguard_dashboard::controller::PaginationSelectionController;
//! use inboxguard_dashboard::pagination::PaginationMeta;
//!
//! let page1 = ["a", "b", "c"];
//! let mut table = PaginationSelectionController::default();
//!
//! table.toggle_select_all(&page1);
//! assert!(table.is_all_selected(&page1));
//!
//! table.toggle_selection("b");
//! assert!(!table.is_all_selected(&page1));
//!
//! table.set_meta(PaginationMeta::from_total(2, 20, 100));
//! assert!(table.is_selected("a"));
//! ```

use serde::{Deserialize, Serialize};

use crate::pagination::{PaginationMeta, RowLimit, DEFAULT_PAGE};
use crate::selection::SelectionSet;

/// Anything that exposes a row identifier
///
/// Only the id is read; other fields of a row are ignored by the controller.
pub trait Identified {
    /// The row identifier
    fn id(&self) -> &str;
}

impl Identified for str {
    fn id(&self) -> &str {
        self
    }
}

impl Identified for String {
    fn id(&self) -> &str {
        self.as_str()
    }
}

impl<T: Identified + ?Sized> Identified for &T {
    fn id(&self) -> &str {
        (**self).id()
    }
}

/// Untyped JSON rows; an object without a string `id` yields `""`
///
/// The controller never stores an empty id, so such rows stay unselectable.
impl Identified for serde_json::Value {
    fn id(&self) -> &str {
        self.get("id").and_then(serde_json::Value::as_str).unwrap_or("")
    }
}

/// Serializable snapshot of a controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Pagination metadata at snapshot time
    pub meta: PaginationMeta,
    /// Selected ids, serialized sorted
    pub selected: SelectionSet,
    /// Revision counter at snapshot time
    #[serde(default)]
    pub revision: u64,
}

/// Paged list with cross-page multi-select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSelectionController {
    meta: PaginationMeta,
    selected: SelectionSet,
    revision: u64,
}

impl PaginationSelectionController {
    /// Create a controller on `initial_page` with an empty selection
    ///
    /// `total` starts at 0 and `total_pages` at 1 until the first
    /// [`set_meta`](Self::set_meta).
    #[must_use]
    pub fn new(initial_page: u32, initial_limit: RowLimit) -> Self {
        Self::with_page_and_limit(initial_page, initial_limit.get())
    }

    /// Like [`new`](Self::new) but with a raw limit
    ///
    /// The limit is stored as given. Hosts that take it from user input should
    /// go through [`RowLimit`] first.
    #[must_use]
    pub fn with_page_and_limit(initial_page: u32, initial_limit: u32) -> Self {
        Self {
            meta: PaginationMeta::initial(initial_page, initial_limit),
            selected: SelectionSet::new(),
            revision: 0,
        }
    }

    /// Rebuild a controller from a snapshot
    #[must_use]
    pub fn restore(state: ControllerState) -> Self {
        Self {
            meta: state.meta,
            selected: state.selected,
            revision: state.revision,
        }
    }

    /// Current pagination metadata
    pub fn meta(&self) -> &PaginationMeta {
        &self.meta
    }

    /// Replace pagination metadata after a fetch
    ///
    /// The selection is left untouched and `total_pages` is taken as given.
    pub fn set_meta(&mut self, meta: PaginationMeta) {
        if self.meta != meta {
            tracing::trace!(page = meta.page, total = meta.total, "pagination meta replaced");
            self.meta = meta;
            self.bump();
        }
    }

    /// Flip selection of a single row
    ///
    /// An empty id is ignored.
    pub fn toggle_selection(&mut self, id: &str) {
        if id.is_empty() {
            return;
        }
        let now_selected = self.selected.toggle(id);
        tracing::trace!(id, now_selected, count = self.selected.len(), "row selection toggled");
        self.bump();
    }

    /// Select or deselect every row in `items`
    ///
    /// When `items` is non-empty and fully selected, exactly those ids are
    /// removed. Otherwise all of them are added. Ids outside `items` are never
    /// touched, and an empty slice changes nothing. Rows with an empty id are
    /// skipped.
    pub fn toggle_select_all<T: Identified>(&mut self, items: &[T]) {
        let ids: Vec<&str> = items
            .iter()
            .map(Identified::id)
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return;
        }

        if self.is_all_selected(items) {
            for id in &ids {
                self.selected.remove(id);
            }
            tracing::trace!(rows = ids.len(), count = self.selected.len(), "visible rows deselected");
        } else {
            for id in &ids {
                self.selected.insert(*id);
            }
            tracing::trace!(rows = ids.len(), count = self.selected.len(), "visible rows selected");
        }
        self.bump();
    }

    /// Drop the whole selection, across all pages
    pub fn clear_selection(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        tracing::trace!(count = self.selected.len(), "selection cleared");
        self.selected.clear();
        self.bump();
    }

    /// Whether `id` is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Whether `items` has a selectable row and every selectable row is selected
    ///
    /// Rows with an empty id are not selectable and do not count.
    pub fn is_all_selected<T: Identified>(&self, items: &[T]) -> bool {
        let mut ids = items
            .iter()
            .map(Identified::id)
            .filter(|id| !id.is_empty())
            .peekable();
        ids.peek().is_some() && ids.all(|id| self.selected.contains(id))
    }

    /// Whether at least one row is selected
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Number of selected rows across all pages
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected ids, sorted
    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.to_sorted_vec()
    }

    /// Cheap snapshot of the current selection
    pub fn selection(&self) -> SelectionSet {
        self.selected.clone()
    }

    /// Counter bumped by every state change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Serializable snapshot of meta, selection and revision
    pub fn snapshot(&self) -> ControllerState {
        ControllerState {
            meta: self.meta,
            selected: self.selected.clone(),
            revision: self.revision,
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for PaginationSelectionController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, RowLimit::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row {
        id: String,
        #[allow(dead_code)]
        email: String,
    }

    impl Identified for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn rows(ids: &[&str]) -> Vec<Row> {
        ids.iter()
            .map(|id| Row {
                id: id.to_string(),
                email: format!("{id}@example.com"),
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let table = PaginationSelectionController::default();
        assert_eq!(*table.meta(), PaginationMeta::initial(1, 20));
        assert!(!table.has_selection());
        assert_eq!(table.revision(), 0);

        let table = PaginationSelectionController::new(3, RowLimit::Fifty);
        assert_eq!(table.meta().page, 3);
        assert_eq!(table.meta().limit, 50);
        assert_eq!(table.meta().total, 0);
        assert_eq!(table.meta().total_pages, 1);
    }

    #[test]
    fn test_toggle_symmetry() {
        let mut table = PaginationSelectionController::default();
        table.toggle_selection("x");
        let before = table.selection();

        table.toggle_selection("a");
        assert!(table.is_selected("a"));
        table.toggle_selection("a");

        assert!(!table.is_selected("a"));
        assert_eq!(table.selection(), before);
    }

    #[test]
    fn test_deselect_all_leaves_other_pages_alone() {
        let page = rows(&["a", "b"]);
        let mut table = PaginationSelectionController::default();
        table.toggle_selection("z");
        table.toggle_select_all(&page);
        assert!(table.is_all_selected(&page));

        table.toggle_select_all(&page);

        assert_eq!(table.selected_ids(), vec!["z"]);
    }

    #[test]
    fn test_select_all_is_union() {
        let page = rows(&["a", "b", "c"]);
        let mut table = PaginationSelectionController::default();
        table.toggle_selection("b");
        table.toggle_selection("z");

        table.toggle_select_all(&page);

        assert_eq!(table.selected_ids(), vec!["a", "b", "c", "z"]);
    }

    #[test]
    fn test_is_all_selected_empty_is_false() {
        let empty: Vec<Row> = Vec::new();
        let mut table = PaginationSelectionController::default();
        assert!(!table.is_all_selected(&empty));

        table.toggle_selection("a");
        assert!(!table.is_all_selected(&empty));
    }

    #[test]
    fn test_toggle_select_all_empty_is_noop() {
        let empty: Vec<Row> = Vec::new();
        let mut table = PaginationSelectionController::default();
        table.toggle_selection("a");
        let revision = table.revision();

        table.toggle_select_all(&empty);

        assert_eq!(table.selected_ids(), vec!["a"]);
        assert_eq!(table.revision(), revision);
    }

    #[test]
    fn test_selection_survives_set_meta() {
        let mut table = PaginationSelectionController::default();
        table.toggle_selection("a");

        table.set_meta(PaginationMeta {
            total: 100,
            page: 2,
            limit: 20,
            total_pages: 5,
        });

        assert!(table.is_selected("a"));
        assert_eq!(table.meta().page, 2);
    }

    #[test]
    fn test_set_meta_does_not_recompute_total_pages() {
        let mut table = PaginationSelectionController::default();
        table.set_meta(PaginationMeta {
            total: 100,
            page: 9,
            limit: 20,
            total_pages: 2,
        });
        assert_eq!(table.meta().total_pages, 2);
        assert_eq!(table.meta().page, 9);
    }

    #[test]
    fn test_clear_is_total() {
        let mut table = PaginationSelectionController::default();
        for id in ["a", "b", "c", "b"] {
            table.toggle_selection(id);
        }
        table.toggle_select_all(&rows(&["d", "e"]));

        table.clear_selection();

        assert!(!table.has_selection());
        for id in ["a", "b", "c", "d", "e"] {
            assert!(!table.is_selected(id));
        }
    }

    #[test]
    fn test_page_one_scenario() {
        let page1 = rows(&["a", "b", "c"]);
        let mut table = PaginationSelectionController::default();

        table.toggle_select_all(&page1);
        assert_eq!(table.selected_ids(), vec!["a", "b", "c"]);
        assert!(table.is_all_selected(&page1));

        table.toggle_selection("b");
        assert_eq!(table.selected_ids(), vec!["a", "c"]);
        assert!(!table.is_all_selected(&page1));

        table.toggle_select_all(&page1);
        assert_eq!(table.selected_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cross_page_scenario() {
        let mut table = PaginationSelectionController::default();
        table.set_meta(PaginationMeta::from_total(1, 20, 25));
        table.toggle_selection("a");

        table.set_meta(PaginationMeta::from_total(2, 20, 25));
        let page2 = rows(&["d", "e"]);

        assert!(table.is_selected("a"));
        assert!(!table.is_all_selected(&page2));
        assert!(table.has_selection());
    }

    #[test]
    fn test_accepts_plain_ids_and_json_rows() {
        let mut table = PaginationSelectionController::default();
        table.toggle_select_all(&["a", "b"]);
        assert!(table.is_all_selected(&vec!["a".to_string(), "b".to_string()]));

        let json_rows = vec![
            serde_json::json!({"id": "a", "email": "a@example.com"}),
            serde_json::json!({"id": "b", "status": "paused"}),
        ];
        assert!(table.is_all_selected(&json_rows));
    }

    #[test]
    fn test_rows_without_id_are_never_selected() {
        let mut table = PaginationSelectionController::default();
        let anonymous = vec![
            serde_json::json!({"email": "a@example.com"}),
            serde_json::json!({"id": 42}),
        ];

        table.toggle_select_all(&anonymous);
        table.toggle_selection("");

        assert!(!table.has_selection());
        assert!(!table.is_all_selected(&anonymous));
        assert_eq!(table.revision(), 0);

        let mixed = vec![
            serde_json::json!({"id": "a"}),
            serde_json::json!({"status": "paused"}),
            serde_json::json!({"id": "b"}),
        ];
        table.toggle_select_all(&mixed);
        assert_eq!(table.selected_ids(), vec!["a".to_string(), "b".to_string()]);
        assert!(table.is_all_selected(&mixed));
        assert!(!table.is_selected(""));

        table.toggle_select_all(&mixed);
        assert!(!table.has_selection());
    }

    #[test]
    fn test_revision_counts_changes_only() {
        let mut table = PaginationSelectionController::default();
        table.clear_selection();
        table.set_meta(PaginationMeta::initial(1, 20));
        assert_eq!(table.revision(), 0);

        table.toggle_selection("a");
        table.set_meta(PaginationMeta::from_total(1, 20, 3));
        table.clear_selection();
        assert_eq!(table.revision(), 3);
    }

    #[test]
    fn test_snapshot_is_stable() {
        let mut table = PaginationSelectionController::default();
        table.toggle_selection("a");
        let snapshot = table.snapshot();

        table.toggle_selection("b");

        assert_eq!(snapshot.selected.to_sorted_vec(), vec!["a"]);
        assert_eq!(table.selected_count(), 2);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut table = PaginationSelectionController::new(2, RowLimit::Fifty);
        table.set_meta(PaginationMeta::from_total(2, 50, 120));
        table.toggle_selection("mbx_2");
        table.toggle_selection("mbx_1");

        let json = serde_json::to_string(&table.snapshot()).unwrap();
        let restored = PaginationSelectionController::restore(serde_json::from_str(&json).unwrap());

        assert_eq!(restored, table);
        assert!(json.contains(r#""selected":["mbx_1","mbx_2"]"#));
    }
}
