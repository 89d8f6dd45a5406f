//! Host view for a paged dashboard table
//!
//! [`TableView`] wires a [`PaginationSelectionController`] to a
//! [`DataGateway`]: it fetches pages, keeps the rows currently on screen, and
//! sends the cross-page selection to bulk-action endpoints. Page changes never
//! clear the selection; only a successful bulk action or an explicit
//! [`TableView::clear_selection`] does.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::controller::{Identified, PaginationSelectionController};
use crate::error::Result;
use crate::gateway::DataGateway;
use crate::pagination::{PageRequest, PaginationMeta, RowLimit};
use crate::records::{BulkAction, BulkActionResult, Resource};

/// A dashboard table bound to one resource
#[derive(Debug)]
pub struct TableView<G, T> {
    gateway: Arc<G>,
    resource: Resource,
    limit: RowLimit,
    controller: PaginationSelectionController,
    items: Vec<T>,
}

impl<G, T> TableView<G, T>
where
    G: DataGateway,
    T: Identified + DeserializeOwned + Send,
{
    /// Mount a table; nothing is fetched until [`load`](Self::load)
    pub fn new(gateway: Arc<G>, resource: Resource, initial_page: u32, limit: RowLimit) -> Self {
        Self {
            gateway,
            resource,
            limit,
            controller: PaginationSelectionController::new(initial_page, limit),
            items: Vec::new(),
        }
    }

    /// Resource this table lists
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Rows on the current page
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Pagination metadata of the current page
    pub fn meta(&self) -> &PaginationMeta {
        self.controller.meta()
    }

    /// Current row limit
    pub fn limit(&self) -> RowLimit {
        self.limit
    }

    /// Selection state, for rendering checkboxes
    pub fn controller(&self) -> &PaginationSelectionController {
        &self.controller
    }

    /// Fetch `page` and make it current
    #[tracing::instrument(skip(self), fields(resource = %self.resource, limit = %self.limit))]
    pub async fn load(&mut self, page: u32) -> Result<()> {
        let request = PageRequest::new(page, self.limit);
        let fetched = self.gateway.fetch_page::<T>(self.resource, request).await?;
        tracing::debug!(
            rows = fetched.items.len(),
            total = fetched.meta.total,
            selected = self.controller.selected_count(),
            "page loaded"
        );
        self.items = fetched.items;
        self.controller.set_meta(fetched.meta);
        Ok(())
    }

    /// Reload the current page
    pub async fn refresh(&mut self) -> Result<()> {
        self.load(self.meta().page).await
    }

    /// Go to the next page; `Ok(false)` when already on the last one
    pub async fn next_page(&mut self) -> Result<bool> {
        if !self.meta().has_next() {
            return Ok(false);
        }
        self.load(self.meta().page + 1).await?;
        Ok(true)
    }

    /// Go to the previous page; `Ok(false)` when already on the first one
    pub async fn prev_page(&mut self) -> Result<bool> {
        if !self.meta().has_prev() {
            return Ok(false);
        }
        let page = self.meta().clamp_page(self.meta().page - 1);
        self.load(page).await?;
        Ok(true)
    }

    /// Change rows per page and go back to page 1
    pub async fn set_limit(&mut self, limit: RowLimit) -> Result<()> {
        self.limit = limit;
        self.load(1).await
    }

    /// Flip selection of one row
    pub fn toggle(&mut self, id: &str) {
        self.controller.toggle_selection(id);
    }

    /// Select or deselect every row on the current page
    pub fn toggle_all_visible(&mut self) {
        self.controller.toggle_select_all(&self.items);
    }

    /// Drop the selection on every page
    pub fn clear_selection(&mut self) {
        self.controller.clear_selection();
    }

    /// Whether every row on the current page is selected
    pub fn all_visible_selected(&self) -> bool {
        self.controller.is_all_selected(&self.items)
    }

    /// Selected rows on the current page
    pub fn visible_selected_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| self.controller.is_selected(item.id()))
            .count()
    }

    /// Apply `action` to every selected row, on all pages
    ///
    /// On success the selection is cleared and the current page reloaded,
    /// stepping back if the page no longer exists. On failure the selection
    /// is kept so the user can retry.
    ///
    /// `Err` means the action was not applied. A failed reload after a
    /// successful action is logged and leaves the previous rows in place.
    pub async fn apply_bulk_action(&mut self, action: BulkAction) -> Result<BulkActionResult> {
        if !self.controller.has_selection() {
            return Ok(BulkActionResult::default());
        }

        let ids = self.controller.selected_ids();
        let result = self
            .gateway
            .apply_bulk_action(self.resource, action, ids)
            .await?;
        self.controller.clear_selection();

        if let Err(e) = self.reload_after_bulk().await {
            tracing::warn!(
                resource = %self.resource,
                %action,
                error = %e,
                "Bulk action applied but the page could not be reloaded"
            );
        }

        Ok(result)
    }

    async fn reload_after_bulk(&mut self) -> Result<()> {
        self.refresh().await?;
        let last_page = self.meta().clamp_page(self.meta().page);
        if last_page != self.meta().page {
            self.load(last_page).await?;
        }
        Ok(())
    }
}
