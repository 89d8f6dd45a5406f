//! # inboxguard-dashboard
//!
//! Client-side core of the inboxguard operator dashboard: the state behind
//! every paged table (campaigns, mailboxes, domains, leads, audit log) and the
//! gateway those tables use to reach the backend API.
//!
//! ## Features
//!
//! - **Paged tables with cross-page selection**: [`PaginationSelectionController`]
//!   keeps pagination metadata and a set of selected row ids that survives
//!   page changes
//! - **Copy-on-write selection**: snapshots of the selection are cheap and never
//!   change underneath a renderer
//! - **API gateway**: JSON over `reqwest` with per-request timeouts, readable
//!   error messages and a pluggable 401 handler
//! - **Host view**: [`TableView`] ties the two together for any row type
//!
//! ## Example
//!
//! ```rust,no_run
//! use inboxguard_dashboard::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config.log)?;
//!
//!     let gateway = Arc::new(ApiClient::new(&config.api)?);
//!     let mut mailboxes: TableView<_, Mailbox> =
//!         TableView::new(gateway, Resource::Mailboxes, 1, config.table.row_limit()?);
//!
//!     mailboxes.load(1).await?;
//!     mailboxes.toggle_all_visible();
//!     mailboxes.next_page().await?;
//!     mailboxes.apply_bulk_action(BulkAction::Pause).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod observability;
pub mod pagination;
pub mod records;
pub mod selection;
pub mod table;

pub use controller::{ControllerState, Identified, PaginationSelectionController};
pub use table::TableView;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ApiConfig, Config, LogConfig, TableConfig};
    pub use crate::controller::{ControllerState, Identified, PaginationSelectionController};
    pub use crate::error::{Error, Result};
    pub use crate::gateway::{
        ApiClient, DataGateway, LoginRedirect, RequestOptions, UnauthorizedHandler,
    };
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{PageRequest, PaginationMeta, RowLimit};
    pub use crate::records::{
        AuditEntry, BulkAction, BulkActionRequest, BulkActionResult, Campaign, Domain, Lead,
        Mailbox, Page, Record, Resource, SystemMode,
    };
    pub use crate::selection::SelectionSet;
    pub use crate::table::TableView;

    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}
