//! Pagination metadata and row-limit types
//!
//! [`PaginationMeta`] mirrors the `meta` object the backend returns with every
//! list response. It is a passive value: nothing here checks `page` against
//! `total_pages` unless a host view asks for it via [`PaginationMeta::clamp_page`].
//!
//! # Example
//!
//! ```rust
//! use inboxguard_dashboard::pagination::{PaginationMeta, RowLimit};
//!
//! let meta = PaginationMeta::from_total(2, RowLimit::Twenty.get(), 45);
//! assert_eq!(meta.total_pages, 3);
//! assert!(meta.has_next());
//! assert!(meta.has_prev());
//! assert_eq!(meta.offset(), 20);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default page for a freshly mounted table (1-indexed)
pub const DEFAULT_PAGE: u32 = 1;

/// Pagination metadata for one page of a list query
///
/// Serialized with the backend's field names, so `total_pages` travels as
/// `totalPages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of items across all pages for the current query
    pub total: u64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Items requested per page
    pub limit: u32,
    /// Number of pages, at least 1 even when `total` is 0
    pub total_pages: u32,
}

impl PaginationMeta {
    /// Metadata for a table that has not fetched anything yet
    ///
    /// ```rust
    /// use inboxguard_dashboard::pagination::PaginationMeta;
    ///
    /// let meta = PaginationMeta::initial(1, 20);
    /// assert_eq!(meta.total, 0);
    /// assert_eq!(meta.total_pages, 1);
    /// ```
    #[must_use]
    pub const fn initial(page: u32, limit: u32) -> Self {
        Self {
            total: 0,
            page,
            limit,
            total_pages: 1,
        }
    }

    /// Build metadata and derive `total_pages` from `total` and `limit`
    #[must_use]
    pub fn from_total(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        Self {
            total,
            page,
            limit,
            total_pages: total_pages_for(total, limit),
        }
    }

    /// Whether a page after the current one exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether a page before the current one exists
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Number of items preceding the current page
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1) as u64 * self.limit as u64
    }

    /// Clamp `page` into `1..=total_pages`
    ///
    /// ```rust
    /// use inboxguard_dashboard::pagination::PaginationMeta;
    ///
    /// let meta = PaginationMeta::from_total(1, 20, 41);
    /// assert_eq!(meta.clamp_page(0), 1);
    /// assert_eq!(meta.clamp_page(7), 3);
    /// ```
    #[must_use]
    pub fn clamp_page(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self::initial(DEFAULT_PAGE, RowLimit::default().get())
    }
}

impl fmt::Display for PaginationMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} of {} ({} total)",
            self.page, self.total_pages, self.total
        )
    }
}

/// `ceil(total / limit)`, never less than 1
#[must_use]
pub fn total_pages_for(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = total.div_ceil(limit).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Row limits offered by the dashboard's "rows per page" selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RowLimit {
    /// 20 rows per page
    #[default]
    Twenty,
    /// 50 rows per page
    Fifty,
}

impl RowLimit {
    /// All selectable limits, in display order
    pub const ALL: [RowLimit; 2] = [RowLimit::Twenty, RowLimit::Fifty];

    /// Numeric row count
    #[must_use]
    pub const fn get(self) -> u32 {
        match self {
            Self::Twenty => 20,
            Self::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for RowLimit {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            20 => Ok(Self::Twenty),
            50 => Ok(Self::Fifty),
            other => Err(Error::InvalidLimit(other)),
        }
    }
}

impl From<RowLimit> for u32 {
    fn from(limit: RowLimit) -> Self {
        limit.get()
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Page request sent by a host view to the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Requested page (1-indexed)
    pub page: u32,
    /// Requested row limit
    pub limit: RowLimit,
}

impl PageRequest {
    /// Create a page request; page 0 is bumped to 1
    #[must_use]
    pub fn new(page: u32, limit: RowLimit) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// Query-string pairs understood by the list endpoints
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.get().to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, RowLimit::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_meta() {
        let meta = PaginationMeta::initial(1, 20);
        assert_eq!(meta.total, 0);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.limit, 20);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next());
        assert!(!meta.has_prev());
    }

    #[test]
    fn test_default_meta_matches_initial() {
        assert_eq!(PaginationMeta::default(), PaginationMeta::initial(1, 20));
    }

    #[test]
    fn test_total_pages_for() {
        assert_eq!(total_pages_for(0, 20), 1);
        assert_eq!(total_pages_for(1, 20), 1);
        assert_eq!(total_pages_for(20, 20), 1);
        assert_eq!(total_pages_for(21, 20), 2);
        assert_eq!(total_pages_for(100, 20), 5);
        assert_eq!(total_pages_for(101, 50), 3);
    }

    #[test]
    fn test_total_pages_zero_limit() {
        assert_eq!(total_pages_for(10, 0), 10);
        let meta = PaginationMeta::from_total(1, 0, 10);
        assert_eq!(meta.limit, 1);
        assert_eq!(meta.total_pages, 10);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PaginationMeta::from_total(1, 20, 100).offset(), 0);
        assert_eq!(PaginationMeta::from_total(3, 20, 100).offset(), 40);
    }

    #[test]
    fn test_clamp_page() {
        let meta = PaginationMeta::from_total(1, 20, 100);
        assert_eq!(meta.clamp_page(0), 1);
        assert_eq!(meta.clamp_page(3), 3);
        assert_eq!(meta.clamp_page(9), 5);

        let empty = PaginationMeta::initial(1, 20);
        assert_eq!(empty.clamp_page(4), 1);
    }

    #[test]
    fn test_meta_wire_format() {
        let meta: PaginationMeta =
            serde_json::from_str(r#"{"total":100,"page":2,"limit":20,"totalPages":5}"#).unwrap();
        assert_eq!(meta, PaginationMeta::from_total(2, 20, 100));

        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["totalPages"], 5);
    }

    #[test]
    fn test_meta_display() {
        let meta = PaginationMeta::from_total(2, 20, 45);
        assert_eq!(meta.to_string(), "page 2 of 3 (45 total)");
    }

    #[test]
    fn test_row_limit_try_from() {
        assert_eq!(RowLimit::try_from(20).unwrap(), RowLimit::Twenty);
        assert_eq!(RowLimit::try_from(50).unwrap(), RowLimit::Fifty);
        assert!(matches!(RowLimit::try_from(25), Err(Error::InvalidLimit(25))));
    }

    #[test]
    fn test_row_limit_serde() {
        assert_eq!(serde_json::to_string(&RowLimit::Fifty).unwrap(), "50");
        assert_eq!(serde_json::from_str::<RowLimit>("20").unwrap(), RowLimit::Twenty);
        assert!(serde_json::from_str::<RowLimit>("10").is_err());
    }

    #[test]
    fn test_page_request_query_pairs() {
        let request = PageRequest::new(0, RowLimit::Fifty);
        assert_eq!(request.page, 1);
        assert_eq!(
            request.query_pairs(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "50".to_string()),
            ]
        );
    }
}
