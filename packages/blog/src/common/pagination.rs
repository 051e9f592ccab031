//! Offset-based pagination types for listing queries
//!
//! # Usage
//!
//! ```rust,ignore
//! let args = PageArgs::new(20, 40);
//! let page: Page<BlogPost> = ListingQuery::new(&criteria).fetch_page(&args, pool).await?;
//! assert!(page.items.len() as i64 <= args.limit);
//! assert!(page.total_count >= page.items.len() as i64);
//! ```

use serde::Serialize;

/// Limit used when the caller did not ask for one.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

// ============================================================================
// Pagination Arguments
// ============================================================================

/// Validated LIMIT/OFFSET pair.
///
/// Both values are non-negative. No upper bound is enforced here; callers
/// that face the public internet cap `limit` before building the args.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    pub limit: i64,
    pub offset: i64,
}

impl PageArgs {
    /// Negative inputs clamp to zero.
    pub fn new(limit: i64, offset: i64) -> Self {
        PageArgs {
            limit: limit.max(0),
            offset: offset.max(0),
        }
    }

    /// Build from raw request values, falling back to the default limit.
    pub fn from_params(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self::new(limit.unwrap_or(DEFAULT_PAGE_LIMIT), offset.unwrap_or(0))
    }

    /// Args for the page that follows this one.
    pub fn next(&self) -> Self {
        Self::new(self.limit, self.offset.saturating_add(self.limit))
    }
}

impl Default for PageArgs {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT, 0)
    }
}

// ============================================================================
// Page
// ============================================================================

/// One page of results plus the total matching the same filter.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: i64) -> Self {
        Page { items, total_count }
    }

    /// Empty page (refused or degraded listing).
    pub fn empty() -> Self {
        Page {
            items: Vec::new(),
            total_count: 0,
        }
    }

    pub fn has_next_page(&self, args: &PageArgs) -> bool {
        args.offset.saturating_add(self.items.len() as i64) < self.total_count
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
