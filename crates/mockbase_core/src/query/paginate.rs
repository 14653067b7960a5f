//! Slice and page pagination modes.
//!
//! # Invariants
//! - Slice mode returns a plain list; page mode returns `PaginatedItems`.
//! - `pages` is at least 1, even for an empty result.
//! - Out-of-range indices clamp to the list bounds instead of failing.

use crate::model::item::Item;
use serde::Serialize;

/// Page-mode result envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedItems {
    pub first: usize,
    pub prev: Option<usize>,
    pub next: Option<usize>,
    pub last: usize,
    pub pages: usize,
    /// Total filtered record count across all pages.
    pub items: usize,
    pub data: Vec<Item>,
}

/// Pagination mode resolved from the reserved query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// No pagination parameters: return everything.
    None,
    /// `_start` / `_end` / `_limit`.
    Slice {
        start: Option<usize>,
        end: Option<usize>,
        limit: Option<usize>,
    },
    /// `_page` / `_per_page`, already defaulted.
    Page { page: usize, per_page: usize },
}

/// Returns the `[start, end)` window of slice mode.
pub fn slice(
    items: Vec<Item>,
    start: Option<usize>,
    end: Option<usize>,
    limit: Option<usize>,
) -> Vec<Item> {
    let len = items.len();
    let from = start.unwrap_or(0).min(len);
    let to = match (end, limit) {
        (Some(end), _) => end,
        (None, Some(limit)) => from.saturating_add(limit),
        (None, None) => len,
    }
    .clamp(from, len);

    items.into_iter().skip(from).take(to - from).collect()
}

/// Builds one page of results with navigation metadata.
///
/// `page` and `per_page` are clamped to at least 1, and `page` to at most
/// the number of pages.
pub fn paginate(items: Vec<Item>, page: usize, per_page: usize) -> PaginatedItems {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, pages);

    let start = (page - 1) * per_page;
    let data = items.into_iter().skip(start).take(per_page).collect();

    PaginatedItems {
        first: 1,
        prev: (page > 1).then(|| page - 1),
        next: (page < pages).then(|| page + 1),
        last: pages,
        pages,
        items: total_items,
        data,
    }
}
