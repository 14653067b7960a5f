//! List query grammar: filtering, sorting, pagination.
//!
//! # Responsibility
//! - Parse flat string-keyed request parameters into a typed `ListQuery`.
//! - Provide the filter, sort and pagination stages the engine runs in order.
//!
//! # Invariants
//! - Reserved parameters never become filter conditions.
//! - Unparsable numeric reserved parameters are dropped, never rejected.
//! - Sorting is stable; absent sort keys keep insertion order.

pub mod filter;
pub mod paginate;
pub mod params;
pub mod sort;

pub use filter::{Condition, Operator};
pub use paginate::{PaginatedItems, Pagination};
pub use params::{ensure_list, ListQuery};
pub use sort::SortKey;
