//! Core of the mockbase document store.
//! Owns the store invariants, the query grammar and the mutation rules;
//! transports and CLIs are thin callers of this crate.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod naming;
pub mod query;
pub mod repo;
pub mod service;

pub use engine::{EngineOptions, FindResult, QueryEngine, DEFAULT_PER_PAGE};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::id::{random_id, ID_FIELD};
pub use model::item::{Collection, CollectionKind, Item};
pub use model::store::{Store, StoreError};
pub use naming::{EnglishNaming, NamingConvention};
pub use query::{ensure_list, Condition, ListQuery, Operator, PaginatedItems, SortKey};
pub use repo::{
    JsonFileRepository, MemoryRepository, RepoError, RepoResult, SnapshotRepository,
    SqliteSnapshotRepository,
};
pub use service::store_service::StoreService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
