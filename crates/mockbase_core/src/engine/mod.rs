//! Query and mutation engine over a loaded `Store`.
//!
//! # Responsibility
//! - Answer lookups, list queries and relation embedding.
//! - Apply create/update/delete edits in place, keeping ids immutable and
//!   foreign keys consistent on delete.
//!
//! # Invariants
//! - The engine holds no store state; every call receives the store.
//! - Not-found (missing collection, missing id, wrong collection kind) is
//!   `None`, never an error.
//! - Mutations never persist; callers decide when to write back.

mod embed;
mod find;
mod mutate;

use crate::model::id::DEFAULT_ID_BYTES;
use crate::model::item::{item_id, Collection, Item};
use crate::model::store::Store;
use crate::naming::{EnglishNaming, NamingConvention};

pub use find::FindResult;

/// Default page size when only `_page` is supplied.
pub const DEFAULT_PER_PAGE: usize = 10;

/// Tunables for engine behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Page size used in page mode when `_per_page` is absent.
    pub default_per_page: usize,
    /// Random bytes per generated id (two hex chars each).
    pub id_bytes: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            id_bytes: DEFAULT_ID_BYTES,
        }
    }
}

/// Stateless-per-call query engine.
pub struct QueryEngine {
    naming: Box<dyn NamingConvention>,
    options: EngineOptions,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    /// Creates an engine with English naming rules and default options.
    pub fn new() -> Self {
        Self {
            naming: Box::new(EnglishNaming),
            options: EngineOptions::default(),
        }
    }

    /// Replaces the relation naming convention.
    pub fn with_naming(mut self, naming: impl NamingConvention + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn naming(&self) -> &dyn NamingConvention {
        self.naming.as_ref()
    }

    /// Returns whether `name` is a collection in the store.
    pub fn has(&self, store: &Store, name: &str) -> bool {
        store.has(name)
    }

    /// Returns the raw collection, list or singleton.
    pub fn get<'s>(&self, store: &'s Store, name: &str) -> Option<&'s Collection> {
        store.get(name)
    }

    /// Finds one record by id in a list collection and embeds `related`.
    ///
    /// Returns `None` when the collection is missing, is a singleton, or has
    /// no record with that id.
    pub fn find_by_id(
        &self,
        store: &Store,
        name: &str,
        id: &str,
        related: &[String],
    ) -> Option<Item> {
        let items = store.get(name)?.as_list()?;
        let item = items.iter().find(|item| item_id(item) == Some(id))?;
        Some(self.embed_all(store, name, item, related))
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineOptions, QueryEngine};
    use crate::model::store::Store;
    use serde_json::json;

    fn store() -> Store {
        Store::from_snapshot(json!({
            "posts": [{"id": "1", "title": "a"}, {"id": "2", "title": "b"}],
            "profile": {"name": "typicode"},
        }))
        .unwrap()
    }

    #[test]
    fn has_and_get_reflect_store_keys() {
        let engine = QueryEngine::new();
        let store = store();
        assert!(engine.has(&store, "posts"));
        assert!(engine.has(&store, "profile"));
        assert!(!engine.has(&store, "comments"));
        assert!(engine.get(&store, "profile").unwrap().as_singleton().is_some());
        assert!(engine.get(&store, "comments").is_none());
    }

    #[test]
    fn find_by_id_requires_list_collection_and_match() {
        let engine = QueryEngine::new();
        let store = store();
        let found = engine.find_by_id(&store, "posts", "2", &[]).unwrap();
        assert_eq!(found["title"], json!("b"));
        assert!(engine.find_by_id(&store, "posts", "9", &[]).is_none());
        assert!(engine.find_by_id(&store, "profile", "1", &[]).is_none());
        assert!(engine.find_by_id(&store, "missing", "1", &[]).is_none());
    }

    #[test]
    fn options_default_to_ten_per_page() {
        let engine = QueryEngine::new().with_options(EngineOptions {
            default_per_page: 25,
            ..EngineOptions::default()
        });
        assert_eq!(engine.options().default_per_page, 25);
        assert_eq!(EngineOptions::default().default_per_page, 10);
    }
}
