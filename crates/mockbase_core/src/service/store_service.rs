//! Store use-case service.
//!
//! # Responsibility
//! - Load and normalize the store from a snapshot repository.
//! - Delegate reads to the engine; write back after every applied mutation.
//!
//! # Invariants
//! - A mutation that returns not-found never triggers a write.
//! - In-memory edits are not rolled back when the write fails; the store
//!   stays ahead of the persisted snapshot until the next successful write.

use crate::engine::{FindResult, QueryEngine};
use crate::model::item::{item_id, Item};
use crate::model::store::Store;
use crate::query::params::ListQuery;
use crate::repo::snapshot_repo::{RepoResult, SnapshotRepository};
use log::{debug, error, info};
use std::time::Instant;

/// Facade over one store, its engine and its persistence backend.
pub struct StoreService<R: SnapshotRepository> {
    repo: R,
    engine: QueryEngine,
    store: Store,
}

impl<R: SnapshotRepository> StoreService<R> {
    /// Loads the store with a default engine.
    pub fn open(repo: R) -> RepoResult<Self> {
        Self::open_with(repo, QueryEngine::new())
    }

    /// Loads the store from `repo` and normalizes identifiers.
    ///
    /// An empty repository yields an empty store.
    ///
    /// # Errors
    /// - Read or parse failures from the repository.
    /// - `RepoError::Store` when the snapshot does not have the store shape.
    pub fn open_with(repo: R, engine: QueryEngine) -> RepoResult<Self> {
        let started_at = Instant::now();
        let store = match repo.read() {
            Ok(Some(snapshot)) => {
                Store::from_snapshot_with(snapshot, engine.options().id_bytes).map_err(|err| {
                    error!("event=store_load module=service status=error error={err}");
                    err
                })?
            }
            Ok(None) => Store::new(),
            Err(err) => {
                error!("event=store_load module=service status=error error={err}");
                return Err(err);
            }
        };

        info!(
            "event=store_load module=service status=ok collections={} duration_ms={}",
            store.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            repo,
            engine,
            store,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn has(&self, name: &str) -> bool {
        self.engine.has(&self.store, name)
    }

    pub fn collection_names(&self) -> Vec<&str> {
        self.store.collection_names()
    }

    pub fn find(&self, name: &str, query: &ListQuery) -> Option<FindResult> {
        let filters: Vec<String> = query.conditions.iter().map(|cond| cond.key()).collect();
        debug!(
            "event=find module=service collection={name} filters={}",
            filters.join(",")
        );
        self.engine.find(&self.store, name, query)
    }

    pub fn find_by_id(&self, name: &str, id: &str, related: &[String]) -> Option<Item> {
        self.engine.find_by_id(&self.store, name, id, related)
    }

    pub fn create(&mut self, name: &str, data: Item) -> RepoResult<Option<Item>> {
        let created = self.engine.create(&mut self.store, name, data);
        self.after_mutation("create", name, created)
    }

    pub fn update(&mut self, name: &str, data: Item) -> RepoResult<Option<Item>> {
        let updated = self.engine.update(&mut self.store, name, data);
        self.after_mutation("update", name, updated)
    }

    pub fn patch(&mut self, name: &str, body: Item) -> RepoResult<Option<Item>> {
        let patched = self.engine.patch(&mut self.store, name, body);
        self.after_mutation("patch", name, patched)
    }

    pub fn update_by_id(&mut self, name: &str, id: &str, body: Item) -> RepoResult<Option<Item>> {
        let updated = self.engine.update_by_id(&mut self.store, name, id, body);
        self.after_mutation("update_by_id", name, updated)
    }

    pub fn replace_by_id(&mut self, name: &str, id: &str, body: Item) -> RepoResult<Option<Item>> {
        let replaced = self.engine.replace_by_id(&mut self.store, name, id, body);
        self.after_mutation("replace_by_id", name, replaced)
    }

    pub fn destroy_by_id(
        &mut self,
        name: &str,
        id: &str,
        dependents: &[String],
    ) -> RepoResult<Option<Item>> {
        let removed = self
            .engine
            .destroy_by_id(&mut self.store, name, id, dependents);
        self.after_mutation("destroy_by_id", name, removed)
    }

    /// Writes the current store through the repository.
    pub fn persist(&self) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.repo.write(&self.store.to_snapshot()) {
            Ok(()) => {
                debug!(
                    "event=persist module=service status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=persist module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn after_mutation(
        &self,
        op: &str,
        name: &str,
        result: Option<Item>,
    ) -> RepoResult<Option<Item>> {
        let Some(item) = result else {
            debug!("event=mutation module=service status=not_found op={op} collection={name}");
            return Ok(None);
        };

        info!(
            "event=mutation module=service status=ok op={op} collection={name} id={}",
            item_id(&item).unwrap_or("-")
        );
        self.persist()?;
        Ok(Some(item))
    }
}
