//! In-memory snapshot backend for tests and ephemeral runs.

use super::snapshot_repo::{RepoResult, SnapshotRepository};
use serde_json::Value;
use std::cell::{Cell, RefCell};

/// Keeps the last written snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    snapshot: RefCell<Option<Value>>,
    writes: Cell<usize>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository whose first `read` returns `snapshot`.
    pub fn with_snapshot(snapshot: Value) -> Self {
        Self {
            snapshot: RefCell::new(Some(snapshot)),
            writes: Cell::new(0),
        }
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> Option<Value> {
        self.snapshot.borrow().clone()
    }

    /// Number of `write` calls received.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl SnapshotRepository for MemoryRepository {
    fn read(&self) -> RepoResult<Option<Value>> {
        Ok(self.snapshot.borrow().clone())
    }

    fn write(&self, snapshot: &Value) -> RepoResult<()> {
        *self.snapshot.borrow_mut() = Some(snapshot.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
