//! Snapshot persistence contracts and backends.
//!
//! # Responsibility
//! - Define the read/write contract the service uses for write-back.
//! - Provide JSON file, in-memory and SQLite snapshot backends.
//!
//! # Invariants
//! - `read` returns `None` when nothing was persisted yet.
//! - `write` stores the complete snapshot; there are no partial writes.

pub mod json_file;
pub mod memory;
pub mod snapshot_repo;
pub mod sqlite;

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;
pub use snapshot_repo::{RepoError, RepoResult, SnapshotRepository};
pub use sqlite::SqliteSnapshotRepository;
