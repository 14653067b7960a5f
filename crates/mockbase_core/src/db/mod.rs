//! SQLite bootstrap for the snapshot-table persistence backend.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections with required pragmas.
//! - Apply the snapshot schema migrations before the connection is used.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer binary is refused with
//!   `RepoError::SchemaTooNew`, not downgraded.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
