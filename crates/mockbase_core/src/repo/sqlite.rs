//! SQLite snapshot backend.
//!
//! # Invariants
//! - One row per slot in `snapshots`; writes upsert the whole document.
//! - Stored bodies must parse back into JSON or reads fail with
//!   `InvalidData`.

use super::snapshot_repo::{RepoError, RepoResult, SnapshotRepository};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// Slot used when callers do not name one.
pub const DEFAULT_SLOT: &str = "default";

/// Stores the snapshot as a JSON text row in a migrated SQLite database.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
    slot: String,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Wraps a connection from `db::open_db*`, using the default slot.
    ///
    /// # Errors
    /// - Returns `InvalidData` when the `snapshots` table is missing, which
    ///   means migrations were not applied to this connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::try_with_slot(conn, DEFAULT_SLOT)
    }

    pub fn try_with_slot(conn: &'conn Connection, slot: impl Into<String>) -> RepoResult<Self> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'snapshots');",
            [],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::InvalidData(
                "snapshots table missing; open the connection with db::open_db".to_string(),
            ));
        }
        Ok(Self {
            conn,
            slot: slot.into(),
        })
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn read(&self) -> RepoResult<Option<Value>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM snapshots WHERE slot = ?1;",
                params![self.slot],
                |row| row.get(0),
            )
            .optional()?;

        let Some(body) = body else {
            return Ok(None);
        };
        let snapshot = serde_json::from_str(&body).map_err(|err| {
            RepoError::InvalidData(format!("slot `{}` holds invalid json: {err}", self.slot))
        })?;
        debug!(
            "event=snapshot_read module=repo status=ok backend=sqlite slot={}",
            self.slot
        );
        Ok(Some(snapshot))
    }

    fn write(&self, snapshot: &Value) -> RepoResult<()> {
        let body = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT INTO snapshots (slot, body, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(slot) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at;",
            params![self.slot, body],
        )?;
        debug!(
            "event=snapshot_write module=repo status=ok backend=sqlite slot={} bytes={}",
            self.slot,
            body.len()
        );
        Ok(())
    }
}
