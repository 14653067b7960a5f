//! Snapshot repository trait and error type.

use crate::model::store::StoreError;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure surfaced to callers of mutations and loads.
#[derive(Debug)]
pub enum RepoError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Sqlite(rusqlite::Error),
    /// Snapshot table written by a newer schema than this binary knows.
    SchemaTooNew { found: u32, supported: u32 },
    Store(StoreError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "snapshot io error: {err}"),
            Self::Json(err) => write!(f, "snapshot json error: {err}"),
            Self::Sqlite(err) => write!(f, "snapshot sqlite error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "snapshot database schema version {found} is newer than supported {supported}"
            ),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted snapshot: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Durable home of the store snapshot.
pub trait SnapshotRepository {
    /// Loads the last written snapshot, or `None` when none exists.
    fn read(&self) -> RepoResult<Option<Value>>;
    /// Replaces the persisted snapshot.
    fn write(&self, snapshot: &Value) -> RepoResult<()>;
}

impl<R: SnapshotRepository + ?Sized> SnapshotRepository for &R {
    fn read(&self) -> RepoResult<Option<Value>> {
        (**self).read()
    }

    fn write(&self, snapshot: &Value) -> RepoResult<()> {
        (**self).write(snapshot)
    }
}
