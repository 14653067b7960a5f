//! JSON file snapshot backend.
//!
//! # Invariants
//! - A missing file reads as "no snapshot", not as an error.
//! - Writes go to a sibling temp file first and are renamed into place, so
//!   readers never observe a half-written document.

use super::snapshot_repo::{RepoError, RepoResult, SnapshotRepository};
use log::{debug, error};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Stores the snapshot as a pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotRepository for JsonFileRepository {
    fn read(&self) -> RepoResult<Option<Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        let snapshot = serde_json::from_str(&text)?;
        debug!(
            "event=snapshot_read module=repo status=ok backend=json bytes={}",
            text.len()
        );
        Ok(Some(snapshot))
    }

    fn write(&self, snapshot: &Value) -> RepoResult<()> {
        let started_at = Instant::now();
        let body = serde_json::to_string_pretty(snapshot)?;
        let temp = self.temp_path();

        let result = fs::write(&temp, body.as_bytes()).and_then(|()| fs::rename(&temp, &self.path));
        if let Err(err) = result {
            error!(
                "event=snapshot_write module=repo status=error backend=json error={}",
                err
            );
            let _ = fs::remove_file(&temp);
            return Err(RepoError::Io(err));
        }

        debug!(
            "event=snapshot_write module=repo status=ok backend=json bytes={} duration_ms={}",
            body.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileRepository;
    use std::path::Path;

    #[test]
    fn temp_path_is_a_sibling() {
        let repo = JsonFileRepository::new("/data/db.json");
        assert_eq!(repo.temp_path(), Path::new("/data/db.json.tmp"));
    }
}
