use mockbase_core::db::migrations::latest_version;
use mockbase_core::db::{open_db, open_db_in_memory};
use mockbase_core::{
    Item, JsonFileRepository, ListQuery, MemoryRepository, RepoError, RepoResult,
    SnapshotRepository, SqliteSnapshotRepository, StoreService,
};
use rusqlite::Connection;
use serde_json::{json, Value};

fn record(value: Value) -> Item {
    value.as_object().cloned().unwrap()
}

struct FailingWrites {
    snapshot: Value,
}

impl SnapshotRepository for FailingWrites {
    fn read(&self) -> RepoResult<Option<Value>> {
        Ok(Some(self.snapshot.clone()))
    }

    fn write(&self, _snapshot: &Value) -> RepoResult<()> {
        Err(RepoError::InvalidData("disk full".to_string()))
    }
}

#[test]
fn json_file_missing_reads_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("db.json"));
    assert!(repo.read().unwrap().is_none());

    let service = StoreService::open(repo).unwrap();
    assert!(service.store().is_empty());
}

#[test]
fn json_file_round_trips_through_the_service() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(
        &path,
        r#"{"posts": [{"id": 1, "title": "a"}], "comments": [], "profile": {"name": "x"}}"#,
    )
    .unwrap();

    {
        let mut service = StoreService::open(JsonFileRepository::new(&path)).unwrap();
        service
            .update_by_id("posts", "1", record(json!({"title": "b"})))
            .unwrap()
            .unwrap();
    }

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["posts"], json!([{"id": "1", "title": "b"}]));
    assert_eq!(written["profile"], json!({"name": "x"}));
    assert!(!dir.path().join("db.json.tmp").exists());

    let reopened = StoreService::open(JsonFileRepository::new(&path)).unwrap();
    assert_eq!(
        reopened.find_by_id("posts", "1", &[]).unwrap()["title"],
        json!("b")
    );
}

#[test]
fn json_file_parse_errors_propagate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = StoreService::open(JsonFileRepository::new(&path))
        .err()
        .unwrap();
    assert!(matches!(err, RepoError::Json(_)));
}

#[test]
fn malformed_snapshot_shape_is_a_store_error() {
    let repo = MemoryRepository::with_snapshot(json!({"posts": 3}));
    let err = StoreService::open(repo).err().unwrap();
    assert!(matches!(err, RepoError::Store(_)));
}

#[test]
fn sqlite_snapshot_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    assert!(repo.read().unwrap().is_none());

    repo.write(&json!({"posts": [{"id": "1"}]})).unwrap();
    repo.write(&json!({"posts": [{"id": "2"}]})).unwrap();
    assert_eq!(repo.read().unwrap(), Some(json!({"posts": [{"id": "2"}]})));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_slots_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let first = SqliteSnapshotRepository::try_with_slot(&conn, "first").unwrap();
    let second = SqliteSnapshotRepository::try_with_slot(&conn, "second").unwrap();

    first.write(&json!({"a": []})).unwrap();
    assert!(second.read().unwrap().is_none());
    assert_eq!(first.slot(), "first");
}

#[test]
fn sqlite_service_persists_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
        repo.write(&json!({"posts": []})).unwrap();
        let mut service = StoreService::open(repo).unwrap();
        service
            .create("posts", record(json!({"title": "stored"})))
            .unwrap()
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let service = StoreService::open(SqliteSnapshotRepository::try_new(&conn).unwrap()).unwrap();
    let posts = service
        .find("posts", &ListQuery::from_pairs([("title", "stored")]))
        .unwrap()
        .into_items()
        .unwrap();
    assert_eq!(posts.len(), 1);
}

#[test]
fn sqlite_repository_requires_migrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteSnapshotRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn migrations_set_user_version_and_refuse_newer_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");

    let conn = open_db(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
        .unwrap();
    drop(conn);

    let err = open_db(&path).err().unwrap();
    assert!(matches!(
        err,
        RepoError::SchemaTooNew { found, supported } if found == supported + 1
    ));
}

#[test]
fn failed_write_leaves_memory_ahead_of_persistence() {
    let mut service = StoreService::open(FailingWrites {
        snapshot: json!({"posts": [{"id": "1", "title": "a"}]}),
    })
    .unwrap();

    let err = service
        .update_by_id("posts", "1", record(json!({"title": "b"})))
        .unwrap_err();
    assert!(err.to_string().contains("disk full"));

    assert_eq!(
        service.find_by_id("posts", "1", &[]).unwrap()["title"],
        json!("b")
    );
    assert!(service.persist().is_err());
}
