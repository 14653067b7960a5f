//! Command execution against a `StoreService`.

use super::{Command, GlobalOptions};
use mockbase_core::db::open_db;
use mockbase_core::{
    ensure_list, EngineOptions, Item, JsonFileRepository, ListQuery, QueryEngine,
    SnapshotRepository, SqliteSnapshotRepository, StoreService,
};
use serde_json::Value;
use std::path::Path;

const SQLITE_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3"];

/// Runs `command` and returns pretty JSON for stdout.
pub fn execute(options: &GlobalOptions, command: Command) -> Result<String, String> {
    let engine = build_engine(options);
    if is_sqlite_path(&options.db) {
        let conn = open_db(&options.db).map_err(|err| err.to_string())?;
        let repo = SqliteSnapshotRepository::try_new(&conn).map_err(|err| err.to_string())?;
        run(repo, engine, command)
    } else {
        run(JsonFileRepository::new(&options.db), engine, command)
    }
}

fn build_engine(options: &GlobalOptions) -> QueryEngine {
    let mut engine_options = EngineOptions::default();
    if let Some(per_page) = options.per_page {
        engine_options.default_per_page = per_page.max(1);
    }
    QueryEngine::new().with_options(engine_options)
}

fn is_sqlite_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SQLITE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn run<R: SnapshotRepository>(
    repo: R,
    engine: QueryEngine,
    command: Command,
) -> Result<String, String> {
    let mut service = StoreService::open_with(repo, engine).map_err(|err| err.to_string())?;

    let result: Option<Value> = match command {
        Command::Collections => {
            let listing = service
                .collection_names()
                .into_iter()
                .map(|name| {
                    let kind = service.store().kind(name).map(|kind| {
                        serde_json::to_value(kind).unwrap_or(Value::Null)
                    });
                    (name.to_string(), kind.unwrap_or(Value::Null))
                })
                .collect::<serde_json::Map<String, Value>>();
            Some(Value::Object(listing))
        }
        Command::List { collection, params } => {
            let pairs = params
                .iter()
                .map(|param| parse_pair(param))
                .collect::<Result<Vec<_>, _>>()?;
            let query = ListQuery::from_pairs(pairs);
            service
                .find(&collection, &query)
                .map(|found| found.to_value())
        }
        Command::Get {
            collection,
            id,
            embed,
        } => service
            .find_by_id(&collection, &id, &ensure_list(embed))
            .map(Value::Object),
        Command::Create { collection, json } => service
            .create(&collection, parse_item(&json)?)
            .map_err(|err| err.to_string())?
            .map(Value::Object),
        Command::Update {
            collection,
            id,
            json,
        } => service
            .update_by_id(&collection, &id, parse_item(&json)?)
            .map_err(|err| err.to_string())?
            .map(Value::Object),
        Command::Replace {
            collection,
            id,
            json,
        } => service
            .replace_by_id(&collection, &id, parse_item(&json)?)
            .map_err(|err| err.to_string())?
            .map(Value::Object),
        Command::Set { collection, json } => service
            .update(&collection, parse_item(&json)?)
            .map_err(|err| err.to_string())?
            .map(Value::Object),
        Command::Patch { collection, json } => service
            .patch(&collection, parse_item(&json)?)
            .map_err(|err| err.to_string())?
            .map(Value::Object),
        Command::Delete {
            collection,
            id,
            dependents,
        } => service
            .destroy_by_id(&collection, &id, &ensure_list(dependents))
            .map_err(|err| err.to_string())?
            .map(Value::Object),
    };

    let value = result.ok_or_else(|| "not found".to_string())?;
    serde_json::to_string_pretty(&value).map_err(|err| err.to_string())
}

fn parse_pair(param: &str) -> Result<(String, String), String> {
    param
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{param}`"))
}

fn parse_item(json: &str) -> Result<Item, String> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(item)) => Ok(item),
        Ok(_) => Err("record body must be a JSON object".to_string()),
        Err(err) => Err(format!("invalid JSON body: {err}")),
    }
}
