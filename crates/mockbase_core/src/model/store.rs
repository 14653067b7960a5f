//! Loaded document store.
//!
//! # Responsibility
//! - Parse a persisted snapshot into named collections.
//! - Normalize list-collection identifiers exactly once at construction.
//! - Render the store back into its snapshot form for write-back.
//!
//! # Invariants
//! - Collection order follows the snapshot's top-level key order.
//! - Normalization only fills absent ids and stringifies numeric ids; any
//!   other existing `id` value is left untouched.

use super::id::{random_id, DEFAULT_ID_BYTES, ID_FIELD};
use super::item::{Collection, CollectionKind, Item};
use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Number, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot shape error raised while constructing a `Store`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Top-level snapshot is not a JSON object.
    NotAnObject,
    /// A collection value is neither a list of records nor a record.
    InvalidCollection { name: String, reason: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "snapshot must be a JSON object of collections"),
            Self::InvalidCollection { name, reason } => {
                write!(f, "invalid collection `{name}`: {reason}")
            }
        }
    }
}

impl Error for StoreError {}

/// In-memory document: collection name to list or singleton collection.
///
/// Not thread-safe; callers thread one owned `Store` through the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    collections: IndexMap<String, Collection>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a snapshot and normalizes identifiers.
    ///
    /// # Errors
    /// - `NotAnObject` when the snapshot root is not an object.
    /// - `InvalidCollection` when a value is a scalar or a list holding
    ///   non-record entries.
    pub fn from_snapshot(snapshot: Value) -> Result<Self, StoreError> {
        Self::from_snapshot_with(snapshot, DEFAULT_ID_BYTES)
    }

    /// Same as [`Store::from_snapshot`] with a custom generated-id width.
    pub fn from_snapshot_with(snapshot: Value, id_bytes: usize) -> Result<Self, StoreError> {
        let Value::Object(root) = snapshot else {
            return Err(StoreError::NotAnObject);
        };

        let mut collections = IndexMap::with_capacity(root.len());
        for (name, value) in root {
            let collection = parse_collection(&name, value)?;
            collections.insert(name, collection);
        }

        let mut store = Self { collections };
        let fixed = store.normalize_ids(id_bytes);
        debug!(
            "event=ids_normalized module=store status=ok collections={} fixed={}",
            store.collections.len(),
            fixed
        );
        Ok(store)
    }

    /// Renders the store as a snapshot document.
    pub fn to_snapshot(&self) -> Value {
        let mut root = Map::with_capacity(self.collections.len());
        for (name, collection) in &self.collections {
            root.insert(name.clone(), collection.to_value());
        }
        Value::Object(root)
    }

    pub fn has(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.get_mut(name)
    }

    pub fn kind(&self, name: &str) -> Option<CollectionKind> {
        self.collections.get(name).map(Collection::kind)
    }

    /// Collection names in snapshot order.
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Mutable iteration over all collections, in snapshot order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Collection)> {
        self.collections.iter_mut()
    }

    /// Fills absent ids and stringifies numeric ids in every list collection.
    ///
    /// Returns the number of records whose `id` changed.
    fn normalize_ids(&mut self, id_bytes: usize) -> usize {
        let mut fixed = 0;
        for collection in self.collections.values_mut() {
            let Some(items) = collection.as_list_mut() else {
                continue;
            };
            for item in items.iter_mut() {
                if normalize_item_id(item, id_bytes) {
                    fixed += 1;
                }
            }
        }
        fixed
    }
}

fn parse_collection(name: &str, value: Value) -> Result<Collection, StoreError> {
    match value {
        Value::Object(item) => Ok(Collection::Singleton(item)),
        Value::Array(entries) => {
            let mut items = Vec::with_capacity(entries.len());
            for (index, entry) in entries.into_iter().enumerate() {
                match entry {
                    Value::Object(item) => items.push(item),
                    other => {
                        return Err(StoreError::InvalidCollection {
                            name: name.to_string(),
                            reason: format!(
                                "entry {index} is {}, expected a record",
                                value_kind(&other)
                            ),
                        });
                    }
                }
            }
            Ok(Collection::List(items))
        }
        other => Err(StoreError::InvalidCollection {
            name: name.to_string(),
            reason: format!("value is {}, expected a list or a record", value_kind(&other)),
        }),
    }
}

fn normalize_item_id(item: &mut Item, id_bytes: usize) -> bool {
    match item.get(ID_FIELD) {
        None => {
            item.insert(ID_FIELD.to_string(), Value::String(random_id(id_bytes)));
            true
        }
        Some(Value::Number(number)) => {
            let text = number_to_id(number);
            item.insert(ID_FIELD.to_string(), Value::String(text));
            true
        }
        Some(_) => false,
    }
}

/// Stringifies a numeric id the way it reads in the source document:
/// integral floats lose their trailing `.0`.
pub(crate) fn number_to_id(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 9.0e15 => format!("{}", float as i64),
        _ => number.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a record",
    }
}
