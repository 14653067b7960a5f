//! Record and collection shapes.
//!
//! # Responsibility
//! - Model records as ordered, schema-free field maps.
//! - Distinguish list collections from singleton collections.
//!
//! # Invariants
//! - Field order inside a record follows insertion order.
//! - A `Collection` value never changes variant once loaded.

use super::id::ID_FIELD;
use super::store::number_to_id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One schema-free record: an ordered mapping from field name to JSON value.
pub type Item = Map<String, Value>;

/// Shape of a collection, fixed by the snapshot at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Ordered sequence of identified records.
    List,
    /// One record without identifier requirements.
    Singleton,
}

/// A named group of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Collection {
    List(Vec<Item>),
    Singleton(Item),
}

impl Collection {
    pub fn kind(&self) -> CollectionKind {
        match self {
            Self::List(_) => CollectionKind::List,
            Self::Singleton(_) => CollectionKind::Singleton,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Item>> {
        match self {
            Self::List(items) => Some(items),
            Self::Singleton(_) => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Item>> {
        match self {
            Self::List(items) => Some(items),
            Self::Singleton(_) => None,
        }
    }

    pub fn as_singleton(&self) -> Option<&Item> {
        match self {
            Self::Singleton(item) => Some(item),
            Self::List(_) => None,
        }
    }

    /// Converts the collection back into its JSON snapshot form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| Value::Object(item.clone()))
                    .collect(),
            ),
            Self::Singleton(item) => Value::Object(item.clone()),
        }
    }
}

/// Returns the record's `id` when it is a string.
pub fn item_id(item: &Item) -> Option<&str> {
    item.get(ID_FIELD).and_then(Value::as_str)
}

/// Returns whether a foreign-key value references the record `id`.
///
/// Numeric keys match their string form, so `postId: 1` references the
/// post whose id was normalized to `"1"`.
pub fn references(value: Option<&Value>, id: &str) -> bool {
    match value {
        Some(Value::String(text)) => text == id,
        Some(Value::Number(number)) => number_to_id(number) == id,
        _ => false,
    }
}
