//! Filter, sort and paginate pipeline for list queries.

use super::QueryEngine;
use crate::model::item::{Collection, Item};
use crate::model::store::Store;
use crate::query::paginate::{paginate, slice, PaginatedItems, Pagination};
use crate::query::params::ListQuery;
use crate::query::sort::sort_items;
use serde::Serialize;
use serde_json::Value;

/// Result of a list query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FindResult {
    /// Plain list (no pagination, or slice mode).
    Items(Vec<Item>),
    /// Page mode envelope.
    Page(PaginatedItems),
    /// Singleton collections are returned as-is.
    Singleton(Item),
}

impl FindResult {
    /// Returns the records of a plain list result.
    pub fn into_items(self) -> Option<Vec<Item>> {
        match self {
            Self::Items(items) => Some(items),
            Self::Page(_) | Self::Singleton(_) => None,
        }
    }

    pub fn into_page(self) -> Option<PaginatedItems> {
        match self {
            Self::Page(page) => Some(page),
            Self::Items(_) | Self::Singleton(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Items(items) => {
                Value::Array(items.iter().cloned().map(Value::Object).collect())
            }
            Self::Page(page) => serde_json::to_value(page).unwrap_or(Value::Null),
            Self::Singleton(item) => Value::Object(item.clone()),
        }
    }
}

impl QueryEngine {
    /// Runs a list query against collection `name`.
    ///
    /// Stages run in fixed order: embed, filter, sort, paginate. A singleton
    /// collection is returned unchanged; a missing collection is `None`.
    pub fn find(&self, store: &Store, name: &str, query: &ListQuery) -> Option<FindResult> {
        let items = match store.get(name)? {
            Collection::Singleton(item) => return Some(FindResult::Singleton(item.clone())),
            Collection::List(items) => items,
        };

        let mut matched: Vec<Item> = items
            .iter()
            .map(|item| self.embed_all(store, name, item, &query.embed))
            .filter(|item| query.conditions.iter().all(|cond| cond.matches(item)))
            .collect();

        sort_items(&mut matched, &query.sort);

        let result = match query.pagination(self.options.default_per_page) {
            Pagination::None => FindResult::Items(matched),
            Pagination::Slice { start, end, limit } => {
                FindResult::Items(slice(matched, start, end, limit))
            }
            Pagination::Page { page, per_page } => {
                FindResult::Page(paginate(matched, page, per_page))
            }
        };
        Some(result)
    }
}
