//! In-place mutations with identifier and referential-integrity rules.
//!
//! # Invariants
//! - `create` always mints a fresh id; caller-supplied ids are overwritten.
//! - Updates by id never change the record's id or position.
//! - Deleting a record nulls every foreign key referencing it in other list
//!   collections before dependents are pruned.

use super::QueryEngine;
use crate::model::id::{random_id, ID_FIELD};
use crate::model::item::{item_id, references, Collection, Item};
use crate::model::store::Store;
use serde_json::Value;

impl QueryEngine {
    /// Appends `data` to list collection `name` under a newly generated id.
    pub fn create(&self, store: &mut Store, name: &str, data: Item) -> Option<Item> {
        let items = store.get_mut(name)?.as_list_mut()?;
        let mut item = data;
        item.insert(
            ID_FIELD.to_string(),
            Value::String(random_id(self.options.id_bytes)),
        );
        items.push(item.clone());
        Some(item)
    }

    /// Replaces singleton collection `name` wholesale.
    pub fn update(&self, store: &mut Store, name: &str, data: Item) -> Option<Item> {
        let Collection::Singleton(current) = store.get_mut(name)? else {
            return None;
        };
        *current = data;
        Some(current.clone())
    }

    /// Merges `body` onto singleton collection `name`.
    pub fn patch(&self, store: &mut Store, name: &str, body: Item) -> Option<Item> {
        let Collection::Singleton(current) = store.get_mut(name)? else {
            return None;
        };
        for (field, value) in body {
            current.insert(field, value);
        }
        Some(current.clone())
    }

    /// Merges `body` onto the record with `id`, keeping its id and position.
    pub fn update_by_id(&self, store: &mut Store, name: &str, id: &str, body: Item) -> Option<Item> {
        let record = find_record_mut(store, name, id)?;
        let mut next = record.clone();
        for (field, value) in body {
            next.insert(field, value);
        }
        next.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        *record = next;
        Some(record.clone())
    }

    /// Replaces the record with `id` by `body`, keeping its id and position.
    pub fn replace_by_id(
        &self,
        store: &mut Store,
        name: &str,
        id: &str,
        body: Item,
    ) -> Option<Item> {
        let record = find_record_mut(store, name, id)?;
        let mut next = body;
        next.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        *record = next;
        Some(record.clone())
    }

    /// Removes the record with `id` and maintains references to it.
    ///
    /// 1. The record is removed from `name`.
    /// 2. In every other list collection, `foreign_key(name)` fields that
    ///    reference `id` are set to `null`.
    /// 3. In each collection listed in `dependents`, every record whose
    ///    `foreign_key(name)` is `null` is removed. This includes records
    ///    that were already `null` before this call.
    pub fn destroy_by_id(
        &self,
        store: &mut Store,
        name: &str,
        id: &str,
        dependents: &[String],
    ) -> Option<Item> {
        let items = store.get_mut(name)?.as_list_mut()?;
        let index = items.iter().position(|item| item_id(item) == Some(id))?;
        let removed = items.remove(index);

        let foreign_key = self.naming.foreign_key(name);
        for (collection_name, collection) in store.iter_mut() {
            if collection_name == name {
                continue;
            }
            let Some(children) = collection.as_list_mut() else {
                continue;
            };
            for child in children.iter_mut() {
                if references(child.get(&foreign_key), id) {
                    child.insert(foreign_key.clone(), Value::Null);
                }
            }
        }

        for (collection_name, collection) in store.iter_mut() {
            if collection_name == name || !dependents.iter().any(|d| d == collection_name) {
                continue;
            }
            if let Some(children) = collection.as_list_mut() {
                children.retain(|child| !matches!(child.get(&foreign_key), Some(Value::Null)));
            }
        }

        Some(removed)
    }
}

fn find_record_mut<'s>(store: &'s mut Store, name: &str, id: &str) -> Option<&'s mut Item> {
    store
        .get_mut(name)?
        .as_list_mut()?
        .iter_mut()
        .find(|item| item_id(item) == Some(id))
}
