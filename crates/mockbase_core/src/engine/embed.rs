//! Relation embedding by foreign-key naming convention.

use super::QueryEngine;
use crate::model::item::{item_id, references, Collection, Item};
use crate::model::store::Store;
use serde_json::Value;

impl QueryEngine {
    /// Returns a copy of `item` with the `related` collection attached.
    ///
    /// - Plural `related` (one-to-many): the children whose
    ///   `foreign_key(name)` references `item.id`, in collection order.
    /// - Singular `related` whose plural is a list collection (many-to-one):
    ///   the parent referenced by `item[foreign_key(plural)]`, or `null`.
    ///
    /// A related collection that does not exist leaves the copy unchanged.
    pub fn embed(&self, store: &Store, name: &str, item: &Item, related: &str) -> Item {
        if let Some(parent) = self.embed_parent(store, item, related) {
            let mut embedded = item.clone();
            embedded.insert(related.to_string(), parent);
            return embedded;
        }

        let Some(children) = store.get(related).and_then(Collection::as_list) else {
            return item.clone();
        };
        let foreign_key = self.naming.foreign_key(name);
        let matched: Vec<Value> = match item_id(item) {
            Some(id) => children
                .iter()
                .filter(|child| references(child.get(&foreign_key), id))
                .map(|child| Value::Object(child.clone()))
                .collect(),
            None => Vec::new(),
        };

        let mut embedded = item.clone();
        embedded.insert(related.to_string(), Value::Array(matched));
        embedded
    }

    /// Applies every requested embedding in order.
    pub(crate) fn embed_all(
        &self,
        store: &Store,
        name: &str,
        item: &Item,
        related: &[String],
    ) -> Item {
        related.iter().fold(item.clone(), |acc, relation| {
            self.embed(store, name, &acc, relation)
        })
    }

    fn embed_parent(&self, store: &Store, item: &Item, related: &str) -> Option<Value> {
        if self.naming.singularize(related) != related {
            return None;
        }
        let plural = self.naming.pluralize(related);
        if plural == related {
            return None;
        }
        let parents = store.get(&plural)?.as_list()?;
        let foreign_key = self.naming.foreign_key(&plural);
        let key = item.get(&foreign_key);
        let parent = parents
            .iter()
            .find(|parent| item_id(parent).is_some_and(|id| references(key, id)))
            .map(|parent| Value::Object(parent.clone()))
            .unwrap_or(Value::Null);
        Some(parent)
    }
}
