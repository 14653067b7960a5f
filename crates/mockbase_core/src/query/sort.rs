//! Multi-key stable sorting.

use super::filter::resolve_path;
use crate::model::item::Item;
use serde_json::Value;
use std::cmp::Ordering;

/// One sort field; a leading `-` in the query marks descending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    /// Parses `views` or `-views`. Blank tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let (field, descending) = match token.strip_prefix('-') {
            Some(rest) => (rest.trim(), true),
            None => (token, false),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            descending,
        })
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Sorts records in place; the first key is primary, later keys break ties.
pub fn sort_items(items: &mut [Item], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    items.sort_by(|left, right| {
        for key in keys {
            let ordering = compare_values(
                resolve_path(left, &key.field),
                resolve_path(right, &key.field),
            );
            let ordering = if key.descending {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Total order over optional JSON values used for sorting.
///
/// missing < null < bool < number < string < list < record. Lists and
/// records compare equal among themselves.
pub fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => rank(left).cmp(&rank(right)),
    }
}

fn rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::{sort_items, SortKey};
    use crate::model::item::Item;
    use serde_json::json;

    fn records(values: serde_json::Value) -> Vec<Item> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i["id"].as_str().unwrap()).collect()
    }

    #[test]
    fn parse_reads_descending_prefix() {
        assert_eq!(SortKey::parse("-views"), Some(SortKey::descending("views")));
        assert_eq!(SortKey::parse(" title "), Some(SortKey::ascending("title")));
        assert_eq!(SortKey::parse("-"), None);
        assert_eq!(SortKey::parse(""), None);
    }

    #[test]
    fn multi_key_sort_breaks_ties_with_later_keys() {
        let mut items = records(json!([
            {"id": "1", "group": "b", "views": 5},
            {"id": "2", "group": "a", "views": 1},
            {"id": "3", "group": "b", "views": 9},
            {"id": "4", "group": "a", "views": 7},
        ]));
        sort_items(
            &mut items,
            &[SortKey::ascending("group"), SortKey::descending("views")],
        );
        assert_eq!(ids(&items), ["4", "2", "3", "1"]);
    }

    #[test]
    fn sort_is_stable_and_missing_values_go_first() {
        let mut items = records(json!([
            {"id": "1", "views": 2},
            {"id": "2"},
            {"id": "3", "views": 1},
            {"id": "4", "views": 1},
        ]));
        sort_items(&mut items, &[SortKey::ascending("views")]);
        assert_eq!(ids(&items), ["2", "3", "4", "1"]);
    }

    #[test]
    fn empty_keys_keep_insertion_order() {
        let mut items = records(json!([{"id": "b"}, {"id": "a"}]));
        sort_items(&mut items, &[]);
        assert_eq!(ids(&items), ["b", "a"]);
    }
}
