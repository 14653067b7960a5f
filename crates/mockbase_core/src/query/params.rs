//! Request parameter parsing into a typed list query.
//!
//! # Responsibility
//! - Turn a flat, possibly repeated, string-keyed parameter list into a
//!   `ListQuery` the engine can run.
//! - Normalize single-or-list parameters (`_embed`, `_dependent`).
//!
//! # Invariants
//! - Repeated filter keys accumulate values in arrival order.
//! - Numeric reserved parameters that fail to parse are dropped.

use super::filter::Condition;
use super::paginate::Pagination;
use super::sort::SortKey;
use indexmap::IndexMap;

pub const EMBED_PARAM: &str = "_embed";
pub const SORT_PARAM: &str = "_sort";
pub const ORDER_PARAM: &str = "_order";
pub const START_PARAM: &str = "_start";
pub const END_PARAM: &str = "_end";
pub const LIMIT_PARAM: &str = "_limit";
pub const PAGE_PARAM: &str = "_page";
pub const PER_PAGE_PARAM: &str = "_per_page";
pub const DEPENDENT_PARAM: &str = "_dependent";

/// Parameters that never become filter conditions.
pub const RESERVED_PARAMS: &[&str] = &[
    EMBED_PARAM,
    SORT_PARAM,
    ORDER_PARAM,
    START_PARAM,
    END_PARAM,
    LIMIT_PARAM,
    PAGE_PARAM,
    PER_PAGE_PARAM,
    DEPENDENT_PARAM,
];

/// Typed form of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Related collections to attach to each record.
    pub embed: Vec<String>,
    pub conditions: Vec<Condition>,
    pub sort: Vec<SortKey>,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub limit: Option<usize>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses flat request parameters.
    ///
    /// Repeated keys are allowed; for filter keys they form an any-of set.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        let mut filters: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut sort_fields: Vec<String> = Vec::new();
        let mut orders: Vec<String> = Vec::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref();
            match key {
                EMBED_PARAM => query.embed.extend(ensure_list([value])),
                SORT_PARAM => sort_fields.extend(split_list(value)),
                ORDER_PARAM => orders.extend(split_list(value)),
                START_PARAM => query.start = parse_index(value).or(query.start),
                END_PARAM => query.end = parse_index(value).or(query.end),
                LIMIT_PARAM => query.limit = parse_index(value).or(query.limit),
                PAGE_PARAM => query.page = parse_index(value).or(query.page),
                PER_PAGE_PARAM => query.per_page = parse_index(value).or(query.per_page),
                DEPENDENT_PARAM => {}
                _ => filters
                    .entry(key.to_string())
                    .or_default()
                    .push(value.to_string()),
            }
        }

        query.sort = build_sort_keys(&sort_fields, &orders);
        query.conditions = filters
            .into_iter()
            .map(|(key, values)| Condition::parse(&key, values))
            .collect();
        query
    }

    pub fn embed(mut self, related: impl Into<String>) -> Self {
        self.embed.push(related.into());
        self
    }

    pub fn filter(mut self, key: &str, value: impl Into<String>) -> Self {
        let mut parsed = Condition::parse(key, vec![value.into()]);
        match self
            .conditions
            .iter_mut()
            .find(|c| c.field == parsed.field && c.op == parsed.op)
        {
            Some(existing) => existing.values.append(&mut parsed.values),
            None => self.conditions.push(parsed),
        }
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    pub fn slice(mut self, start: Option<usize>, end: Option<usize>, limit: Option<usize>) -> Self {
        self.start = start;
        self.end = end;
        self.limit = limit;
        self
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    /// Resolves the pagination mode. Slice parameters win over page ones.
    pub fn pagination(&self, default_per_page: usize) -> Pagination {
        if self.start.is_some() || self.end.is_some() || self.limit.is_some() {
            return Pagination::Slice {
                start: self.start,
                end: self.end,
                limit: self.limit,
            };
        }
        if self.page.is_some() || self.per_page.is_some() {
            return Pagination::Page {
                page: self.page.unwrap_or(1).max(1),
                per_page: self.per_page.unwrap_or(default_per_page).max(1),
            };
        }
        Pagination::None
    }
}

/// Normalizes single-or-many parameter values into one list.
///
/// Each value may itself be a comma separated list; blanks are dropped.
pub fn ensure_list<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .flat_map(|value| split_list(value.as_ref()))
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_index(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

fn build_sort_keys(fields: &[String], orders: &[String]) -> Vec<SortKey> {
    fields
        .iter()
        .enumerate()
        .filter_map(|(index, field)| {
            let mut key = SortKey::parse(field)?;
            if let Some(order) = orders.get(index) {
                if order.eq_ignore_ascii_case("desc") {
                    key.descending = !key.descending;
                }
            }
            Some(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ensure_list, ListQuery};
    use crate::query::filter::Operator;
    use crate::query::paginate::Pagination;
    use crate::query::sort::SortKey;

    #[test]
    fn from_pairs_separates_reserved_and_filter_keys() {
        let query = ListQuery::from_pairs([
            ("views_lt", "300"),
            ("_embed", "comments"),
            ("_sort", "-views,title"),
            ("_page", "2"),
            ("_per_page", "5"),
            ("_dependent", "comments"),
        ]);

        assert_eq!(query.embed, ["comments"]);
        assert_eq!(query.conditions.len(), 1);
        assert_eq!(query.conditions[0].field, "views");
        assert_eq!(query.conditions[0].op, Operator::Lt);
        assert_eq!(
            query.sort,
            [SortKey::descending("views"), SortKey::ascending("title")]
        );
        assert_eq!(
            query.pagination(10),
            Pagination::Page {
                page: 2,
                per_page: 5
            }
        );
    }

    #[test]
    fn repeated_filter_keys_accumulate_values() {
        let query = ListQuery::from_pairs([("id", "1"), ("title", "x"), ("id", "2")]);
        assert_eq!(query.conditions.len(), 2);
        assert_eq!(query.conditions[0].values, ["1", "2"]);
        assert_eq!(query.conditions[1].values, ["x"]);
    }

    #[test]
    fn unparsable_numeric_params_are_dropped() {
        let query = ListQuery::from_pairs([("_start", "abc"), ("_limit", "-1"), ("_page", "x")]);
        assert_eq!(query.start, None);
        assert_eq!(query.limit, None);
        assert_eq!(query.page, None);
        assert_eq!(query.pagination(10), Pagination::None);
    }

    #[test]
    fn slice_params_take_precedence_over_page_params() {
        let query = ListQuery::from_pairs([("_page", "2"), ("_limit", "3")]);
        assert_eq!(
            query.pagination(10),
            Pagination::Slice {
                start: None,
                end: None,
                limit: Some(3)
            }
        );
    }

    #[test]
    fn page_mode_defaults_missing_half() {
        let only_per_page = ListQuery::from_pairs([("_per_page", "2")]);
        assert_eq!(
            only_per_page.pagination(10),
            Pagination::Page {
                page: 1,
                per_page: 2
            }
        );
        let only_page = ListQuery::from_pairs([("_page", "0")]);
        assert_eq!(
            only_page.pagination(10),
            Pagination::Page {
                page: 1,
                per_page: 10
            }
        );
    }

    #[test]
    fn legacy_order_param_flips_aligned_sort_keys() {
        let query = ListQuery::from_pairs([("_order", "desc,asc"), ("_sort", "views,title")]);
        assert_eq!(
            query.sort,
            [SortKey::descending("views"), SortKey::ascending("title")]
        );
    }

    #[test]
    fn ensure_list_accepts_single_or_many() {
        assert_eq!(ensure_list(Some("comments")), ["comments"]);
        assert_eq!(ensure_list(["a,b", " c "]), ["a", "b", "c"]);
        assert!(ensure_list(None::<&str>).is_empty());
    }

    #[test]
    fn builder_methods_compose_a_query() {
        let query = ListQuery::new()
            .embed("comments")
            .filter("id", "1")
            .filter("id", "2")
            .filter("views_gt", "10")
            .sort_by(SortKey::descending("views"))
            .page(1, 2);

        assert_eq!(query.conditions.len(), 2);
        assert_eq!(query.conditions[0].values, ["1", "2"]);
        assert_eq!(query.embed, ["comments"]);
        assert_eq!(query.sort.len(), 1);
    }
}
