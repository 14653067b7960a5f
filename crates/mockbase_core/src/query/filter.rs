//! Filter conditions over schema-free records.
//!
//! # Invariants
//! - Values of one condition combine with OR; conditions combine with AND.
//! - Numeric comparison is used only when both sides read as finite numbers.
//! - A string attribute under eq/ne compares as exact text, so `"0012"` never
//!   equals `12`.
//! - A missing attribute satisfies `ne` and nothing else.

use crate::model::item::Item;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;

static OPERATOR_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)_(lt|lte|gt|gte|ne)$").expect("valid operator key regex"));

/// Comparison applied between a record attribute and a query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Operator {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "ne" => Some(Self::Ne),
            _ => None,
        }
    }

    /// Query-key suffix for this operator; empty for equality.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Eq => "",
            Self::Ne => "_ne",
            Self::Lt => "_lt",
            Self::Lte => "_lte",
            Self::Gt => "_gt",
            Self::Gte => "_gte",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
        }
    }
}

/// One filter key with its accepted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Attribute path, dot separated for nested fields (`author.name`).
    pub field: String,
    pub op: Operator,
    /// Any-of values; a record matches when one of them compares true.
    pub values: Vec<String>,
}

impl Condition {
    /// Builds a condition from a raw query key such as `views_gte`.
    pub fn parse(key: &str, values: Vec<String>) -> Self {
        if let Some(captures) = OPERATOR_KEY_RE.captures(key) {
            if let Some(op) = captures.get(2).and_then(|m| Operator::from_suffix(m.as_str())) {
                return Self {
                    field: captures[1].to_string(),
                    op,
                    values,
                };
            }
        }
        Self {
            field: key.to_string(),
            op: Operator::Eq,
            values,
        }
    }

    /// Query key this condition was parsed from, e.g. `views_gte`.
    pub fn key(&self) -> String {
        format!("{}{}", self.field, self.op.suffix())
    }

    /// Returns whether `item` satisfies this condition.
    pub fn matches(&self, item: &Item) -> bool {
        let actual = resolve_path(item, &self.field);
        self.values
            .iter()
            .any(|expected| compare(actual, self.op, expected))
    }
}

/// Resolves a possibly dotted attribute path inside a record.
///
/// A literal key containing dots wins over path traversal. Numeric
/// segments index into lists.
pub fn resolve_path<'a>(item: &'a Item, path: &str) -> Option<&'a Value> {
    if let Some(value) = item.get(path) {
        return Some(value);
    }
    if !path.contains('.') {
        return None;
    }

    let mut segments = path.split('.');
    let mut current = item.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(list) => list.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn compare(actual: Option<&Value>, op: Operator, expected: &str) -> bool {
    let Some(actual) = actual else {
        return op == Operator::Ne;
    };

    if let Value::String(text) = actual {
        if matches!(op, Operator::Eq | Operator::Ne) {
            return op.accepts(text.as_str().cmp(expected));
        }
    }

    if let (Some(left), Some(right)) = (numeric_value(actual), parse_number(expected)) {
        return left
            .partial_cmp(&right)
            .map_or(false, |ordering| op.accepts(ordering));
    }

    let Some(text) = scalar_text(actual) else {
        return op == Operator::Ne;
    };
    op.accepts(text.as_ref().cmp(expected))
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_number(text),
        _ => None,
    }
}

pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Bool(true) => Some(Cow::Borrowed("true")),
        Value::Bool(false) => Some(Cow::Borrowed("false")),
        Value::Null => Some(Cow::Borrowed("null")),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}
