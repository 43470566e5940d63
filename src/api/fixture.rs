//! Record source backed by fixture data.
//!
//! Lets the whole dashboard run without a backend: records are grouped by
//! doctype and the list query is evaluated locally (filters, ordering, limit
//! and field projection), close enough to the server's behaviour for demos
//! and tests.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "Warehouse Attendance Log": [
//!     {"name": "LOG-0002", "staff": "WS-01", "logtype": "OUT", "creation": "2024-05-01 17:02:11"}
//!   ],
//!   "Staff Daily Working Hours": [
//!     {"name": "DWH-01", "employee": "WS-01", "working_hours": 8.5, "attendance_log": "[\"LOG-0001\", \"LOG-0002\"]"}
//!   ]
//! }
//! ```

use super::{ApiError, Filter, FilterOp, ListQuery, RecordSource};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    collections: HashMap<String, Vec<Value>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the records of one doctype.
    pub fn with_records(mut self, doctype: &str, records: Vec<Value>) -> Self {
        self.collections.insert(doctype.to_string(), records);
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ApiError::Fixture(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ApiError> {
        let root: Map<String, Value> = serde_json::from_str(content).map_err(|e| ApiError::Fixture(e.to_string()))?;

        let mut collections = HashMap::new();
        for (doctype, records) in root {
            match records {
                Value::Array(records) => {
                    collections.insert(doctype, records);
                }
                _ => return Err(ApiError::Fixture(format!("'{}' must be a list of records", doctype))),
            }
        }

        Ok(Self { collections })
    }

    /// Evaluates `query` against the stored records.
    pub fn query(&self, query: &ListQuery) -> Vec<Value> {
        let Some(records) = self.collections.get(&query.doctype) else {
            return Vec::new();
        };

        let mut matched: Vec<&Value> = records.iter().filter(|r| query.filters.iter().all(|f| matches_filter(r, f))).collect();

        if let Some(order_by) = &query.order_by {
            let keys = parse_order_by(order_by);
            matched.sort_by(|a, b| {
                keys.iter()
                    .map(|(field, descending)| {
                        let ordering = compare_values(a.get(field.as_str()), b.get(field.as_str()));
                        if *descending {
                            ordering.reverse()
                        } else {
                            ordering
                        }
                    })
                    .find(|o| *o != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let limit = query.limit.filter(|l| *l > 0).unwrap_or(usize::MAX);
        matched.into_iter().take(limit).map(|record| project(record, &query.fields)).collect()
    }
}

impl RecordSource for FixtureSource {
    async fn get_list(&self, query: &ListQuery) -> Result<Vec<Value>, ApiError> {
        Ok(self.query(query))
    }
}

fn project(record: &Value, fields: &[String]) -> Value {
    let Value::Object(map) = record else {
        return record.clone();
    };
    if fields.is_empty() || fields.iter().any(|f| f == "*") {
        return record.clone();
    }

    let projected: Map<String, Value> = fields
        .iter()
        .filter_map(|field| map.get(field).map(|value| (field.clone(), value.clone())))
        .collect();
    Value::Object(projected)
}

fn parse_order_by(order_by: &str) -> Vec<(String, bool)> {
    order_by
        .split(',')
        .filter_map(|part| {
            let mut tokens = part.split_whitespace();
            let field = tokens.next()?.to_string();
            let descending = tokens.next().is_some_and(|dir| dir.eq_ignore_ascii_case("desc"));
            Some((field, descending))
        })
        .collect()
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Orders two field values; missing and null sort first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => match (as_number(a), as_number(b)) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}

fn matches_filter(record: &Value, filter: &Filter) -> bool {
    let value = record.get(filter.field.as_str());
    match filter.op {
        FilterOp::Eq => compare_values(value, Some(&filter.value)) == Ordering::Equal,
        FilterOp::NotEq => compare_values(value, Some(&filter.value)) != Ordering::Equal,
        FilterOp::Gt => compare_values(value, Some(&filter.value)) == Ordering::Greater,
        FilterOp::Lt => compare_values(value, Some(&filter.value)) == Ordering::Less,
        FilterOp::Gte => compare_values(value, Some(&filter.value)) != Ordering::Less,
        FilterOp::Lte => compare_values(value, Some(&filter.value)) != Ordering::Greater,
        FilterOp::Like => match (value.and_then(Value::as_str), filter.value.as_str()) {
            (Some(text), Some(pattern)) => like_match(pattern, text),
            _ => false,
        },
    }
}

/// Case-insensitive SQL `LIKE` with `%` wildcards.
fn like_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let text = text.to_lowercase();
    let parts: Vec<&str> = pattern.split('%').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !text.starts_with(first) || !text[first.len()..].ends_with(last) {
        return false;
    }

    let mut rest = &text[first.len()..text.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    true
}
