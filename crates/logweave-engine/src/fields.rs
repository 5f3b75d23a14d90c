//! Child entries of payload fields.
//!
//! Objects expand to their entries and arrays to index/value pairs. A string
//! under a `*_details` key is parsed as embedded JSON and expands to that
//! document's top-level entries.

use serde_json::Value;

pub const DETAILS_SUFFIX: &str = "_details";

/// Field nesting beyond this depth is shown collapsed with no children.
pub const MAX_FIELD_DEPTH: usize = 64;

pub fn is_details_key(key: &str) -> bool {
    key.ends_with(DETAILS_SUFFIX)
}

/// Whether a field of this shape can carry children at all.
pub fn is_container(key: &str, value: &Value) -> bool {
    match value {
        Value::Object(_) | Value::Array(_) => true,
        Value::String(_) => is_details_key(key),
        _ => false,
    }
}

/// Iterator over `(key, value)` children of a field.
pub enum FieldChildren<'v> {
    Empty,
    Object(serde_json::map::Iter<'v>),
    Array(std::iter::Enumerate<std::slice::Iter<'v, Value>>),
    Embedded(std::vec::IntoIter<(String, Value)>),
}

impl<'v> FieldChildren<'v> {
    pub fn new(key: &str, value: &'v Value, depth: usize) -> Self {
        if depth >= MAX_FIELD_DEPTH {
            return Self::Empty;
        }
        match value {
            Value::Object(map) => Self::Object(map.iter()),
            Value::Array(items) => Self::Array(items.iter().enumerate()),
            Value::String(raw) if is_details_key(key) => embedded_entries(raw),
            _ => Self::Empty,
        }
    }
}

fn embedded_entries<'v>(raw: &str) -> FieldChildren<'v> {
    let entries: Vec<(String, Value)> = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        Ok(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        _ => return FieldChildren::Empty,
    };
    FieldChildren::Embedded(entries.into_iter())
}

impl Iterator for FieldChildren<'_> {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Empty => None,
            Self::Object(entries) => entries
                .next()
                .map(|(key, value)| (key.clone(), value.clone())),
            Self::Array(items) => items
                .next()
                .map(|(index, value)| (index.to_string(), value.clone())),
            Self::Embedded(entries) => entries.next(),
        }
    }
}
