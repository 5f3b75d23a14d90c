use crate::highlight::{JsonHighlighter, styled_line};
use crate::timestamps::{from_epoch, parse_timestamp};
use crate::traits::LogFormat;
use chrono::{DateTime, Utc};
use logweave_types::MatchedRecord;
use serde_json::Value;

/// Keys checked, in order, for a record timestamp.
pub const DEFAULT_TIMESTAMP_FIELDS: &[&str] =
    &["timestamp", "@timestamp", "time", "ts", "datetime", "date", "t"];

/// Structured-data (JSON) lines.
#[derive(Debug, Clone)]
pub struct JsonLogFormat {
    timestamp_fields: Vec<String>,
}

impl JsonLogFormat {
    pub fn new() -> Self {
        Self::with_timestamp_fields(DEFAULT_TIMESTAMP_FIELDS.iter().map(|s| s.to_string()))
    }

    pub fn with_timestamp_fields(fields: impl IntoIterator<Item = String>) -> Self {
        Self {
            timestamp_fields: fields.into_iter().collect(),
        }
    }

    /// First candidate key present on a top-level object decides the timestamp.
    /// Strings are parsed as dates, numbers as plausible epoch values.
    fn resolve_timestamp(&self, value: &Value) -> Option<DateTime<Utc>> {
        let object = value.as_object()?;
        let candidate = self
            .timestamp_fields
            .iter()
            .find_map(|field| object.get(field))?;

        match candidate {
            Value::String(text) => parse_timestamp(text),
            Value::Number(number) => number.as_f64().and_then(from_epoch),
            _ => None,
        }
    }
}

impl Default for JsonLogFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFormat for JsonLogFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, line: &str) -> Option<MatchedRecord> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let value: Value = serde_json::from_str(line).ok()?;
        let timestamp = self.resolve_timestamp(&value);
        let text = styled_line(line, &JsonHighlighter);
        Some(MatchedRecord::new(timestamp, line, text))
    }
}
