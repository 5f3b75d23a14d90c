use crate::timestamps::from_epoch_seconds;
use crate::traits::LogFormat;
use logweave_types::{
    ACTION_STATUS, ACTION_TYPE, Color, MatchedRecord, STATUS_FAILED, STATUS_SUCCEEDED, Style,
    StyledText, TASK_LEVEL, TIMESTAMP, has_causal_keys,
};
use serde_json::Value;

/// Causal action records shown as one indented tree row each.
///
/// This is the flat-view rendering of a causal record; the foldable tree is
/// built by the engine crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct CausalLineFormat;

impl LogFormat for CausalLineFormat {
    fn name(&self) -> &'static str {
        "causal"
    }

    fn parse(&self, line: &str) -> Option<MatchedRecord> {
        let value: Value = serde_json::from_str(line.trim()).ok()?;
        let record = value.as_object()?;
        if !has_causal_keys(record) {
            return None;
        }

        let depth = record.get(TASK_LEVEL)?.as_array()?.len();
        let action_type = match record.get(ACTION_TYPE)? {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let status = record
            .get(ACTION_STATUS)
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let timestamp = record
            .get(TIMESTAMP)
            .and_then(Value::as_f64)
            .and_then(from_epoch_seconds);

        let mut text = StyledText::default();
        text.append(&"    ".repeat(depth.saturating_sub(1)), Style::new().dim());
        let branch = if depth <= 1 { "└── " } else { "├── " };
        text.append(branch, Style::new().fg(Color::BrightBlack));
        text.append(&action_type, Style::new().fg(Color::Cyan));
        text.append(" ⇒ ", Style::new().fg(Color::BrightBlack));
        let status_style = match status {
            STATUS_SUCCEEDED => Style::new().fg(Color::Green),
            STATUS_FAILED => Style::new().fg(Color::Red),
            _ => Style::new().fg(Color::Yellow),
        };
        text.append(status, status_style);

        if let Some(duration) = record.get("duration").and_then(Value::as_f64) {
            text.append(&format!(" ⧖ {:.3}s", duration), Style::new().fg(Color::Blue));
        }

        let display = text.text().to_string();
        Some(MatchedRecord::new(timestamp, display, text))
    }
}
