use crate::style::StyledText;
use chrono::{DateTime, Utc};

/// One classified log line, ready for the flat view.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRecord {
    pub timestamp: Option<DateTime<Utc>>,
    /// Normalized line text (what the matcher chose to display)
    pub line: String,
    pub text: StyledText,
    /// The input exceeded the length cap and was cut before matching
    pub truncated: bool,
}

impl MatchedRecord {
    pub fn new(timestamp: Option<DateTime<Utc>>, line: impl Into<String>, text: StyledText) -> Self {
        Self {
            timestamp,
            line: line.into(),
            text,
            truncated: false,
        }
    }
}
