use crate::highlight::{LogHighlighter, styled_line};
use crate::traits::LogFormat;
use logweave_types::MatchedRecord;

/// Matcher of last resort: accepts any line and never yields a timestamp.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLogFormat;

impl DefaultLogFormat {
    pub fn parse_line(&self, line: &str) -> MatchedRecord {
        MatchedRecord::new(None, line, styled_line(line, &LogHighlighter))
    }
}

impl LogFormat for DefaultLogFormat {
    fn name(&self) -> &'static str {
        "default"
    }

    fn parse(&self, line: &str) -> Option<MatchedRecord> {
        Some(self.parse_line(line))
    }
}
