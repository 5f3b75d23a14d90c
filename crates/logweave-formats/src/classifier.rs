use crate::fallback::DefaultLogFormat;
use crate::registry::{create_format, format_names};
use crate::traits::LogFormat;
use logweave_types::MatchedRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Lines longer than this many characters are cut before matching.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub max_line_length: usize,
    /// JSON keys checked for a timestamp, in priority order
    pub timestamp_fields: Vec<String>,
    /// Initial matcher order, by registry name
    pub formats: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            timestamp_fields: crate::json::DEFAULT_TIMESTAMP_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            formats: format_names().iter().map(|name| name.to_string()).collect(),
        }
    }
}

/// Move the element at `index` to the front; everything after it follows,
/// then everything that was before it. Relative order is otherwise kept.
pub fn rotate_to_front<T>(mut items: Vec<T>, index: usize) -> Vec<T> {
    if index < items.len() {
        items.rotate_left(index);
    }
    items
}

/// Cut `line` to at most `max_chars` characters.
fn truncate_line(line: &str, max_chars: usize) -> (&str, bool) {
    match line.char_indices().nth(max_chars) {
        Some((cut, _)) => (&line[..cut], true),
        None => (line, false),
    }
}

/// Ordered matcher list for one scan session.
///
/// Each successful match moves its matcher to the front, so files where
/// consecutive lines share a format are classified with a single attempt per
/// line on average.
pub struct Classifier {
    formats: Vec<Box<dyn LogFormat>>,
    fallback: DefaultLogFormat,
    max_line_length: usize,
}

impl Classifier {
    pub fn new() -> Self {
        Self::with_config(&ClassifierConfig::default())
    }

    pub fn with_config(config: &ClassifierConfig) -> Self {
        let formats = config
            .formats
            .iter()
            .filter_map(|name| {
                let format = create_format(name, &config.timestamp_fields);
                if format.is_none() {
                    warn!(format = %name, "ignoring unknown log format");
                }
                format
            })
            .collect();
        Self::with_formats(formats, config.max_line_length)
    }

    pub fn with_formats(formats: Vec<Box<dyn LogFormat>>, max_line_length: usize) -> Self {
        Self {
            formats,
            fallback: DefaultLogFormat,
            max_line_length,
        }
    }

    /// Current matcher order, by name.
    pub fn order(&self) -> Vec<&'static str> {
        self.formats.iter().map(|format| format.name()).collect()
    }

    /// Classify one line. Always returns a record.
    pub fn classify(&mut self, line: &str) -> MatchedRecord {
        let (line, truncated) = truncate_line(line, self.max_line_length);
        if truncated {
            debug!(
                max_chars = self.max_line_length,
                "line truncated before matching"
            );
        }

        let mut record = self.match_line(line);
        record.truncated = truncated;
        record
    }

    fn match_line(&mut self, line: &str) -> MatchedRecord {
        if !line.trim().is_empty() {
            let hit = self
                .formats
                .iter()
                .enumerate()
                .find_map(|(index, format)| format.parse(line).map(|record| (index, record)));

            if let Some((index, record)) = hit {
                if index > 0 {
                    self.formats = rotate_to_front(std::mem::take(&mut self.formats), index);
                }
                return record;
            }
        }
        self.fallback.parse_line(line)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logweave_types::{Color, StyledText};

    /// Accepts lines starting with its prefix.
    struct PrefixFormat(&'static str);

    impl LogFormat for PrefixFormat {
        fn name(&self) -> &'static str {
            self.0
        }

        fn parse(&self, line: &str) -> Option<MatchedRecord> {
            line.starts_with(self.0)
                .then(|| MatchedRecord::new(None, line, StyledText::new(line)))
        }
    }

    fn prefix_classifier(names: &[&'static str]) -> Classifier {
        let formats = names
            .iter()
            .map(|name| Box::new(PrefixFormat(*name)) as Box<dyn LogFormat>)
            .collect();
        Classifier::with_formats(formats, DEFAULT_MAX_LINE_LENGTH)
    }

    #[test]
    fn test_rotate_to_front() {
        assert_eq!(rotate_to_front(vec!['a', 'b', 'c', 'd'], 2), vec!['c', 'd', 'a', 'b']);
        assert_eq!(rotate_to_front(vec!['a', 'b', 'c'], 0), vec!['a', 'b', 'c']);
        assert_eq!(rotate_to_front(vec!['a', 'b', 'c'], 2), vec!['c', 'a', 'b']);
        assert_eq!(rotate_to_front(vec!['a'], 5), vec!['a']);
        assert_eq!(rotate_to_front(Vec::<char>::new(), 0), Vec::<char>::new());
    }

    #[test]
    fn test_successful_matcher_moves_to_front() {
        let mut classifier = prefix_classifier(&["a", "b", "c", "d"]);

        classifier.classify("c-line");
        assert_eq!(classifier.order(), vec!["c", "d", "a", "b"]);

        classifier.classify("a-line");
        assert_eq!(classifier.order(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_first_matcher_hit_keeps_order() {
        let mut classifier = prefix_classifier(&["a", "b"]);
        classifier.classify("a-line");
        assert_eq!(classifier.order(), vec!["a", "b"]);
    }

    #[test]
    fn test_no_match_keeps_order_and_uses_fallback() {
        let mut classifier = prefix_classifier(&["a", "b"]);
        let record = classifier.classify("zzz");
        assert_eq!(classifier.order(), vec!["a", "b"]);
        assert_eq!(record.line, "zzz");
        assert_eq!(record.timestamp, None);
    }

    #[test]
    fn test_blank_lines_skip_matchers() {
        // A matcher accepting the empty prefix would take every line.
        let mut classifier = prefix_classifier(&["x", ""]);
        classifier.classify("   ");
        assert_eq!(classifier.order(), vec!["x", ""]);
    }

    #[test]
    fn test_classify_is_total() {
        let mut classifier = Classifier::new();
        let inputs = [
            "",
            " ",
            "\t\t",
            "not a log line at all",
            "{",
            "[1, 2",
            "\u{1b}[",
            "\u{0}\u{1}\u{2}",
            "ümlaut ✓ 日本語",
            r#"{"task_uuid": 1, "task_level": "x", "action_type": null}"#,
        ];
        for input in inputs {
            let record = classifier.classify(input);
            assert!(!record.truncated);
        }
    }

    #[test]
    fn test_long_lines_are_truncated_on_char_boundary() {
        let mut classifier = Classifier::new();
        let line = "é".repeat(DEFAULT_MAX_LINE_LENGTH + 5);

        let record = classifier.classify(&line);

        assert!(record.truncated);
        assert_eq!(record.line.chars().count(), DEFAULT_MAX_LINE_LENGTH);
    }

    #[test]
    fn test_truncated_json_is_not_matched_as_json() {
        let mut classifier = Classifier::with_config(&ClassifierConfig {
            max_line_length: 10,
            ..ClassifierConfig::default()
        });
        let record = classifier.classify(r#"{"message": "a long value"}"#);

        assert!(record.truncated);
        assert_eq!(record.line, r#"{"message""#);
        assert_eq!(classifier.order()[0], "causal");
    }

    #[test]
    fn test_plain_text_uses_fallback() {
        let mut classifier = Classifier::new();
        let record = classifier.classify("not a log line at all");

        assert_eq!(record.timestamp, None);
        assert_eq!(record.line, "not a log line at all");
        assert_eq!(record.text.text(), "not a log line at all");
    }

    #[test]
    fn test_access_log_scenario() {
        let mut classifier = Classifier::new();
        let record = classifier
            .classify(r#"127.0.0.1 - - [10/Oct/2023:13:55:36] "GET /x HTTP/1.1" 200 1024 "-""#);

        assert!(record.timestamp.is_some());
        let text = &record.text;
        let styled = |needle: &str| {
            text.spans()
                .iter()
                .filter(|span| &text.text()[span.start..span.end] == needle)
                .map(|span| span.style)
                .collect::<Vec<_>>()
        };
        assert!(styled("GET").iter().any(|s| s.bold));
        assert!(styled("200").iter().any(|s| s.fg == Some(Color::Green)));
        assert_eq!(classifier.order(), vec!["common", "combined", "causal", "json"]);
    }

    #[test]
    fn test_homogeneous_json_settles_json_first() {
        let mut classifier = Classifier::new();
        classifier.classify(r#"{"level": "info"}"#);
        assert_eq!(classifier.order(), vec!["json", "common", "combined", "causal"]);

        classifier.classify(r#"{"level": "warn"}"#);
        assert_eq!(classifier.order(), vec!["json", "common", "combined", "causal"]);
    }

    #[test]
    fn test_empty_timestamp_fields_disable_json_timestamps() {
        let mut classifier = Classifier::with_config(&ClassifierConfig {
            timestamp_fields: Vec::new(),
            ..ClassifierConfig::default()
        });
        let record = classifier.classify(r#"{"ts": "2024-01-02T03:04:05Z", "msg": "hi"}"#);

        assert_eq!(classifier.order()[0], "json");
        assert_eq!(record.timestamp, None);
    }

    #[test]
    fn test_unknown_format_names_are_skipped() {
        let classifier = Classifier::with_config(&ClassifierConfig {
            formats: vec!["json".to_string(), "syslog".to_string()],
            ..ClassifierConfig::default()
        });
        assert_eq!(classifier.order(), vec!["json"]);
    }
}
