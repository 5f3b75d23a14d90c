use crate::highlight::{LogHighlighter, highlight_regex, http_status_style, styled_line};
use crate::timestamps::parse_timestamp;
use crate::traits::LogFormat;
use logweave_types::{Color, MatchedRecord, Style};
use regex::{Captures, Regex};
use std::sync::LazyLock;

const REQUEST_PREFIX: &str = r#"^(?P<ip>\S+) (?P<identity>\S+) (?P<userid>\S+) \[(?P<date>[^\]\s]+)(?: (?P<timezone>[^\]]+))?\] "(?P<method>[^"\s]*) (?P<path>[^"]*?)(?: (?P<protocol>HTTP/[^"]*))?" (?P<status>\S+) (?P<length>\S+) "(?P<referrer>[^"]*)""#;

static COMMON_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{}$", REQUEST_PREFIX)).unwrap());

static COMBINED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"{} "(?P<user_agent>[^"]*)" (?P<session_id>\S+) (?P<timing>\S+) (?P<vhost>.*)$"#,
        REQUEST_PREFIX
    ))
    .unwrap()
});

static HTTP_METHOD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:GET|POST|PUT|HEAD|DELETE|OPTIONS|PATCH)\b").unwrap());

const COMMON_GROUPS: &[&str] = &[
    "ip", "identity", "userid", "date", "method", "path", "status", "length", "referrer",
];
const COMBINED_GROUPS: &[&str] = &["user_agent", "session_id", "timing", "vhost"];

/// Which access-log grammar a matcher accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLogGrammar {
    /// `ip identity userid [date] "request" status length "referrer"`
    Common,
    /// Common plus `"user-agent" session-id timing vhost`
    Combined,
}

/// Web server access-log lines.
#[derive(Debug, Clone, Copy)]
pub struct AccessLogFormat {
    grammar: AccessLogGrammar,
}

impl AccessLogFormat {
    pub fn common() -> Self {
        Self {
            grammar: AccessLogGrammar::Common,
        }
    }

    pub fn combined() -> Self {
        Self {
            grammar: AccessLogGrammar::Combined,
        }
    }

    fn regex(&self) -> &'static Regex {
        match self.grammar {
            AccessLogGrammar::Common => &COMMON_REGEX,
            AccessLogGrammar::Combined => &COMBINED_REGEX,
        }
    }

    fn has_required_groups(&self, caps: &Captures<'_>) -> bool {
        let extra: &[&str] = match self.grammar {
            AccessLogGrammar::Common => &[],
            AccessLogGrammar::Combined => COMBINED_GROUPS,
        };
        COMMON_GROUPS
            .iter()
            .chain(extra)
            .all(|group| caps.name(group).is_some())
    }
}

impl LogFormat for AccessLogFormat {
    fn name(&self) -> &'static str {
        match self.grammar {
            AccessLogGrammar::Common => "common",
            AccessLogGrammar::Combined => "combined",
        }
    }

    fn parse(&self, line: &str) -> Option<MatchedRecord> {
        let caps = self.regex().captures(line)?;
        if !self.has_required_groups(&caps) {
            return None;
        }

        let date = caps.name("date")?.as_str();
        let timestamp = match caps.name("timezone") {
            Some(tz) => parse_timestamp(&format!("{} {}", date, tz.as_str())),
            None => parse_timestamp(date),
        };

        let mut text = styled_line(line, &LogHighlighter);
        // Offsets only line up when no escape sequences were stripped.
        if text.text() == line {
            let status = caps.name("status")?;
            text.stylize(
                status.start(),
                status.end(),
                http_status_style(status.as_str()),
            );
        }
        highlight_regex(
            &mut text,
            &HTTP_METHOD_REGEX,
            Style::new().fg(Color::Yellow).bold(),
        );

        Some(MatchedRecord::new(timestamp, line, text))
    }
}
