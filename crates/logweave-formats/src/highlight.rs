use crate::ansi;
use logweave_types::{Color, Style, StyledText};
use regex::Regex;
use std::sync::LazyLock;

/// Adds style spans to already-built text.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, text: &mut StyledText);
}

/// Style `line`: keep its own escape-sequence colors when present, otherwise
/// run `highlighter` over the plain text.
pub fn styled_line(line: &str, highlighter: &dyn Highlighter) -> StyledText {
    let mut text = if ansi::contains_ansi(line) {
        ansi::from_ansi(line)
    } else {
        StyledText::new(line)
    };
    if !text.has_spans() {
        highlighter.highlight(&mut text);
    }
    text
}

/// Style every match of `regex` in `text`.
pub fn highlight_regex(text: &mut StyledText, regex: &Regex, style: Style) {
    let ranges: Vec<(usize, usize)> = regex
        .find_iter(text.text())
        .map(|m| (m.start(), m.end()))
        .collect();
    for (start, end) in ranges {
        text.stylize(start, end, style);
    }
}

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?\b").unwrap());
static QUOTED_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""[^"]*""#).unwrap());
static IPV4_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap());
static DATETIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?)?",
    )
    .unwrap()
});
static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b")
        .unwrap()
});
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:https?|wss?|ftp)://[^\s"'<>]+"#).unwrap());
static ERROR_LEVEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:ERROR|FATAL|CRITICAL|PANIC)\b").unwrap());
static WARN_LEVEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bWARN(?:ING)?\b").unwrap());
static INFO_LEVEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:INFO|NOTICE)\b").unwrap());
static DEBUG_LEVEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:DEBUG|TRACE)\b").unwrap());

/// Generic highlighter for free-form log text.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHighlighter;

impl Highlighter for LogHighlighter {
    fn highlight(&self, text: &mut StyledText) {
        // Later patterns layer over earlier ones, so broad matches come first.
        highlight_regex(text, &NUMBER_REGEX, Style::new().fg(Color::Cyan).bold());
        highlight_regex(text, &QUOTED_REGEX, Style::new().fg(Color::Green));
        highlight_regex(text, &IPV4_REGEX, Style::new().fg(Color::BrightGreen));
        highlight_regex(text, &DATETIME_REGEX, Style::new().fg(Color::Blue));
        highlight_regex(text, &UUID_REGEX, Style::new().fg(Color::Magenta));
        highlight_regex(text, &URL_REGEX, Style::new().fg(Color::Blue).underline());
        highlight_regex(text, &ERROR_LEVEL_REGEX, Style::new().fg(Color::Red).bold());
        highlight_regex(text, &WARN_LEVEL_REGEX, Style::new().fg(Color::Yellow).bold());
        highlight_regex(text, &INFO_LEVEL_REGEX, Style::new().fg(Color::Green));
        highlight_regex(text, &DEBUG_LEVEL_REGEX, Style::new().dim());
    }
}

const JSON_BRACE: Style = Style::new().bold();
const JSON_KEY: Style = Style::new().fg(Color::Blue).bold();
const JSON_STR: Style = Style::new().fg(Color::Green);
const JSON_NUMBER: Style = Style::new().fg(Color::Cyan).bold();
const JSON_TRUE: Style = Style::new().fg(Color::BrightGreen).italic();
const JSON_FALSE: Style = Style::new().fg(Color::BrightRed).italic();
const JSON_NULL: Style = Style::new().fg(Color::Magenta).italic();

/// Syntax highlighter for JSON text.
///
/// Works on the raw characters, so text that is not valid JSON still gets
/// best-effort spans instead of an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonHighlighter;

impl Highlighter for JsonHighlighter {
    fn highlight(&self, text: &mut StyledText) {
        let spans = scan_json(text.text());
        for (start, end, style) in spans {
            text.stylize(start, end, style);
        }
    }
}

fn scan_json(source: &str) -> Vec<(usize, usize, Style)> {
    let bytes = source.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' | b'[' | b']' => {
                spans.push((i, i + 1, JSON_BRACE));
                i += 1;
            }
            b'"' => {
                let end = string_end(bytes, i);
                let mut next = end;
                while next < bytes.len() && bytes[next].is_ascii_whitespace() {
                    next += 1;
                }
                let style = if bytes.get(next) == Some(&b':') {
                    JSON_KEY
                } else {
                    JSON_STR
                };
                spans.push((i, end, style));
                i = end;
            }
            b'-' | b'0'..=b'9' => {
                let start = i;
                i += 1;
                while i < bytes.len()
                    && matches!(bytes[i], b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-')
                {
                    i += 1;
                }
                spans.push((start, i, JSON_NUMBER));
            }
            b't' | b'f' | b'n' => {
                let rest = &source[i..];
                let literal = [("true", JSON_TRUE), ("false", JSON_FALSE), ("null", JSON_NULL)]
                    .into_iter()
                    .find(|(word, _)| rest.starts_with(word));
                match literal {
                    Some((word, style)) => {
                        spans.push((i, i + word.len(), style));
                        i += word.len();
                    }
                    None => i += 1,
                }
            }
            _ => i += 1,
        }
    }

    spans
}

/// Index just past the closing quote of the string starting at `start`
/// (or the end of input for an unterminated string).
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Style for an HTTP status code, keyed on its first digit.
pub fn http_status_style(status: &str) -> Style {
    match status.as_bytes().first() {
        Some(b'1') => Style::new().fg(Color::Cyan),
        Some(b'2') => Style::new().fg(Color::Green),
        Some(b'3') => Style::new().fg(Color::Yellow),
        Some(b'4') => Style::new().fg(Color::Red),
        Some(b'5') => Style::new().fg(Color::Red).reverse(),
        _ => Style::new().fg(Color::Magenta),
    }
}
