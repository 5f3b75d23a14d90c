use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const STDIN_NAME: &str = "<stdin>";

/// One input, split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub lines: Vec<String>,
}

impl Source {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            lines: split_lines(bytes),
        }
    }

    pub fn read_path(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::from_bytes(path.display().to_string(), &bytes))
    }

    pub fn read_stdin() -> Result<Self> {
        let mut bytes = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        Ok(Self::from_bytes(STDIN_NAME, &bytes))
    }

    /// First line with visible content, used to pick the view.
    pub fn first_content_line(&self) -> Option<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .find(|line| !line.trim().is_empty())
    }
}

/// One dot-separated piece of a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NameToken {
    Number(u64),
    Text(String),
}

impl NameToken {
    fn parse(token: &str) -> Self {
        let digits = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
        match token.parse() {
            Ok(number) if digits => Self::Number(number),
            _ => Self::Text(token.to_lowercase()),
        }
    }
}

impl fmt::Display for NameToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Ord for NameToken {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl PartialOrd for NameToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn name_tokens(path: &Path) -> Vec<NameToken> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    name.split('.').map(NameToken::parse).collect()
}

/// Order paths by file name, comparing dot-separated numeric parts as
/// numbers and text parts case-insensitively, so rotated logs read
/// `app.log`, `app.log.1`, `app.log.2`, `app.log.10`. Ties keep argument order.
pub fn sort_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut sorted = paths.to_vec();
    sorted.sort_by_cached_key(|path| name_tokens(path));
    sorted
}

/// Load every requested input in [`sort_paths`] order; `-` or an empty list
/// means stdin.
pub fn read_sources(files: &[PathBuf]) -> Result<Vec<Source>> {
    if files.is_empty() {
        return Ok(vec![Source::read_stdin()?]);
    }

    sort_paths(files)
        .iter()
        .map(|path| {
            if path.as_os_str() == "-" {
                Source::read_stdin()
            } else {
                Source::read_path(path)
            }
        })
        .collect()
}

/// Split on `\n`, dropping a trailing `\r`. Invalid UTF-8 is replaced rather
/// than rejected.
fn split_lines(bytes: &[u8]) -> Vec<String> {
    let mut lines: Vec<String> = bytes
        .split(|b| *b == b'\n')
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8_lossy(line).into_owned()
        })
        .collect();

    // A final newline does not start another line.
    if bytes.ends_with(b"\n") || bytes.is_empty() {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(b""), Vec::<String>::new());
        assert_eq!(split_lines(b"a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines(b"a\r\nb\r\n"), vec!["a", "b"]);
        assert_eq!(split_lines(b"\n\n"), vec!["", ""]);
        assert_eq!(split_lines(b"caf\xe9\n"), vec!["caf\u{fffd}"]);
    }

    #[test]
    fn test_first_content_line_skips_blanks() {
        let source = Source::from_bytes("x", b"\n   \n{\"a\": 1}\nmore\n");
        assert_eq!(source.first_content_line(), Some("{\"a\": 1}"));
        assert_eq!(Source::from_bytes("x", b"\n").first_content_line(), None);
    }

    #[test]
    fn test_read_sources_from_files() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let first = temp_dir.path().join("first.log");
        let second = temp_dir.path().join("second.log");
        std::fs::write(&first, "one\n")?;
        std::fs::write(&second, "two\nthree\n")?;

        let sources = read_sources(&[first.clone(), second])?;
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, first.display().to_string());
        assert_eq!(sources[1].lines, vec!["two", "three"]);
        Ok(())
    }

    fn names(paths: Vec<PathBuf>) -> Vec<String> {
        paths.iter().map(|p| p.display().to_string()).collect()
    }

    #[test]
    fn test_sort_paths_orders_rotated_logs_numerically() {
        let paths: Vec<PathBuf> = ["app.log.10", "app.log.2", "app.log", "App.log.1"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(
            names(sort_paths(&paths)),
            vec!["app.log", "App.log.1", "app.log.2", "app.log.10"]
        );
    }

    #[test]
    fn test_sort_paths_uses_file_name_only() {
        let paths = vec![PathBuf::from("/z/a.log"), PathBuf::from("/a/b.log")];
        assert_eq!(names(sort_paths(&paths)), vec!["/z/a.log", "/a/b.log"]);
    }

    #[test]
    fn test_sort_paths_mixed_tokens_compare_as_text() {
        let paths = vec![
            PathBuf::from("web.log"),
            PathBuf::from("web.2024.log"),
            PathBuf::from("api.log"),
        ];
        assert_eq!(
            names(sort_paths(&paths)),
            vec!["api.log", "web.2024.log", "web.log"]
        );
    }

    #[test]
    fn test_read_sources_sorts_files() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let newest = temp_dir.path().join("app.log");
        let oldest = temp_dir.path().join("app.log.2");
        std::fs::write(&newest, "new\n")?;
        std::fs::write(&oldest, "old\n")?;

        let sources = read_sources(&[oldest, newest])?;
        assert_eq!(sources[0].lines, vec!["new"]);
        assert_eq!(sources[1].lines, vec!["old"]);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_sources(&[PathBuf::from("/definitely/not/here.log")]).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.log"));
    }
}
