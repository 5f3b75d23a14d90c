//! Terminal rendering of classified lines and display trees.

use crate::types::ColorChoice;
use is_terminal::IsTerminal;
use logweave_engine::DisplayTree;
use logweave_types::{Color, MatchedRecord, Style, StyledText};
use owo_colors::{AnsiColors, DynColors, OwoColorize, XtermColors};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_WIDTH: usize = 19;

const EXPANDED_MARKER: &str = "▼";
const COLLAPSED_MARKER: &str = "▶";
const LEAF_MARKER: &str = "•";

/// Optional columns in front of each flat-view row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gutter {
    /// Width of the line-number column; `None` hides it
    pub number_width: Option<usize>,
    pub timestamps: bool,
}

impl Gutter {
    /// Line numbers are right-aligned to the widest number in the source.
    pub fn new(line_numbers: bool, timestamps: bool, line_count: usize) -> Self {
        Self {
            number_width: line_numbers.then(|| line_count.max(1).to_string().len()),
            timestamps,
        }
    }
}

fn dyn_color(color: Color) -> DynColors {
    let ansi = match color {
        Color::Black => AnsiColors::Black,
        Color::Red => AnsiColors::Red,
        Color::Green => AnsiColors::Green,
        Color::Yellow => AnsiColors::Yellow,
        Color::Blue => AnsiColors::Blue,
        Color::Magenta => AnsiColors::Magenta,
        Color::Cyan => AnsiColors::Cyan,
        Color::White => AnsiColors::White,
        Color::BrightBlack => AnsiColors::BrightBlack,
        Color::BrightRed => AnsiColors::BrightRed,
        Color::BrightGreen => AnsiColors::BrightGreen,
        Color::BrightYellow => AnsiColors::BrightYellow,
        Color::BrightBlue => AnsiColors::BrightBlue,
        Color::BrightMagenta => AnsiColors::BrightMagenta,
        Color::BrightCyan => AnsiColors::BrightCyan,
        Color::BrightWhite => AnsiColors::BrightWhite,
        Color::Indexed(index) => return DynColors::Xterm(XtermColors::from(index)),
        Color::Rgb(r, g, b) => return DynColors::Rgb(r, g, b),
    };
    DynColors::Ansi(ansi)
}

fn owo_style(style: Style) -> owo_colors::Style {
    let mut owo = owo_colors::Style::new();
    if let Some(fg) = style.fg {
        owo = owo.color(dyn_color(fg));
    }
    if let Some(bg) = style.bg {
        owo = owo.on_color(dyn_color(bg));
    }
    if style.bold {
        owo = owo.bold();
    }
    if style.dim {
        owo = owo.dimmed();
    }
    if style.italic {
        owo = owo.italic();
    }
    if style.underline {
        owo = owo.underline();
    }
    if style.reverse {
        owo = owo.reversed();
    }
    owo
}

/// Turns styled text into terminal output, with or without escape codes.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// `auto` colors only when stdout is a terminal.
    pub fn from_choice(choice: ColorChoice) -> Self {
        let color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stdout().is_terminal(),
        };
        Self::new(color)
    }

    pub fn paint(&self, text: &StyledText) -> String {
        if !self.color || !text.has_spans() {
            return text.text().to_string();
        }

        let mut out = String::with_capacity(text.len() + 16 * text.spans().len());
        for (segment, style) in text.segments() {
            if style.is_plain() {
                out.push_str(segment);
            } else {
                out.push_str(&segment.style(owo_style(style)).to_string());
            }
        }
        out
    }

    fn paint_str(&self, text: &str, style: Style) -> String {
        self.paint(&StyledText::styled(text, style))
    }

    pub fn header(&self, name: &str) -> String {
        self.paint_str(&format!("==> {} <==", name), Style::new().bold())
    }

    /// One flat-view row, prefixed by the columns `gutter` asks for.
    /// `number` is the 1-based line number within the source.
    pub fn flat_line(&self, number: usize, record: &MatchedRecord, gutter: Gutter) -> String {
        let mut line = String::new();
        if let Some(width) = gutter.number_width {
            let column = format!("{:>width$}", number, width = width);
            line.push_str(&self.paint_str(&column, Style::new().fg(Color::BrightBlack)));
            line.push(' ');
        }
        if gutter.timestamps {
            let column = match record.timestamp {
                Some(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
                None => " ".repeat(TIMESTAMP_WIDTH),
            };
            line.push_str(&self.paint_str(&column, Style::new().fg(Color::Blue)));
            line.push(' ');
        }
        line.push_str(&self.paint(&record.text));
        if record.truncated {
            line.push_str(&self.paint_str(" …", Style::new().dim()));
        }
        line
    }

    /// Visible rows of `tree`, indented two spaces per level.
    pub fn tree_lines(&self, tree: &DisplayTree) -> Vec<String> {
        tree.visible_rows()
            .into_iter()
            .map(|(depth, id)| {
                let node = tree.node(id);
                let marker = match (node.allow_expand, node.expanded) {
                    (false, _) => LEAF_MARKER,
                    (true, true) => EXPANDED_MARKER,
                    (true, false) => COLLAPSED_MARKER,
                };
                format!(
                    "{}{} {}",
                    "  ".repeat(depth),
                    self.paint_str(marker, Style::new().fg(Color::BrightBlack)),
                    self.paint(&node.label)
                )
            })
            .collect()
    }
}
