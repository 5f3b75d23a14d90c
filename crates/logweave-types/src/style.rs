use std::collections::BTreeSet;

/// Terminal color, independent of any rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    /// 256-color palette index
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    /// Standard color for an SGR offset 0..=7 (30-37 / 40-47).
    pub fn from_ansi_offset(offset: u8, bright: bool) -> Option<Self> {
        let color = match (offset, bright) {
            (0, false) => Color::Black,
            (1, false) => Color::Red,
            (2, false) => Color::Green,
            (3, false) => Color::Yellow,
            (4, false) => Color::Blue,
            (5, false) => Color::Magenta,
            (6, false) => Color::Cyan,
            (7, false) => Color::White,
            (0, true) => Color::BrightBlack,
            (1, true) => Color::BrightRed,
            (2, true) => Color::BrightGreen,
            (3, true) => Color::BrightYellow,
            (4, true) => Color::BrightBlue,
            (5, true) => Color::BrightMagenta,
            (6, true) => Color::BrightCyan,
            (7, true) => Color::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

/// Text attributes applied to a span.
///
/// Layering follows terminal semantics: a later style replaces colors it sets
/// and adds the attributes it enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            dim: false,
            italic: false,
            underline: false,
            reverse: false,
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }

    /// Layer `other` on top of `self`.
    pub fn patch(self, other: Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            bold: self.bold || other.bold,
            dim: self.dim || other.dim,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            reverse: self.reverse || other.reverse,
        }
    }
}

/// A styled byte range within a [`StyledText`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

impl Span {
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }
}

/// Plain text plus an ordered list of style spans.
///
/// Spans may overlap; later spans are layered over earlier ones when the text
/// is flattened with [`StyledText::segments`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    text: String,
    spans: Vec<Span>,
}

impl StyledText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        let mut styled = Self::default();
        styled.append(&text.into(), style);
        styled
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn has_spans(&self) -> bool {
        !self.spans.is_empty()
    }

    /// Append text, styling it when `style` is not plain.
    pub fn append(&mut self, text: &str, style: Style) {
        let start = self.text.len();
        self.text.push_str(text);
        if !style.is_plain() && !text.is_empty() {
            self.spans.push(Span::new(start, self.text.len(), style));
        }
    }

    /// Style the byte range `start..end`.
    ///
    /// Ranges that are empty, out of bounds or not on char boundaries are ignored.
    pub fn stylize(&mut self, start: usize, end: usize, style: Style) {
        let end = end.min(self.text.len());
        if start >= end
            || !self.text.is_char_boundary(start)
            || !self.text.is_char_boundary(end)
            || style.is_plain()
        {
            return;
        }
        self.spans.push(Span::new(start, end, style));
    }

    /// Resolved style of the byte at `offset`.
    pub fn style_at(&self, offset: usize) -> Style {
        self.spans
            .iter()
            .filter(|span| span.start <= offset && offset < span.end)
            .fold(Style::default(), |acc, span| acc.patch(span.style))
    }

    /// Flatten overlapping spans into consecutive `(text, style)` runs.
    pub fn segments(&self) -> Vec<(&str, Style)> {
        if self.text.is_empty() {
            return Vec::new();
        }

        // (offset, span index, opens); opens sort before closes at one offset
        let mut events: Vec<(usize, usize, bool)> = Vec::with_capacity(self.spans.len() * 2);
        for (index, span) in self.spans.iter().enumerate() {
            events.push((span.start, index, true));
            events.push((span.end, index, false));
        }
        events.sort_unstable_by_key(|&(offset, _, opens)| (offset, !opens));

        let len = self.text.len();
        let mut events = events.into_iter().peekable();
        let mut active: BTreeSet<usize> = BTreeSet::new();
        let mut runs: Vec<(usize, usize, Style)> = Vec::new();
        let mut position = 0;

        while position < len {
            while let Some(&(offset, index, opens)) = events.peek() {
                if offset > position {
                    break;
                }
                if opens {
                    active.insert(index);
                } else {
                    active.remove(&index);
                }
                events.next();
            }

            let end = events
                .peek()
                .map_or(len, |&(offset, _, _)| offset.min(len));
            // Later spans layer over earlier ones.
            let style = active
                .iter()
                .fold(Style::default(), |acc, &index| acc.patch(self.spans[index].style));
            match runs.last_mut() {
                Some((_, last_end, last_style)) if *last_style == style => *last_end = end,
                _ => runs.push((position, end, style)),
            }
            position = end;
        }

        runs.into_iter()
            .map(|(start, end, style)| (&self.text[start..end], style))
            .collect()
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        StyledText::new(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        StyledText::new(text)
    }
}

impl std::fmt::Display for StyledText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
