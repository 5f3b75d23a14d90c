//! Conversion of terminal escape sequences into styled spans.

use logweave_types::{Color, Style, StyledText};

const ESC: char = '\u{1b}';
const BEL: char = '\u{7}';

pub fn contains_ansi(text: &str) -> bool {
    text.contains(ESC)
}

fn is_ansi_final_byte(ch: char) -> bool {
    ('@'..='~').contains(&ch)
}

/// Strip escape sequences from `text`, turning SGR codes into spans.
///
/// CSI sequences other than SGR and OSC sequences are dropped.
pub fn from_ansi(text: &str) -> StyledText {
    let mut out = StyledText::default();
    let mut style = Style::new();
    let mut run = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != ESC {
            run.push(ch);
            continue;
        }

        match chars.next() {
            Some('[') => {
                let mut params = String::new();
                let mut final_byte = None;
                for seq_char in chars.by_ref() {
                    if is_ansi_final_byte(seq_char) {
                        final_byte = Some(seq_char);
                        break;
                    }
                    params.push(seq_char);
                }
                if final_byte == Some('m') {
                    out.append(&run, style);
                    run.clear();
                    style = apply_sgr(style, &params);
                }
            }
            Some(']') => {
                // OSC: terminated by BEL or ESC \
                while let Some(seq_char) = chars.next() {
                    if seq_char == BEL {
                        break;
                    }
                    if seq_char == ESC && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    out.append(&run, style);
    out
}

fn apply_sgr(mut style: Style, params: &str) -> Style {
    let codes: Vec<u16> = params
        .split(';')
        .map(|code| code.parse::<u16>().unwrap_or(0))
        .collect();

    let mut i = 0;
    while i < codes.len() {
        match codes[i] {
            0 => style = Style::new(),
            1 => style.bold = true,
            2 => style.dim = true,
            3 => style.italic = true,
            4 => style.underline = true,
            7 => style.reverse = true,
            22 => {
                style.bold = false;
                style.dim = false;
            }
            23 => style.italic = false,
            24 => style.underline = false,
            27 => style.reverse = false,
            code @ 30..=37 => style.fg = Color::from_ansi_offset((code - 30) as u8, false),
            39 => style.fg = None,
            code @ 40..=47 => style.bg = Color::from_ansi_offset((code - 40) as u8, false),
            49 => style.bg = None,
            code @ 90..=97 => style.fg = Color::from_ansi_offset((code - 90) as u8, true),
            code @ 100..=107 => style.bg = Color::from_ansi_offset((code - 100) as u8, true),
            code @ (38 | 48) => {
                let (color, consumed) = extended_color(&codes[i + 1..]);
                if code == 38 {
                    style.fg = color.or(style.fg);
                } else {
                    style.bg = color.or(style.bg);
                }
                i += consumed;
            }
            _ => {}
        }
        i += 1;
    }
    style
}

/// Parse the arguments following 38/48. Returns the color and how many codes
/// were consumed.
fn extended_color(args: &[u16]) -> (Option<Color>, usize) {
    match args {
        [5, index, ..] => (u8::try_from(*index).ok().map(Color::Indexed), 2),
        [2, r, g, b, ..] => {
            let channel = |v: u16| u8::try_from(v).ok();
            let color = match (channel(*r), channel(*g), channel(*b)) {
                (Some(r), Some(g), Some(b)) => Some(Color::Rgb(r, g, b)),
                _ => None,
            };
            (color, 4)
        }
        _ => (None, args.len()),
    }
}
