#![forbid(unsafe_code)]

//! Parsing colors, modifiers and style strings from text.
//!
//! Accepted color forms: `default`/`reset`/`clear`, the eight basic names
//! (`black` .. `white`), a palette index `0..=255`, and `#rrggbb`.
//! Matching is case-insensitive and ignores surrounding whitespace.

use std::fmt;

use crate::Style;
use gridtui_render::cell::{Color, Modifiers};

/// Error returned when a color, modifier or style string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    input: String,
    expected: &'static str,
}

impl ParseError {
    fn new(input: &str, expected: &'static str) -> Self {
        Self {
            input: input.to_owned(),
            expected,
        }
    }

    /// The token that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.expected, self.input)
    }
}

impl std::error::Error for ParseError {}

/// Parse a single color.
pub fn parse_color(text: &str) -> Result<Color, ParseError> {
    let token = text.trim().to_ascii_lowercase();
    let color = match token.as_str() {
        "default" | "reset" | "clear" => Color::Reset,
        "black" => Color::BLACK,
        "red" => Color::RED,
        "green" => Color::GREEN,
        "yellow" => Color::YELLOW,
        "blue" => Color::BLUE,
        "magenta" => Color::MAGENTA,
        "cyan" => Color::CYAN,
        "white" => Color::WHITE,
        hex if hex.starts_with('#') => {
            parse_hex(&hex[1..]).ok_or_else(|| ParseError::new(text, "color"))?
        }
        index => index
            .parse::<u8>()
            .map(Color::Indexed)
            .map_err(|_| ParseError::new(text, "color"))?,
    };
    Ok(color)
}

fn parse_hex(digits: &str) -> Option<Color> {
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Parse a single modifier name: `bold`, `underline` or `reverse`.
pub fn parse_modifier(text: &str) -> Result<Modifiers, ParseError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "bold" => Ok(Modifiers::BOLD),
        "underline" => Ok(Modifiers::UNDERLINE),
        "reverse" => Ok(Modifiers::REVERSE),
        _ => Err(ParseError::new(text, "modifier")),
    }
}

/// Parse a comma-separated style such as `"red, bold"` or
/// `"fg=white,bg=blue,underline"`.
///
/// A bare color sets the foreground. `fg=`/`bg=` set either side
/// explicitly. Modifiers accumulate. Later colors override earlier ones.
/// Empty tokens are ignored.
pub fn parse_style(text: &str) -> Result<Style, ParseError> {
    let mut style = Style::default();
    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some((key, value)) = token.split_once('=') {
            match key.trim().to_ascii_lowercase().as_str() {
                "fg" => style.fg = parse_color(value)?,
                "bg" => style.bg = parse_color(value)?,
                _ => return Err(ParseError::new(token, "style key")),
            }
        } else if let Ok(modifier) = parse_modifier(token) {
            style.modifiers |= modifier;
        } else {
            style.fg = parse_color(token)?;
        }
    }
    Ok(style)
}
