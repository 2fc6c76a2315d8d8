#![forbid(unsafe_code)]

//! Cell types.
//!
//! A [`Cell`] is one character position of the terminal grid: a character,
//! foreground and background colors, and a set of [`Modifiers`]. Cells are
//! small `Copy` values; two cells are equal iff every field matches.

use std::fmt;

/// A terminal color.
///
/// [`Color::Reset`] is the terminal's own default ("clear"). Palette indices
/// 0..=7 are the basic ANSI colors and have named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default color.
    #[default]
    Reset,
    /// Palette index (0..=255).
    Indexed(u8),
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Self = Self::Indexed(0);
    pub const RED: Self = Self::Indexed(1);
    pub const GREEN: Self = Self::Indexed(2);
    pub const YELLOW: Self = Self::Indexed(3);
    pub const BLUE: Self = Self::Indexed(4);
    pub const MAGENTA: Self = Self::Indexed(5);
    pub const CYAN: Self = Self::Indexed(6);
    pub const WHITE: Self = Self::Indexed(7);

    /// Whether this is the terminal default.
    #[inline]
    pub const fn is_reset(self) -> bool {
        matches!(self, Self::Reset)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Reset => f.write_str("default"),
            Self::BLACK => f.write_str("black"),
            Self::RED => f.write_str("red"),
            Self::GREEN => f.write_str("green"),
            Self::YELLOW => f.write_str("yellow"),
            Self::BLUE => f.write_str("blue"),
            Self::MAGENTA => f.write_str("magenta"),
            Self::CYAN => f.write_str("cyan"),
            Self::WHITE => f.write_str("white"),
            Self::Indexed(i) => write!(f, "{i}"),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

bitflags::bitflags! {
    /// Text modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold / increased intensity.
        const BOLD      = 0b001;
        /// Underlined text.
        const UNDERLINE = 0b010;
        /// Reverse video (swap fg/bg).
        const REVERSE   = 0b100;
    }
}

/// A single styled character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Displayed character.
    pub ch: char,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Style modifiers.
    pub modifiers: Modifiers,
}

impl Cell {
    /// A blank cell: space, default colors, no modifiers.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: Color::Reset,
        bg: Color::Reset,
        modifiers: Modifiers::empty(),
    };

    /// Character stored in the columns a wide character spills into.
    pub const CONTINUATION_CHAR: char = '\0';

    /// Create a cell holding `ch` with default colors.
    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self { ch, ..Self::EMPTY }
    }

    /// Create a fully specified cell.
    #[inline]
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self {
            ch,
            fg,
            bg,
            modifiers: Modifiers::empty(),
        }
    }

    /// Replace the character, keeping colors and modifiers.
    #[inline]
    #[must_use]
    pub const fn with_char(mut self, ch: char) -> Self {
        self.ch = ch;
        self
    }

    /// Set the foreground color.
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color.
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Set the modifiers.
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Placeholder for a column covered by the wide character to its left.
    ///
    /// Keeps colors and modifiers so the covered column paints the same
    /// background.
    #[inline]
    #[must_use]
    pub const fn continuation(self) -> Self {
        self.with_char(Self::CONTINUATION_CHAR)
    }

    /// Whether the cell only marks the tail of a wide character.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.ch == Self::CONTINUATION_CHAR
    }

    /// Whether the cell is indistinguishable from [`Cell::EMPTY`].
    #[inline]
    pub fn is_blank(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}
