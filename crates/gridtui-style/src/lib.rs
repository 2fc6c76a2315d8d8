#![forbid(unsafe_code)]

//! Styles, color names, and themes.
//!
//! A [`Theme`] is an ordinary value: build one (or take
//! [`Theme::DEFAULT`]) and hand it to the widgets that need it.

pub mod color;
pub mod theme;

pub use color::{ParseError, parse_color, parse_modifier, parse_style};
pub use theme::{AttrTable, BlockTheme, Theme};

use gridtui_render::cell::{Cell, Color, Modifiers};

/// Foreground, background and modifiers applied together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub modifiers: Modifiers,
}

impl Style {
    /// Style with the given foreground and default background.
    #[must_use]
    pub const fn new(fg: Color) -> Self {
        Self {
            fg,
            bg: Color::Reset,
            modifiers: Modifiers::empty(),
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Add modifiers.
    #[must_use]
    pub const fn add_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = self.modifiers.union(modifiers);
        self
    }

    /// A cell holding `ch` in this style.
    #[inline]
    pub const fn cell(self, ch: char) -> Cell {
        Cell {
            ch,
            fg: self.fg,
            bg: self.bg,
            modifiers: self.modifiers,
        }
    }

    /// Restyle an existing cell, keeping its character.
    #[inline]
    pub const fn apply_to(self, cell: Cell) -> Cell {
        self.cell(cell.ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_builds_cells() {
        let style = Style::new(Color::GREEN)
            .bg(Color::BLACK)
            .add_modifiers(Modifiers::BOLD)
            .add_modifiers(Modifiers::UNDERLINE);
        let cell = style.cell('x');
        assert_eq!(cell.ch, 'x');
        assert_eq!(cell.fg, Color::GREEN);
        assert_eq!(cell.bg, Color::BLACK);
        assert_eq!(cell.modifiers, Modifiers::BOLD | Modifiers::UNDERLINE);
    }

    #[test]
    fn apply_keeps_character() {
        let cell = Cell::from_char('q').with_fg(Color::RED);
        let restyled = Style::new(Color::BLUE).apply_to(cell);
        assert_eq!(restyled.ch, 'q');
        assert_eq!(restyled.fg, Color::BLUE);
    }

    #[test]
    fn default_style_is_terminal_default() {
        assert_eq!(Style::default().cell(' '), Cell::EMPTY);
    }
}
