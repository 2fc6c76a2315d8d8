#![forbid(unsafe_code)]

//! Drawing primitives for the buffer.
//!
//! Helpers on top of [`Buffer::set`] so widgets can draw borders, lines and
//! text without duplicating cell loops. Every operation respects the
//! buffer's scissor stack and silently clips to it.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::buffer::Buffer;
use crate::cell::Cell;
use gridtui_core::geometry::Rect;

/// Marker appended to text trimmed by [`trim_to_width`].
pub const ELLIPSIS: &str = "…";

/// Characters used to draw a border around a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BorderChars {
    /// Simple box-drawing characters (U+250x).
    pub const SQUARE: Self = Self {
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
    };

    /// Rounded corners.
    pub const ROUNDED: Self = Self {
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        horizontal: '─',
        vertical: '│',
    };

    /// Double-line border.
    pub const DOUBLE: Self = Self {
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        horizontal: '═',
        vertical: '║',
    };

    /// Heavy (thick) border.
    pub const HEAVY: Self = Self {
        top_left: '┏',
        top_right: '┓',
        bottom_left: '┗',
        bottom_right: '┛',
        horizontal: '━',
        vertical: '┃',
    };

    /// ASCII-only border.
    pub const ASCII: Self = Self {
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        horizontal: '-',
        vertical: '|',
    };
}

impl Default for BorderChars {
    fn default() -> Self {
        Self::SQUARE
    }
}

/// Extension trait for drawing on a [`Buffer`].
pub trait Draw {
    /// Draw a horizontal run of `width` copies of `cell`.
    fn draw_horizontal_line(&mut self, x: i32, y: i32, width: i32, cell: Cell);

    /// Draw a vertical run of `height` copies of `cell`.
    fn draw_vertical_line(&mut self, x: i32, y: i32, height: i32, cell: Cell);

    /// Fill a rectangle.
    fn draw_rect_filled(&mut self, rect: Rect, cell: Cell);

    /// Print text starting at `(x, y)`, stopping before `max_x`.
    ///
    /// Characters replace the content; colors and modifiers come from
    /// `base_cell`. Zero-width characters are skipped and a wide character
    /// that would straddle `max_x` is not started. The extra columns of a
    /// wide character get [`Cell::continuation`] cells. Returns the x
    /// position after the last printed character.
    fn print_text_clipped(&mut self, x: i32, y: i32, text: &str, base_cell: Cell, max_x: i32)
    -> i32;

    /// Draw a border along the edges of `rect`.
    ///
    /// Edges are drawn first, then corners. A rectangle narrower or shorter
    /// than 2 cells has no room for distinct corners and gets no border.
    fn draw_border(&mut self, rect: Rect, chars: BorderChars, base_cell: Cell);
}

impl Draw for Buffer {
    fn draw_horizontal_line(&mut self, x: i32, y: i32, width: i32, cell: Cell) {
        for i in 0..width.max(0) {
            self.set(x.saturating_add(i), y, cell);
        }
    }

    fn draw_vertical_line(&mut self, x: i32, y: i32, height: i32, cell: Cell) {
        for i in 0..height.max(0) {
            self.set(x, y.saturating_add(i), cell);
        }
    }

    fn draw_rect_filled(&mut self, rect: Rect, cell: Cell) {
        self.fill(rect, cell);
    }

    fn print_text_clipped(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        base_cell: Cell,
        max_x: i32,
    ) -> i32 {
        let mut cx = x;
        for ch in text.chars() {
            let width = UnicodeWidthChar::width(ch).unwrap_or(0) as i32;
            if width == 0 {
                continue;
            }
            if cx.saturating_add(width) > max_x {
                break;
            }
            self.set(cx, y, base_cell.with_char(ch));
            for tail in 1..width {
                self.set(cx.saturating_add(tail), y, base_cell.continuation());
            }
            cx = cx.saturating_add(width);
        }
        cx
    }

    fn draw_border(&mut self, rect: Rect, chars: BorderChars, base_cell: Cell) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }

        let h_cell = base_cell.with_char(chars.horizontal);
        let v_cell = base_cell.with_char(chars.vertical);
        let right = rect.right() - 1;
        let bottom = rect.bottom() - 1;

        self.draw_horizontal_line(rect.x, rect.y, rect.width, h_cell);
        self.draw_horizontal_line(rect.x, bottom, rect.width, h_cell);
        self.draw_vertical_line(rect.x, rect.y + 1, rect.height - 2, v_cell);
        self.draw_vertical_line(right, rect.y + 1, rect.height - 2, v_cell);

        self.set(rect.x, rect.y, base_cell.with_char(chars.top_left));
        self.set(right, rect.y, base_cell.with_char(chars.top_right));
        self.set(rect.x, bottom, base_cell.with_char(chars.bottom_left));
        self.set(right, bottom, base_cell.with_char(chars.bottom_right));
    }
}

/// Display width of `text` in terminal cells.
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Trim `text` to at most `width` cells, ending in [`ELLIPSIS`] when cut.
///
/// Returns the input unchanged when it already fits and an empty string for
/// non-positive widths. Grapheme clusters are never split.
pub fn trim_to_width(text: &str, width: i32) -> Cow<'_, str> {
    if width <= 0 {
        return Cow::Borrowed("");
    }
    let width = width as usize;
    if text_width(text) <= width {
        return Cow::Borrowed(text);
    }

    let budget = width.saturating_sub(text_width(ELLIPSIS));
    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = text_width(grapheme);
        if used + w > budget {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Color;

    fn row(buf: &Buffer, y: i32, x0: i32, x1: i32) -> String {
        (x0..x1).map(|x| buf.get(x, y).ch).collect()
    }

    #[test]
    fn border_edges_and_corners() {
        let mut buf = Buffer::new(Rect::new(0, 0, 5, 3));
        buf.draw_border(Rect::new(0, 0, 5, 3), BorderChars::SQUARE, Cell::EMPTY);
        assert_eq!(row(&buf, 0, 0, 5), "┌───┐");
        assert_eq!(row(&buf, 1, 0, 5), "│   │");
        assert_eq!(row(&buf, 2, 0, 5), "└───┘");
        // Interior untouched.
        assert!(buf.get_stored(2, 1).is_none());
    }

    #[test]
    fn border_two_by_two_is_only_corners() {
        let mut buf = Buffer::new(Rect::new(0, 0, 2, 2));
        buf.draw_border(Rect::new(0, 0, 2, 2), BorderChars::ASCII, Cell::EMPTY);
        assert_eq!(row(&buf, 0, 0, 2), "++");
        assert_eq!(row(&buf, 1, 0, 2), "++");
    }

    #[test]
    fn border_degenerate_rects_draw_nothing() {
        let mut buf = Buffer::new(Rect::new(0, 0, 10, 10));
        for rect in [
            Rect::new(0, 0, 1, 5),
            Rect::new(0, 0, 5, 1),
            Rect::new(0, 0, 0, 0),
            Rect::new(3, 3, -4, 2),
        ] {
            buf.draw_border(rect, BorderChars::SQUARE, Cell::EMPTY);
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn border_uses_base_cell_colors() {
        let mut buf = Buffer::new(Rect::new(0, 0, 3, 3));
        let base = Cell::EMPTY.with_fg(Color::RED);
        buf.draw_border(Rect::new(0, 0, 3, 3), BorderChars::DOUBLE, base);
        assert_eq!(buf.get(0, 0), base.with_char('╔'));
        assert_eq!(buf.get(1, 2), base.with_char('═'));
    }

    #[test]
    fn print_text_clips_at_max_x() {
        let mut buf = Buffer::new(Rect::new(0, 0, 10, 1));
        let end = buf.print_text_clipped(1, 0, "hello", Cell::EMPTY, 4);
        assert_eq!(end, 4);
        assert_eq!(row(&buf, 0, 0, 5), " hel ");
    }

    #[test]
    fn print_text_does_not_split_wide_chars() {
        let mut buf = Buffer::new(Rect::new(0, 0, 10, 1));
        let end = buf.print_text_clipped(0, 0, "a中b", Cell::EMPTY, 2);
        assert_eq!(end, 1);
        assert_eq!(buf.get(0, 0).ch, 'a');
        assert!(buf.get_stored(1, 0).is_none());
    }

    #[test]
    fn lines_ignore_negative_lengths() {
        let mut buf = Buffer::new(Rect::new(0, 0, 4, 4));
        buf.draw_horizontal_line(0, 0, -3, Cell::from_char('-'));
        buf.draw_vertical_line(0, 0, -1, Cell::from_char('|'));
        assert!(buf.is_empty());
        buf.draw_vertical_line(1, 0, 10, Cell::from_char('|'));
        assert_eq!(buf.stored_len(), 10);
        assert_eq!(buf.get(1, 9).ch, '|');
    }

    #[test]
    fn wide_char_covers_its_second_column() {
        let mut buf = Buffer::new(Rect::new(0, 0, 6, 1));
        buf.draw_horizontal_line(0, 0, 6, Cell::from_char('─'));
        let end = buf.print_text_clipped(0, 0, "中b", Cell::EMPTY, 6);
        assert_eq!(end, 3);
        assert_eq!(buf.get(0, 0).ch, '中');
        assert!(buf.get(1, 0).is_continuation());
        assert_eq!(buf.get(2, 0).ch, 'b');
        assert_eq!(buf.get(3, 0).ch, '─');
    }

    #[test]
    fn trim_keeps_short_text() {
        assert_eq!(trim_to_width("abc", 3), "abc");
        assert!(matches!(trim_to_width("abc", 5), Cow::Borrowed(_)));
    }

    #[test]
    fn trim_appends_ellipsis() {
        assert_eq!(trim_to_width("abcdef", 4), "abc…");
        assert_eq!(trim_to_width("abcdef", 1), "…");
        assert_eq!(trim_to_width("abcdef", 0), "");
        assert_eq!(trim_to_width("abcdef", -2), "");
    }

    #[test]
    fn trim_respects_wide_chars() {
        // "中文字" is 6 cells wide; 4 cells leave room for one wide char.
        assert_eq!(trim_to_width("中文字", 4), "中…");
        assert_eq!(text_width("中文字"), 6);
    }
}
