#![forbid(unsafe_code)]

//! Braille line canvas.
//!
//! Each terminal cell holds a 2x4 grid of dots, one bit per dot, rendered
//! as a Unicode Braille pattern (U+2800..U+28FF). Dot coordinates are
//! absolute: dot `(x, y)` belongs to screen cell `(x / 2, y / 4)`.
//!
//! ```text
//! dot column:  0     1
//! row 0      0x01  0x08
//! row 1      0x02  0x10
//! row 2      0x04  0x20
//! row 3      0x40  0x80
//! ```
//!
//! # Example
//! ```
//! use gridtui_core::geometry::Rect;
//! use gridtui_render::cell::Color;
//! use gridtui_widgets::{Block, Canvas};
//!
//! let mut canvas = Canvas::new().with_block(
//!     Block::new().with_border(false).with_rect(Rect::new(0, 0, 4, 2)),
//! );
//! canvas.set_line((0, 0), (4, 0), Color::GREEN);
//! assert_eq!(canvas.mask_at(0, 0), 0x09);
//! assert_eq!(canvas.mask_at(1, 0), 0x09);
//! ```

use std::collections::BTreeMap;

use gridtui_core::geometry::Rect;
use gridtui_layout::Layoutable;
use gridtui_render::buffer::Buffer;
use gridtui_render::cell::{Cell, Color};
use gridtui_style::Theme;

use crate::{Block, Drawable};

/// First Braille pattern code point; the dot mask is added to it.
pub const BRAILLE_OFFSET: u32 = 0x2800;

/// Bit for each dot, indexed `[y % 4][x % 2]`.
pub const BRAILLE: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DotCell {
    mask: u8,
    color: Color,
}

/// A block that plots dots and lines at 2x4 sub-cell resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    block: Block,
    line_color: Color,
    // Keyed by (row, column) so drawing walks cells in row-major order.
    cells: BTreeMap<(i32, i32), DotCell>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::themed(&Theme::DEFAULT)
    }
}

impl Canvas {
    /// Empty canvas on a default [`Block`].
    pub fn new() -> Self {
        Self::themed(&Theme::DEFAULT)
    }

    /// Empty canvas whose block and default line color come from `theme`.
    pub fn themed(theme: &Theme) -> Self {
        Self {
            block: Block::themed(theme),
            line_color: theme.default.fg,
            cells: BTreeMap::new(),
        }
    }

    /// Replace the underlying block.
    #[must_use]
    pub fn with_block(mut self, block: Block) -> Self {
        self.block = block;
        self
    }

    /// Color used by [`Canvas::line`] and [`Canvas::point`].
    #[must_use]
    pub fn with_line_color(mut self, color: Color) -> Self {
        self.line_color = color;
        self
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn block_mut(&mut self) -> &mut Block {
        &mut self.block
    }

    pub fn line_color(&self) -> Color {
        self.line_color
    }

    /// Turn on the dot at `(x, y)`. Negative coordinates are ignored.
    pub fn set_point(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let bit = BRAILLE[(y % 4) as usize][(x % 2) as usize];
        let cell = self.cells.entry((y / 4, x / 2)).or_insert(DotCell {
            mask: 0,
            color,
        });
        cell.mask |= bit;
        cell.color = color;
    }

    /// [`Canvas::set_point`] with the default line color.
    pub fn point(&mut self, x: i32, y: i32) {
        self.set_point(x, y, self.line_color);
    }

    /// Plot a line between two dots.
    ///
    /// The walk covers every x from the leftmost point up to, but not
    /// including, the rightmost one. At each x the running y target moves by
    /// the slope; a dot is turned on at the current y, then y steps toward
    /// the target, turning on a dot per step, so steep lines stay connected.
    /// A vertical segment (both x equal) covers no x and draws nothing.
    pub fn set_line(&mut self, p0: (i32, i32), p1: (i32, i32), color: Color) {
        let (left, right) = if p0.0 > p1.0 { (p1, p0) } else { (p0, p1) };

        let dx = (right.0 - left.0).abs();
        let dy = (right.1 - left.1).abs();
        if dx == 0 {
            return;
        }
        let slope = f64::from(dy) / f64::from(dx);
        let dir: i32 = if right.1 < left.1 { -1 } else { 1 };

        let mut target = f64::from(left.1);
        let mut current = left.1;
        for x in left.0..right.0 {
            target += slope * f64::from(dir);
            let goal = target as i32;
            if current == goal {
                self.set_point(x, current, color);
            }
            while current != goal {
                self.set_point(x, current, color);
                current += dir;
            }
        }
    }

    /// [`Canvas::set_line`] with the default line color.
    pub fn line(&mut self, p0: (i32, i32), p1: (i32, i32)) {
        self.set_line(p0, p1, self.line_color);
    }

    /// Dot mask of screen cell `(x, y)`; zero when nothing is plotted there.
    pub fn mask_at(&self, x: i32, y: i32) -> u8 {
        self.cells.get(&(y, x)).map_or(0, |c| c.mask)
    }

    /// Color of screen cell `(x, y)`, if any dot is plotted there.
    pub fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        self.cells.get(&(y, x)).map(|c| c.color)
    }

    /// Number of screen cells with at least one dot.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Remove every plotted dot.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// The block rectangle measured in dots.
    pub fn dot_area(&self) -> Rect {
        let r = self.block.rect();
        Rect::new(r.x * 2, r.y * 4, r.width * 2, r.height * 4)
    }
}

impl Drawable for Canvas {
    fn draw(&self, buf: &mut Buffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("canvas.draw", cells = self.cells.len()).entered();

        self.block.draw(buf);
        if !self.block.is_visible() {
            return;
        }

        let clip = self.block.rect();
        for (&(y, x), dots) in &self.cells {
            if !clip.contains(x, y) {
                continue;
            }
            let ch = char::from_u32(BRAILLE_OFFSET + u32::from(dots.mask)).unwrap_or(' ');
            let bg = buf.get(x, y).bg;
            buf.set(x, y, Cell::new(ch, dots.color, bg));
        }
    }

    fn bounds(&self) -> Rect {
        self.block.rect()
    }
}

impl Layoutable for Canvas {
    fn preferred_height(&self) -> i32 {
        self.block.preferred_height()
    }

    fn set_area(&mut self, area: Rect) {
        self.block.set_area(area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(rect: Rect) -> Canvas {
        Canvas::new().with_block(Block::new().with_border(false).with_rect(rect))
    }

    fn dots(canvas: &Canvas) -> Vec<((i32, i32), u8)> {
        canvas
            .cells
            .iter()
            .map(|(&(y, x), c)| ((x, y), c.mask))
            .collect()
    }

    #[test]
    fn horizontal_line_excludes_right_endpoint() {
        let mut c = plain(Rect::new(0, 0, 4, 1));
        c.set_line((0, 0), (4, 0), Color::RED);
        assert_eq!(dots(&c), vec![((0, 0), 0x09), ((1, 0), 0x09)]);
    }

    #[test]
    fn diagonal_line() {
        let mut c = plain(Rect::new(0, 0, 4, 1));
        c.set_line((0, 0), (3, 3), Color::RED);
        // Dots (0,0), (1,1), (2,2).
        assert_eq!(c.mask_at(0, 0), 0x01 | 0x10);
        assert_eq!(c.mask_at(1, 0), 0x04);
        assert_eq!(c.cell_count(), 2);
    }

    #[test]
    fn steep_upward_line_stays_connected() {
        let mut c = plain(Rect::new(0, 0, 4, 1));
        c.set_line((0, 3), (2, 0), Color::RED);
        // Dots (0,3), (0,2), (1,1).
        assert_eq!(c.mask_at(0, 0), 0x40 | 0x04 | 0x10);
        assert_eq!(c.cell_count(), 1);
    }

    #[test]
    fn endpoints_are_order_independent() {
        let mut a = plain(Rect::new(0, 0, 10, 4));
        let mut b = a.clone();
        a.set_line((1, 2), (15, 9), Color::RED);
        b.set_line((15, 9), (1, 2), Color::RED);
        assert_eq!(dots(&a), dots(&b));
    }

    #[test]
    fn vertical_line_draws_nothing() {
        let mut c = plain(Rect::new(0, 0, 4, 4));
        c.set_line((3, 0), (3, 12), Color::RED);
        assert!(c.is_empty());
    }

    #[test]
    fn segments_sharing_a_cell_accumulate() {
        let mut c = plain(Rect::new(0, 0, 4, 1));
        c.set_line((0, 0), (2, 0), Color::RED);
        c.set_line((0, 3), (2, 3), Color::BLUE);
        assert_eq!(c.mask_at(0, 0), 0x09 | 0xC0);
        assert_eq!(c.color_at(0, 0), Some(Color::BLUE));
    }

    #[test]
    fn negative_dots_are_skipped() {
        let mut c = plain(Rect::new(0, 0, 4, 1));
        c.set_line((-4, 0), (2, 0), Color::RED);
        assert_eq!(dots(&c), vec![((0, 0), 0x09)]);
        c.set_point(3, -1, Color::RED);
        assert_eq!(c.cell_count(), 1);
    }

    #[test]
    fn draw_emits_braille_inside_rect_only() {
        let mut c = plain(Rect::new(1, 0, 2, 1)).with_line_color(Color::GREEN);
        c.line((0, 0), (8, 0));
        let mut buf = Buffer::new(Rect::from_size(6, 2));
        c.draw(&mut buf);

        assert_eq!(buf.get_stored(0, 0), None);
        assert_eq!(buf.get(1, 0).ch, '\u{2809}');
        assert_eq!(buf.get(2, 0).ch, '\u{2809}');
        assert_eq!(buf.get(1, 0).fg, Color::GREEN);
        assert_eq!(buf.get_stored(3, 0), None);
    }

    #[test]
    fn draw_keeps_block_background() {
        let mut c = Canvas::new().with_block(
            Block::new()
                .with_rect(Rect::new(0, 0, 4, 3))
                .with_bg(Color::BLUE),
        );
        c.point(2, 4);
        let mut buf = Buffer::new(Rect::from_size(4, 3));
        c.draw(&mut buf);
        let cell = buf.get(1, 1);
        assert_eq!(cell.ch, '\u{2801}');
        assert_eq!(cell.bg, Color::BLUE);
        assert_eq!(buf.get(0, 0).ch, '┌');
    }

    #[test]
    fn clear_and_dot_area() {
        let mut c = plain(Rect::new(1, 2, 3, 4));
        assert_eq!(c.dot_area(), Rect::new(2, 8, 6, 16));
        c.point(2, 8);
        assert!(!c.is_empty());
        c.clear();
        assert!(c.is_empty());
    }

    #[test]
    fn themed_canvas_uses_default_fg() {
        let theme = Theme::builder()
            .default_style(gridtui_style::Style::new(Color::YELLOW))
            .build();
        assert_eq!(Canvas::themed(&theme).line_color(), Color::YELLOW);
    }
}

#[cfg(test)]
mod canvas_proptests {
    use super::*;
    use proptest::prelude::*;

    fn point() -> impl Strategy<Value = (i32, i32)> {
        (0i32..40, 0i32..40)
    }

    proptest! {
        #[test]
        fn masks_are_or_of_segments(a0 in point(), a1 in point(), b0 in point(), b1 in point()) {
            let mut both = Canvas::new();
            both.set_line(a0, a1, Color::RED);
            both.set_line(b0, b1, Color::RED);

            let mut first = Canvas::new();
            first.set_line(a0, a1, Color::RED);
            let mut second = Canvas::new();
            second.set_line(b0, b1, Color::RED);

            for y in 0..10 {
                for x in 0..20 {
                    prop_assert_eq!(both.mask_at(x, y), first.mask_at(x, y) | second.mask_at(x, y));
                }
            }
        }

        #[test]
        fn every_column_gets_a_dot(p0 in point(), p1 in point()) {
            prop_assume!(p0.0 != p1.0);
            let mut c = Canvas::new();
            c.set_line(p0, p1, Color::RED);
            let (lo, hi) = (p0.0.min(p1.0), p0.0.max(p1.0));
            for x in lo..hi {
                let column_lit = (0..10).any(|cy| {
                    let bits = c.mask_at(x / 2, cy);
                    (0..4).any(|row| bits & BRAILLE[row][(x % 2) as usize] != 0)
                });
                prop_assert!(column_lit, "no dot in column {}", x);
            }
        }
    }
}
