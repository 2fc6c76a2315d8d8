#![forbid(unsafe_code)]

use gridtui_core::geometry::{Align, Rect, Sides};
use gridtui_layout::Layoutable;
use gridtui_render::buffer::Buffer;
use gridtui_render::cell::{Cell, Color};
use gridtui_render::drawing::{BorderChars, Draw, trim_to_width};
use gridtui_style::{Style, Theme};

use crate::Drawable;

/// The rectangle, border, title and padding every widget is built on.
///
/// Geometry is stored as plain integers so callers can set any value;
/// degenerate sizes clamp to an empty area when drawn instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    border: bool,
    border_chars: BorderChars,
    border_style: Style,
    title: Option<String>,
    title_style: Style,
    bg: Color,
    padding: Sides,
    float: Align,
    visible: bool,
}

impl Default for Block {
    fn default() -> Self {
        Self::themed(&Theme::DEFAULT)
    }
}

impl Block {
    /// A 2x2 bordered block with no padding, styled by [`Theme::DEFAULT`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A 2x2 bordered block styled by `theme`.
    pub fn themed(theme: &Theme) -> Self {
        Self {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
            border: true,
            border_chars: BorderChars::SQUARE,
            border_style: theme.block.border,
            title: None,
            title_style: theme.block.title,
            bg: theme.block.background,
            padding: Sides::default(),
            float: Align::empty(),
            visible: true,
        }
    }

    /// Turn the border on or off.
    #[must_use]
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Set the border glyphs.
    #[must_use]
    pub fn with_border_chars(mut self, chars: BorderChars) -> Self {
        self.border_chars = chars;
        self
    }

    /// Set the border style.
    #[must_use]
    pub fn with_border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    /// Set the title shown on the top border.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the title style.
    #[must_use]
    pub fn with_title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    /// Set the interior fill color.
    #[must_use]
    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Set the padding inside the border.
    #[must_use]
    pub fn with_padding(mut self, padding: impl Into<Sides>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Set the outer rectangle.
    #[must_use]
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.set_area(rect);
        self
    }

    /// Set the width, keeping position and height.
    #[must_use]
    pub fn with_width(mut self, width: i32) -> Self {
        self.width = width;
        self
    }

    /// Set the height, keeping position and width.
    #[must_use]
    pub fn with_height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }

    /// Set how [`Block::align_within`] places the block.
    #[must_use]
    pub fn with_float(mut self, float: Align) -> Self {
        self.float = float;
        self
    }

    /// Show or hide the block.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Position and size the block from two corners; `(x1, y1)` is exclusive.
    pub fn set_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.x = x0;
        self.y = y0;
        self.width = x1.saturating_sub(x0);
        self.height = y1.saturating_sub(y0);
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Replace the padding.
    pub fn set_padding(&mut self, padding: impl Into<Sides>) {
        self.padding = padding.into();
    }

    /// Turn the border on or off.
    pub fn set_border(&mut self, border: bool) {
        self.border = border;
    }

    /// Set the interior fill color.
    pub fn set_bg(&mut self, bg: Color) {
        self.bg = bg;
    }

    /// Show or hide the block.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Move the block inside `parent` according to its float flags.
    ///
    /// A block without float flags stays where it is.
    pub fn align_within(&mut self, parent: Rect) {
        if self.float.is_empty() {
            return;
        }
        let placed = self.rect().align_within(parent, self.float);
        self.x = placed.x;
        self.y = placed.y;
    }

    /// Outer rectangle. Negative sizes read as zero.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn has_border(&self) -> bool {
        self.border
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn padding(&self) -> Sides {
        self.padding
    }

    pub fn bg(&self) -> Color {
        self.bg
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Content rectangle inside the border and padding.
    ///
    /// With border width `b` (0 or 1):
    /// `x + b + left`, `y + b + top`,
    /// `max(0, width - 2b - left - right)`, `max(0, height - 2b - top - bottom)`.
    pub fn inner_bounds(&self) -> Rect {
        let b = i32::from(self.border);
        let p = self.padding;
        Rect::new(
            self.x.saturating_add(b).saturating_add(p.left),
            self.y.saturating_add(b).saturating_add(p.top),
            self.width
                .saturating_sub(2 * b)
                .saturating_sub(p.horizontal_sum())
                .max(0),
            self.height
                .saturating_sub(2 * b)
                .saturating_sub(p.vertical_sum())
                .max(0),
        )
    }

    fn draw_title(&self, rect: Rect, buf: &mut Buffer) {
        let Some(title) = self.title.as_deref() else {
            return;
        };
        let room = rect.width - 2;
        if room <= 0 {
            return;
        }
        let text = trim_to_width(title, room);
        buf.print_text_clipped(
            rect.x + 1,
            rect.y,
            &text,
            self.title_style.cell(' '),
            rect.right() - 1,
        );
    }
}

impl Drawable for Block {
    /// Paint the base coat: interior fill, then border and title.
    fn draw(&self, buf: &mut Buffer) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_draw",
            widget = "Block",
            x = self.x,
            y = self.y,
            w = self.width,
            h = self.height
        )
        .entered();

        let rect = self.rect();
        if !self.visible || rect.is_empty() {
            return;
        }

        let b = i32::from(self.border);
        buf.fill(rect.inner(Sides::all(b)), Cell::EMPTY.with_bg(self.bg));

        if self.border {
            buf.draw_border(rect, self.border_chars, self.border_style.cell(' '));
            self.draw_title(rect, buf);
        }
    }

    fn bounds(&self) -> Rect {
        self.rect()
    }
}

impl Layoutable for Block {
    fn preferred_height(&self) -> i32 {
        self.height
    }

    fn set_area(&mut self, area: Rect) {
        self.x = area.x;
        self.y = area.y;
        self.width = area.width;
        self.height = area.height;
    }
}
