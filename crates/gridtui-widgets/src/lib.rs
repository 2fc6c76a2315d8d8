#![forbid(unsafe_code)]

//! Core widgets and the [`Drawable`] contract.
//!
//! Every widget paints itself into a [`Buffer`] in absolute screen
//! coordinates. Widgets hold a [`Block`] for their geometry and base coat
//! instead of inheriting from it.

pub mod block;
pub mod canvas;

pub use block::Block;
pub use canvas::Canvas;

use gridtui_core::geometry::Rect;
use gridtui_layout::{Grid, Node};
use gridtui_render::buffer::Buffer;

/// Something that can paint itself into a buffer.
pub trait Drawable {
    /// Paint into `buf`. Cells outside the buffer's area are dropped.
    fn draw(&self, buf: &mut Buffer);

    /// Outer rectangle of the widget.
    fn bounds(&self) -> Rect;
}

impl<T: Drawable + ?Sized> Drawable for &T {
    fn draw(&self, buf: &mut Buffer) {
        (**self).draw(buf);
    }

    fn bounds(&self) -> Rect {
        (**self).bounds()
    }
}

impl<T: Drawable + ?Sized> Drawable for Box<T> {
    fn draw(&self, buf: &mut Buffer) {
        (**self).draw(buf);
    }

    fn bounds(&self) -> Rect {
        (**self).bounds()
    }
}

/// Draws leaves depth-first, left to right.
impl<W: Drawable> Drawable for Node<W> {
    fn draw(&self, buf: &mut Buffer) {
        for leaf in self.leaves() {
            leaf.draw(buf);
        }
    }

    fn bounds(&self) -> Rect {
        self.rect()
    }
}

impl<W: Drawable> Drawable for Grid<W> {
    fn draw(&self, buf: &mut Buffer) {
        for row in self.rows() {
            row.draw(buf);
        }
    }

    fn bounds(&self) -> Rect {
        self.area()
    }
}

/// Paint `widget` into a buffer sized to its own bounds.
///
/// The returned buffer uses absolute coordinates and can be merged into a
/// larger one with [`Buffer::merge`].
pub fn render_to_buffer(widget: &dyn Drawable) -> Buffer {
    let mut buf = Buffer::new(widget.bounds());
    widget.draw(&mut buf);
    buf
}
