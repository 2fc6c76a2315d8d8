#![forbid(unsafe_code)]

//! Full-frame compositing.
//!
//! [`Compositor::render`] paints widgets, in the order given, into one
//! terminal-sized [`Buffer`] and then writes every cell of that frame to the
//! sink followed by a single flush. Later widgets cover earlier ones where
//! they overlap. There is no diffing: each call redraws the whole screen.

use std::marker::PhantomData;

use gridtui_core::geometry::Rect;
use gridtui_render::buffer::Buffer;
use gridtui_render::cell::{Cell, Color};
use gridtui_style::Theme;
use gridtui_widgets::Drawable;

use crate::sink::TerminalSink;
use crate::{Error, Result};

/// Owns a sink and the frame painted into it.
///
/// Not `Send` or `Sync`: one render loop owns the compositor and every
/// buffer it paints.
pub struct Compositor<S: TerminalSink> {
    sink: S,
    frame: Buffer,
    background: Color,
    closed: bool,
    _single_thread: PhantomData<*const ()>,
}

impl<S: TerminalSink> Compositor<S> {
    /// Initialize `sink` and size the frame to it.
    ///
    /// # Errors
    ///
    /// [`Error::Init`] if the sink cannot start. There is no retry.
    pub fn new(mut sink: S) -> Result<Self> {
        if let Err(err) = sink.init() {
            gridtui_core::error!(error = %err, "terminal sink init failed");
            return Err(Error::Init(Box::new(err)));
        }
        let (width, height) = match sink.size() {
            Ok(size) => size,
            Err(err) => {
                let _ = sink.close();
                return Err(err.into());
            }
        };
        gridtui_core::info!(width, height, "compositor ready");

        Ok(Self {
            sink,
            frame: Buffer::new(Rect::from_size(i32::from(width), i32::from(height))),
            background: Color::Reset,
            closed: false,
            _single_thread: PhantomData,
        })
    }

    /// Paint the screen background from `theme` before widgets.
    #[must_use]
    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.background = theme.background;
        self
    }

    /// Set the color painted behind all widgets.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Frame size as `(columns, rows)`.
    pub fn size(&self) -> (i32, i32) {
        let area = self.frame.area();
        (area.width, area.height)
    }

    /// Frame rectangle, anchored at the origin.
    pub fn area(&self) -> Rect {
        self.frame.area()
    }

    /// Resize the frame. Takes effect on the next render.
    pub fn resize(&mut self, width: u16, height: u16) {
        gridtui_core::debug!(width, height, "compositor resize");
        self.frame = Buffer::new(Rect::from_size(i32::from(width), i32::from(height)));
    }

    /// Re-read the sink size and resize if it changed. Returns whether it did.
    pub fn sync_size(&mut self) -> Result<bool> {
        let (width, height) = self.sink.size().map_err(sink_error)?;
        let changed = self.size() != (i32::from(width), i32::from(height));
        if changed {
            self.resize(width, height);
        }
        Ok(changed)
    }

    /// The last painted frame.
    pub fn frame(&self) -> &Buffer {
        &self.frame
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Paint `widgets` in order and flush the full frame.
    pub fn render(&mut self, widgets: &[&dyn Drawable]) -> Result<()> {
        let _span = gridtui_core::debug_span!("compositor.render", widgets = widgets.len()).entered();

        self.frame.clear();
        let area = self.frame.area();
        self.frame.fill(area, Cell::EMPTY.with_bg(self.background));
        for widget in widgets {
            widget.draw(&mut self.frame);
        }
        self.present()
    }

    /// Paint pre-rendered buffers in order and flush the full frame.
    ///
    /// Each buffer keeps absolute coordinates; cells outside the screen are
    /// not sent to the sink.
    pub fn render_buffers(&mut self, layers: &[&Buffer]) -> Result<()> {
        let _span =
            gridtui_core::debug_span!("compositor.render_buffers", layers = layers.len()).entered();

        self.frame.clear();
        let area = self.frame.area();
        self.frame.fill(area, Cell::EMPTY.with_bg(self.background));
        for layer in layers {
            self.frame.merge(layer);
        }
        self.present()
    }

    /// Send the on-screen part of the frame. Widgets may have drawn past the
    /// screen edge; those cells stay in the frame but are not sent.
    fn present(&mut self) -> Result<()> {
        let screen = self.frame.area();
        for (x, y, cell) in self.frame.iter() {
            if !screen.contains(x, y) {
                continue;
            }
            let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
                continue;
            };
            self.sink.set_cell(x, y, &cell).map_err(sink_error)?;
        }
        self.sink.flush().map_err(sink_error)?;
        gridtui_core::debug!(
            width = screen.width,
            height = screen.height,
            offscreen = (self.frame.stored_len() as u64).saturating_sub(screen.area()),
            "frame flushed"
        );
        Ok(())
    }

    /// Close the sink. Later calls do nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.sink.close().map_err(sink_error)
    }
}

fn sink_error<E: Into<Error>>(err: E) -> Error {
    err.into()
}

impl<S: TerminalSink> Drop for Compositor<S> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.sink.close();
        }
    }
}
