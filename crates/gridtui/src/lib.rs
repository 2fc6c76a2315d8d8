#![forbid(unsafe_code)]

//! gridtui public facade.
//!
//! Re-exports the types a dashboard needs from the internal crates and a
//! small prelude. A typical program lays widgets out on a [`Grid`], paints
//! them with a [`Compositor`], and reacts to input through a [`Router`]
//! fed by an [`EventSource`].
//!
//! ```
//! use gridtui::prelude::*;
//!
//! let mut grid = Grid::new(0, 0, 20).with_row(Node::row(vec![
//!     Child::new(1, Node::leaf(Block::new().with_title("L").with_height(3))),
//!     Child::new(1, Node::leaf(Block::new().with_title("R").with_height(3))),
//! ]));
//! grid.align();
//!
//! let mut ui = Compositor::new(MemorySink::new(20, 3))?;
//! ui.render(&[&grid])?;
//! assert_eq!(ui.sink().row_text(0), "┌L───────┐┌R───────┐");
//! # Ok::<(), gridtui::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use gridtui_core::event::{
    Event, EventKind, KeyCode, KeyEvent, Modifiers, MouseAction, Payload,
};
pub use gridtui_core::geometry::{Align, Rect, Sides};
pub use gridtui_core::terminal_session::{SessionOptions, TerminalSession};

// --- Render re-exports -----------------------------------------------------

pub use gridtui_render::buffer::Buffer;
pub use gridtui_render::cell::{Cell, Color};
pub use gridtui_render::drawing::BorderChars;

// --- Style re-exports ------------------------------------------------------

pub use gridtui_style::{Style, Theme, parse_color, parse_style};

// --- Layout and widget re-exports ------------------------------------------

pub use gridtui_layout::{Child, Direction, Grid, Layoutable, Node};
pub use gridtui_widgets::{Block, Canvas, Drawable};

// --- Runtime re-exports ----------------------------------------------------

pub use gridtui_runtime::{
    Compositor, CrosstermSink, EventSource, EventSourceConfig, MemorySink, Router, TerminalSink,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for gridtui programs.
#[derive(Debug)]
pub enum Error {
    /// I/O failure during terminal operations.
    Io(std::io::Error),
    /// Sink, compositor, or event source failure.
    Runtime(gridtui_runtime::Error),
    /// A style or color string that could not be parsed.
    Style(gridtui_style::ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Runtime(err) => write!(f, "{err}"),
            Self::Style(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::Style(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<gridtui_runtime::Error> for Error {
    fn from(err: gridtui_runtime::Error) -> Self {
        match err {
            gridtui_runtime::Error::Io(io) => Self::Io(io),
            other => Self::Runtime(other),
        }
    }
}

impl From<gridtui_style::ParseError> for Error {
    fn from(err: gridtui_style::ParseError) -> Self {
        Self::Style(err)
    }
}

/// Standard result type for gridtui APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Block, Buffer, Canvas, Cell, Child, Color, Compositor, Drawable, Error, Event, Grid,
        Layoutable, MemorySink, Node, Rect, Result, Router, Style, TerminalSink, Theme,
    };

    pub use crate::{core, layout, render, runtime, style, widgets};
}

pub use gridtui_core as core;
pub use gridtui_layout as layout;
pub use gridtui_render as render;
pub use gridtui_runtime as runtime;
pub use gridtui_style as style;
pub use gridtui_widgets as widgets;
