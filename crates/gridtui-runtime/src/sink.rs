#![forbid(unsafe_code)]

//! The terminal boundary.
//!
//! A [`TerminalSink`] is told to start once, receives every cell of a frame
//! followed by a single flush, and is closed on shutdown. [`CrosstermSink`]
//! drives a real terminal; [`MemorySink`] keeps the screen in memory for
//! tests and headless use.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::style::{self as cts, Attribute};
use crossterm::{cursor, queue};
use gridtui_core::terminal_session::{SessionOptions, TerminalSession};
use gridtui_render::cell::{Cell, Color, Modifiers};

use crate::Error;

/// Output side of a terminal.
pub trait TerminalSink {
    type Error: std::error::Error + Send + Sync + Into<Error> + 'static;

    /// Prepare the terminal for drawing.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Restore the terminal. Must be safe to call more than once.
    fn close(&mut self) -> Result<(), Self::Error>;

    /// Size in cells as `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16), Self::Error>;

    /// Write one cell. Takes effect on the next [`TerminalSink::flush`].
    fn set_cell(&mut self, x: u16, y: u16, cell: &Cell) -> Result<(), Self::Error>;

    /// Make all written cells visible.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<S: TerminalSink + ?Sized> TerminalSink for &mut S {
    type Error = S::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        (**self).init()
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }

    fn size(&self) -> Result<(u16, u16), Self::Error> {
        (**self).size()
    }

    fn set_cell(&mut self, x: u16, y: u16, cell: &Cell) -> Result<(), Self::Error> {
        (**self).set_cell(x, y, cell)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

// ── Crossterm ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pen {
    fg: Color,
    bg: Color,
    modifiers: Modifiers,
}

/// Sink that draws to stdout through crossterm.
///
/// `init` opens a [`TerminalSession`] (raw mode plus the configured modes);
/// `close` or drop restores the terminal. Style changes are only emitted
/// when they differ from the previous cell.
pub struct CrosstermSink {
    options: SessionOptions,
    session: Option<TerminalSession>,
    out: BufWriter<Stdout>,
    pen: Option<Pen>,
}

impl CrosstermSink {
    /// Sink using [`SessionOptions::fullscreen`].
    pub fn new() -> Self {
        Self::with_options(SessionOptions::fullscreen())
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            options,
            session: None,
            out: BufWriter::new(io::stdout()),
            pen: None,
        }
    }

    /// Whether `init` has run and `close` has not.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    fn apply_pen(&mut self, next: Pen) -> io::Result<()> {
        if self.pen == Some(next) {
            return Ok(());
        }
        let modifiers_changed = self.pen.is_none_or(|p| p.modifiers != next.modifiers);
        if modifiers_changed {
            // Reset clears colors too, so both get re-sent below.
            queue!(self.out, cts::SetAttribute(Attribute::Reset))?;
            for (flag, attr) in [
                (Modifiers::BOLD, Attribute::Bold),
                (Modifiers::UNDERLINE, Attribute::Underlined),
                (Modifiers::REVERSE, Attribute::Reverse),
            ] {
                if next.modifiers.contains(flag) {
                    queue!(self.out, cts::SetAttribute(attr))?;
                }
            }
        }
        if modifiers_changed || self.pen.is_none_or(|p| p.fg != next.fg) {
            queue!(self.out, cts::SetForegroundColor(to_crossterm(next.fg)))?;
        }
        if modifiers_changed || self.pen.is_none_or(|p| p.bg != next.bg) {
            queue!(self.out, cts::SetBackgroundColor(to_crossterm(next.bg)))?;
        }
        self.pen = Some(next);
        Ok(())
    }
}

impl Default for CrosstermSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSink for CrosstermSink {
    type Error = io::Error;

    fn init(&mut self) -> io::Result<()> {
        if self.session.is_some() {
            return Ok(());
        }
        self.session = Some(TerminalSession::new(self.options.clone())?);
        queue!(self.out, crossterm::terminal::Clear(crossterm::terminal::ClearType::All))?;
        self.out.flush()?;
        self.pen = None;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if self.session.is_none() {
            return Ok(());
        }
        let reset = queue!(self.out, cts::ResetColor).and_then(|()| self.out.flush());
        // Dropping the session restores the terminal even if the reset failed.
        self.session = None;
        self.pen = None;
        gridtui_core::info!("crossterm sink closed");
        reset
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        match &self.session {
            Some(session) => session.size(),
            None => crossterm::terminal::size(),
        }
    }

    fn set_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        // The wide character to the left already painted this column.
        if cell.is_continuation() {
            return Ok(());
        }
        self.apply_pen(Pen {
            fg: cell.fg,
            bg: cell.bg,
            modifiers: cell.modifiers,
        })?;
        queue!(self.out, cursor::MoveTo(x, y), cts::Print(cell.ch))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Drop for CrosstermSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn to_crossterm(color: Color) -> cts::Color {
    match color {
        Color::Reset => cts::Color::Reset,
        Color::Indexed(i) => cts::Color::AnsiValue(i),
        Color::Rgb(r, g, b) => cts::Color::Rgb { r, g, b },
    }
}

// ── Memory ───────────────────────────────────────────────────────────────

/// Sink that keeps the screen in memory.
///
/// Writes land in a back buffer and become visible on `flush`, like a real
/// terminal. Counters record how the sink was driven.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    width: u16,
    height: u16,
    back: Vec<Option<Cell>>,
    front: Vec<Option<Cell>>,
    init_calls: usize,
    close_calls: usize,
    flushes: usize,
    writes: usize,
    fail_init: bool,
    open: bool,
}

impl MemorySink {
    pub fn new(width: u16, height: u16) -> Self {
        let len = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            back: vec![None; len],
            front: vec![None; len],
            ..Self::default()
        }
    }

    /// A sink whose `init` always fails.
    pub fn failing_init(width: u16, height: u16) -> Self {
        Self {
            fail_init: true,
            ..Self::new(width, height)
        }
    }

    /// Change the reported size. Visible content is discarded.
    pub fn set_size(&mut self, width: u16, height: u16) {
        let counters = (self.init_calls, self.close_calls, self.flushes, self.writes);
        let open = self.open;
        *self = Self::new(width, height);
        (self.init_calls, self.close_calls, self.flushes, self.writes) = counters;
        self.open = open;
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Visible cell at `(x, y)`; `None` if never flushed there.
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).and_then(|i| self.front[i])
    }

    /// Visible characters of row `y`, with unwritten cells as spaces.
    ///
    /// Wide-character tails are left out, so the text reads as the
    /// terminal shows it.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| match self.cell(x, y) {
                Some(cell) if cell.is_continuation() => None,
                Some(cell) => Some(cell.ch),
                None => Some(' '),
            })
            .collect()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Total `set_cell` calls.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl TerminalSink for MemorySink {
    type Error = io::Error;

    fn init(&mut self) -> io::Result<()> {
        self.init_calls += 1;
        if self.fail_init {
            return Err(io::Error::other("memory sink configured to fail"));
        }
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.close_calls += 1;
        self.open = false;
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn set_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if !self.open {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "sink not initialized"));
        }
        self.writes += 1;
        if let Some(i) = self.index(x, y) {
            self.back[i] = Some(*cell);
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.open {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "sink not initialized"));
        }
        self.flushes += 1;
        self.front.clone_from(&self.back);
        Ok(())
    }
}
