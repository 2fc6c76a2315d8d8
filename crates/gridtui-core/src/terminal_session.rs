#![forbid(unsafe_code)]

//! Raw-mode guard for the screen gridtui draws on.
//!
//! A [`TerminalSession`] puts the terminal in raw mode and switches on the
//! [`Mode`]s its [`SessionOptions`] ask for. It remembers which modes it
//! actually switched on and undoes exactly those, newest first, when it is
//! dropped. A panic hook and (on unix) a SIGINT/SIGTERM watcher do the same
//! on abnormal exits.
//!
//! ```no_run
//! use gridtui_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions::fullscreen())?;
//! let (cols, rows) = session.size()?;
//! drop(session);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use std::sync::OnceLock;

use crossterm::{cursor, event, queue, terminal};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Which optional modes a session switches on. Raw mode is implied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Draw on the alternate screen so the shell's scrollback survives.
    pub alternate_screen: bool,
    /// Report mouse presses, drags and wheel events.
    pub mouse_capture: bool,
    /// Hide the cursor while the session is alive.
    pub hide_cursor: bool,
}

impl SessionOptions {
    /// Alternate screen, mouse capture and hidden cursor.
    pub const fn fullscreen() -> Self {
        Self {
            alternate_screen: true,
            mouse_capture: true,
            hide_cursor: true,
        }
    }

    /// Requested modes in the order they are switched on.
    pub fn modes(&self) -> Vec<Mode> {
        Mode::ALL
            .into_iter()
            .filter(|mode| match mode {
                Mode::AlternateScreen => self.alternate_screen,
                Mode::MouseCapture => self.mouse_capture,
                Mode::HiddenCursor => self.hide_cursor,
            })
            .collect()
    }
}

/// A terminal mode a session can switch on and must switch off again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    AlternateScreen,
    MouseCapture,
    HiddenCursor,
}

impl Mode {
    /// Every mode, in switch-on order.
    pub const ALL: [Mode; 3] = [Mode::AlternateScreen, Mode::MouseCapture, Mode::HiddenCursor];

    pub const fn name(self) -> &'static str {
        match self {
            Self::AlternateScreen => "alternate_screen",
            Self::MouseCapture => "mouse_capture",
            Self::HiddenCursor => "hidden_cursor",
        }
    }

    /// Queue the commands that switch this mode on.
    pub fn queue_enable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::AlternateScreen => queue!(out, terminal::EnterAlternateScreen),
            Self::MouseCapture => queue!(out, event::EnableMouseCapture),
            Self::HiddenCursor => queue!(out, cursor::Hide),
        }
    }

    /// Queue the commands that switch this mode off.
    pub fn queue_disable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::AlternateScreen => queue!(out, terminal::LeaveAlternateScreen),
            Self::MouseCapture => queue!(out, event::DisableMouseCapture),
            Self::HiddenCursor => queue!(out, cursor::Show),
        }
    }
}

/// Queue the switch-off commands for `active`, newest mode first.
///
/// Keeps going after a failed mode and returns the first error.
pub fn queue_restore(active: &[Mode], out: &mut impl Write) -> io::Result<()> {
    let mut first_err = None;
    for mode in active.iter().rev() {
        if let Err(err) = mode.queue_disable(out) {
            first_err.get_or_insert(err);
        }
    }
    first_err.map_or(Ok(()), Err)
}

/// Owns raw mode and the modes it switched on.
///
/// Only one session should exist at a time.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    active: Vec<Mode>,
    #[cfg(unix)]
    signals: Option<SignalWatcher>,
}

impl TerminalSession {
    /// Enter raw mode and switch on the requested modes.
    ///
    /// # Errors
    ///
    /// Fails if raw mode or any mode cannot be switched on. Whatever was
    /// already switched on is undone first.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        terminal::enable_raw_mode()?;
        crate::info!("terminal raw mode enabled");

        let mut session = Self {
            active: Vec::with_capacity(Mode::ALL.len()),
            options,
            #[cfg(unix)]
            signals: None,
        };

        // Dropping `session` on an early return undoes what is in `active`.
        #[cfg(unix)]
        {
            session.signals = Some(SignalWatcher::spawn()?);
        }

        let mut stdout = io::stdout();
        for mode in session.options.modes() {
            mode.queue_enable(&mut stdout)?;
            stdout.flush()?;
            session.active.push(mode);
            crate::info!(mode = mode.name(), "terminal mode enabled");
        }

        Ok(session)
    }

    /// Current terminal size as `(columns, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Modes currently switched on, oldest first.
    pub fn active_modes(&self) -> &[Mode] {
        &self.active
    }

    fn restore(&mut self) {
        #[cfg(unix)]
        drop(self.signals.take());

        let mut stdout = io::stdout();
        let _ = queue_restore(&self.active, &mut stdout);
        self.active.clear();
        let _ = stdout.flush();
        let _ = terminal::disable_raw_mode();
        crate::info!("terminal restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.restore();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            previous(info);
        }));
    });
}

/// Switch everything off without knowing what was on.
fn emergency_restore() {
    let mut stdout = io::stdout();
    let _ = queue_restore(&Mode::ALL, &mut stdout);
    let _ = stdout.flush();
    let _ = terminal::disable_raw_mode();
}

/// Restores the terminal and exits when SIGINT or SIGTERM arrives.
///
/// Raw mode turns Ctrl-C into a key, so these only come from outside.
#[cfg(unix)]
#[derive(Debug)]
struct SignalWatcher {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalWatcher {
    fn spawn() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();
        let thread = std::thread::Builder::new()
            .name("gridtui-signals".into())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    crate::warn!(signal, "termination signal, restoring terminal");
                    emergency_restore();
                    std::process::exit(128 + signal);
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
