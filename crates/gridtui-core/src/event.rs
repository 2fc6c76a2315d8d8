#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! Every event carries a [`EventKind`], a string id and a kind-specific
//! [`Payload`]. Ids follow a compact notation that host loops match on:
//!
//! | Input | Id |
//! |-------|----|
//! | plain character | `"q"` |
//! | ctrl / alt chord | `"<C-c>"`, `"<M-x>"`, `"<C-M-x>"` |
//! | named key | `"<Enter>"`, `"<Escape>"`, `"<Up>"`, `"<F5>"`, `"<Space>"` |
//! | mouse | `"<MouseLeft>"`, `"<MouseRelease>"`, `"<MouseWheelUp>"` |
//! | resize | `"<Resize>"` |
//! | timer tick | `"<Tick>"` |
//!
//! Mouse coordinates are 0-indexed.

use std::fmt;
use std::time::Duration;

use bitflags::bitflags;
use crossterm::event as cte;

/// Id used for resize events.
pub const RESIZE_ID: &str = "<Resize>";
/// Id used for timer ticks.
pub const TICK_ID: &str = "<Tick>";

/// Discriminant of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Keyboard,
    Mouse,
    Resize,
    /// Periodic tick from a timer source.
    Timer,
}

impl EventKind {
    /// Lowercase name, as used in event paths.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyboard => "keyboard",
            Self::Mouse => "mouse",
            Self::Resize => "resize",
            Self::Timer => "timer",
        }
    }
}

/// Kind-specific event data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Decoded key press.
    Key(KeyEvent),
    /// Mouse position and whether a button was held while moving.
    Mouse {
        x: u16,
        y: u16,
        drag: bool,
    },
    /// New terminal size in cells.
    Resize {
        width: u16,
        height: u16,
    },
    /// Tick counter and the timer period that produced it.
    Timer {
        count: u64,
        period: Duration,
    },
}

/// An input event delivered to the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub id: String,
    pub payload: Payload,
}

impl Event {
    /// Build a keyboard event; the id is derived from the key.
    pub fn key(key: KeyEvent) -> Self {
        Self {
            kind: EventKind::Keyboard,
            id: key.id(),
            payload: Payload::Key(key),
        }
    }

    /// Build a mouse event.
    pub fn mouse(action: MouseAction, x: u16, y: u16, drag: bool) -> Self {
        Self {
            kind: EventKind::Mouse,
            id: action.id().to_owned(),
            payload: Payload::Mouse { x, y, drag },
        }
    }

    /// Build a resize event.
    pub fn resize(width: u16, height: u16) -> Self {
        Self {
            kind: EventKind::Resize,
            id: RESIZE_ID.to_owned(),
            payload: Payload::Resize { width, height },
        }
    }

    /// Build a timer tick.
    pub fn tick(count: u64, period: Duration) -> Self {
        Self {
            kind: EventKind::Timer,
            id: TICK_ID.to_owned(),
            payload: Payload::Timer { count, period },
        }
    }

    /// Routing path of this event.
    ///
    /// Keyboard events live under `/sys/kbd/<id>`, mouse events under
    /// `/sys/mouse/<id>`, resizes at `/sys/wnd/resize`, and ticks under
    /// `/timer/<period>` with the period written as [`duration_label`]
    /// does (`/timer/1s`, `/timer/250ms`).
    pub fn path(&self) -> String {
        match &self.payload {
            Payload::Key(_) => format!("/sys/kbd/{}", self.id),
            Payload::Mouse { .. } => format!("/sys/mouse/{}", self.id),
            Payload::Resize { .. } => "/sys/wnd/resize".to_owned(),
            Payload::Timer { period, .. } => format!("/timer/{}", duration_label(*period)),
        }
    }

    /// Convert a crossterm event.
    ///
    /// Returns `None` for input that has no id in this scheme (focus
    /// changes, pastes, key releases, bare pointer motion, horizontal
    /// scrolling, unsupported keys).
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => map_key_event(key).map(Event::key),
            cte::Event::Mouse(mouse) => map_mouse_event(mouse),
            cte::Event::Resize(width, height) => Some(Event::resize(width, height)),
            cte::Event::FocusGained | cte::Event::FocusLost | cte::Event::Paste(_) => None,
        }
    }
}

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check for a specific character, ignoring modifiers.
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// String id of this key, e.g. `"q"`, `"<C-c>"`, `"<M-Enter>"`.
    pub fn id(&self) -> String {
        let mut prefix = String::new();
        if self.modifiers.contains(Modifiers::CTRL) {
            prefix.push_str("C-");
        }
        if self.modifiers.contains(Modifiers::ALT) {
            prefix.push_str("M-");
        }

        match self.code {
            KeyCode::Char(' ') => format!("<{prefix}Space>"),
            KeyCode::Char(c) if prefix.is_empty() => c.to_string(),
            KeyCode::Char(c) => format!("<{prefix}{c}>"),
            code => format!("<{prefix}{code}>"),
        }
    }
}

/// Keys the event layer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function key, `F(1)` through `F(24)`.
    F(u8),
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Enter => f.write_str("Enter"),
            Self::Escape => f.write_str("Escape"),
            Self::Backspace => f.write_str("Backspace"),
            Self::Tab => f.write_str("Tab"),
            Self::BackTab => f.write_str("BackTab"),
            Self::Insert => f.write_str("Insert"),
            Self::Delete => f.write_str("Delete"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::PageUp => f.write_str("PageUp"),
            Self::PageDown => f.write_str("PageDown"),
            Self::Up => f.write_str("Up"),
            Self::Down => f.write_str("Down"),
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
            Self::F(n) => write!(f, "F{n}"),
        }
    }
}

bitflags! {
    /// Modifier keys held during a key or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE  = 0b000;
        const SHIFT = 0b001;
        const ALT   = 0b010;
        const CTRL  = 0b100;
    }
}

/// Mouse actions that produce events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Left,
    Right,
    Middle,
    Release,
    WheelUp,
    WheelDown,
}

impl MouseAction {
    /// String id of the action.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Left => "<MouseLeft>",
            Self::Right => "<MouseRight>",
            Self::Middle => "<MouseMiddle>",
            Self::Release => "<MouseRelease>",
            Self::WheelUp => "<MouseWheelUp>",
            Self::WheelDown => "<MouseWheelDown>",
        }
    }
}

fn map_key_event(event: cte::KeyEvent) -> Option<KeyEvent> {
    if event.kind == cte::KeyEventKind::Release {
        return None;
    }
    let code = map_key_code(event.code)?;
    let mut modifiers = map_modifiers(event.modifiers);
    // Shifted characters already arrive in their shifted form.
    if matches!(code, KeyCode::Char(_)) {
        modifiers.remove(Modifiers::SHIFT);
    }
    Some(KeyEvent { code, modifiers })
}

fn map_key_code(code: cte::KeyCode) -> Option<KeyCode> {
    match code {
        cte::KeyCode::Char(c) => Some(KeyCode::Char(c)),
        cte::KeyCode::Enter => Some(KeyCode::Enter),
        cte::KeyCode::Esc => Some(KeyCode::Escape),
        cte::KeyCode::Backspace => Some(KeyCode::Backspace),
        cte::KeyCode::Tab => Some(KeyCode::Tab),
        cte::KeyCode::BackTab => Some(KeyCode::BackTab),
        cte::KeyCode::Insert => Some(KeyCode::Insert),
        cte::KeyCode::Delete => Some(KeyCode::Delete),
        cte::KeyCode::Home => Some(KeyCode::Home),
        cte::KeyCode::End => Some(KeyCode::End),
        cte::KeyCode::PageUp => Some(KeyCode::PageUp),
        cte::KeyCode::PageDown => Some(KeyCode::PageDown),
        cte::KeyCode::Up => Some(KeyCode::Up),
        cte::KeyCode::Down => Some(KeyCode::Down),
        cte::KeyCode::Left => Some(KeyCode::Left),
        cte::KeyCode::Right => Some(KeyCode::Right),
        cte::KeyCode::F(n) => Some(KeyCode::F(n)),
        _ => None,
    }
}

fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(cte::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(cte::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(cte::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    mapped
}

fn map_mouse_event(event: cte::MouseEvent) -> Option<Event> {
    let (action, drag) = match event.kind {
        cte::MouseEventKind::Down(button) => (map_mouse_button(button), false),
        cte::MouseEventKind::Drag(button) => (map_mouse_button(button), true),
        cte::MouseEventKind::Up(_) => (MouseAction::Release, false),
        cte::MouseEventKind::ScrollUp => (MouseAction::WheelUp, false),
        cte::MouseEventKind::ScrollDown => (MouseAction::WheelDown, false),
        cte::MouseEventKind::Moved
        | cte::MouseEventKind::ScrollLeft
        | cte::MouseEventKind::ScrollRight => return None,
    };
    Some(Event::mouse(action, event.column, event.row, drag))
}

fn map_mouse_button(button: cte::MouseButton) -> MouseAction {
    match button {
        cte::MouseButton::Left => MouseAction::Left,
        cte::MouseButton::Right => MouseAction::Right,
        cte::MouseButton::Middle => MouseAction::Middle,
    }
}

/// Short human form of a duration: `"0s"`, `"250ns"`, `"1.5ms"`, `"1s"`,
/// `"1m30s"`, `"1h0m0s"`.
///
/// Sub-second values use the largest unit that keeps the integer part
/// non-zero. From one second up the value is split into hours, minutes and
/// fractional seconds, with trailing zeros dropped.
pub fn duration_label(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_owned();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return decimal(nanos, 1_000, "µs");
    }
    if nanos < 1_000_000_000 {
        return decimal(nanos, 1_000_000, "ms");
    }

    let secs = d.as_secs();
    let (hours, minutes) = (secs / 3600, secs / 60 % 60);
    let seconds = decimal(
        u128::from(secs % 60) * 1_000_000_000 + u128::from(d.subsec_nanos()),
        1_000_000_000,
        "s",
    );
    match (hours, minutes) {
        (0, 0) => seconds,
        (0, m) => format!("{m}m{seconds}"),
        (h, m) => format!("{h}h{m}m{seconds}"),
    }
}

/// `value / unit` with the remainder as trimmed decimal digits.
fn decimal(value: u128, unit: u128, suffix: &str) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return format!("{whole}{suffix}");
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}{suffix}", digits.trim_end_matches('0'))
}
