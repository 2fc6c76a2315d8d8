#![forbid(unsafe_code)]

//! Runtime pieces that touch the outside world.
//!
//! - [`sink`] - the terminal boundary ([`TerminalSink`]) with a crossterm
//!   backend and an in-memory one for tests
//! - [`compositor`] - paints widgets into a full-screen frame and flushes it
//! - [`events`] - background input reader feeding a bounded queue
//! - [`router`] - dispatch of events to handlers by path
//!
//! Rendering is single-threaded: the [`Compositor`] is neither `Send` nor
//! `Sync`. The [`EventSource`] is the only type that owns threads.

pub mod compositor;
pub mod error;
pub mod events;
pub mod router;
pub mod sink;

pub use compositor::Compositor;
pub use error::{Error, Result};
pub use events::{CrosstermReader, EventReader, EventSource, EventSourceConfig, ScriptedReader};
pub use router::{Router, match_score};
pub use sink::{CrosstermSink, MemorySink, TerminalSink};
