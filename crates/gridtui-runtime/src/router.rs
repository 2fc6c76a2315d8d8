#![forbid(unsafe_code)]

//! Path-based event dispatch.
//!
//! Handlers are registered under slash-separated patterns such as
//! `/sys/kbd/q` or `/sys/mouse`. An event goes to the handler whose pattern
//! is the longest segment-wise prefix of the event's
//! [`path`](gridtui_core::event::Event::path). `/` matches everything.

use std::ops::ControlFlow;

use gridtui_core::event::Event;

use crate::events::EventSource;
use crate::Result;

type Handler = Box<dyn FnMut(&Event) -> ControlFlow<()>>;

/// Number of leading segments `pattern` shares with `path`, or `None` if
/// `pattern` is not a segment prefix of `path`.
///
/// Empty segments are ignored, so `/sys//kbd/` equals `/sys/kbd`.
pub fn match_score(path: &str, pattern: &str) -> Option<usize> {
    let mut path_segments = path.split('/').filter(|s| !s.is_empty());
    let mut score = 0;
    for want in pattern.split('/').filter(|s| !s.is_empty()) {
        if path_segments.next() != Some(want) {
            return None;
        }
        score += 1;
    }
    Some(score)
}

/// Dispatches events to handlers by path.
#[derive(Default)]
pub struct Router {
    handlers: Vec<(String, Handler)>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `pattern`, replacing any handler already
    /// registered there.
    ///
    /// Returning [`ControlFlow::Break`] from a handler ends
    /// [`Router::run`].
    pub fn handle<F>(&mut self, pattern: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut(&Event) -> ControlFlow<()> + 'static,
    {
        let pattern = pattern.into();
        let handler: Handler = Box::new(handler);
        match self.handlers.iter_mut().find(|(p, _)| *p == pattern) {
            Some(slot) => slot.1 = handler,
            None => self.handlers.push((pattern, handler)),
        }
        self
    }

    /// Remove the handler registered under `pattern`.
    pub fn remove(&mut self, pattern: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(p, _)| p != pattern);
        self.handlers.len() != before
    }

    /// Registered patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|(p, _)| p.as_str())
    }

    /// Pattern that would handle `path`.
    ///
    /// The highest score wins; among equal scores the earliest registration.
    pub fn route(&self, path: &str) -> Option<&str> {
        self.best_index(path).map(|i| self.handlers[i].0.as_str())
    }

    fn best_index(&self, path: &str) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, (pattern, _)) in self.handlers.iter().enumerate() {
            let Some(score) = match_score(path, pattern) else {
                continue;
            };
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Run the matching handler. `None` if no pattern matched.
    pub fn dispatch(&mut self, event: &Event) -> Option<ControlFlow<()>> {
        let path = event.path();
        let i = self.best_index(&path)?;
        gridtui_core::trace!(path = %path, pattern = %self.handlers[i].0, "dispatch");
        Some((self.handlers[i].1)(event))
    }

    /// Dispatch events from `source` until a handler breaks.
    ///
    /// # Errors
    ///
    /// [`Error::Disconnected`](crate::Error::Disconnected) if the source
    /// stops first.
    pub fn run(&mut self, source: &EventSource) -> Result<()> {
        loop {
            let event = source.recv()?;
            if let Some(ControlFlow::Break(())) = self.dispatch(&event) {
                return Ok(());
            }
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .finish()
    }
}
