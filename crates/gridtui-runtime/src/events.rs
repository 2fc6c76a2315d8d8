#![forbid(unsafe_code)]

//! Background event source.
//!
//! An [`EventSource`] runs a reader thread that polls an [`EventReader`] and
//! pushes decoded [`Event`]s into a bounded queue. An optional timer thread
//! adds periodic ticks to the same queue. The host loop pulls events with a
//! blocking [`EventSource::recv`].
//!
//! Only one source may be live per process, matching the single input
//! stream a terminal has.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use gridtui_core::event::Event;

use crate::{Error, Result};

/// Environment variable overriding [`EventSourceConfig::queue_capacity`].
pub const ENV_EVENT_QUEUE: &str = "GRIDTUI_EVENT_QUEUE";
/// Environment variable enabling ticks, in milliseconds.
pub const ENV_TICK_MS: &str = "GRIDTUI_TICK_MS";

static SUBSCRIBED: AtomicBool = AtomicBool::new(false);

/// The process-wide subscription. Released when the last holder drops.
///
/// The source and each worker thread hold one, so a dropped source stays
/// subscribed until its reader has actually let go of the input.
#[derive(Debug)]
struct Claim;

impl Claim {
    fn acquire() -> Option<Arc<Self>> {
        SUBSCRIBED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Arc::new(Self))
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        SUBSCRIBED.store(false, Ordering::Release);
        gridtui_core::trace!("event subscription released");
    }
}

/// Produces input events for the reader thread.
pub trait EventReader: Send + 'static {
    /// Wait up to `timeout` for the next event.
    ///
    /// `Ok(None)` means nothing arrived or the input had no mapping.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// Reads terminal input through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermReader;

impl EventReader for CrosstermReader {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if !crossterm::event::poll(timeout)? {
            return Ok(None);
        }
        Ok(Event::from_crossterm(crossterm::event::read()?))
    }
}

/// Replays a fixed list of events, then stays idle.
#[derive(Debug, Default, Clone)]
pub struct ScriptedReader {
    events: VecDeque<Event>,
}

impl ScriptedReader {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventReader for ScriptedReader {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        match self.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => {
                thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

/// Tuning for an [`EventSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSourceConfig {
    /// Maximum queued events before the reader blocks. At least 1.
    pub queue_capacity: usize,
    /// How long each reader poll waits; bounds shutdown latency.
    pub poll_interval: Duration,
    /// Tick period; `None` disables the timer thread.
    pub tick: Option<Duration>,
}

impl Default for EventSourceConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            poll_interval: Duration::from_millis(50),
            tick: None,
        }
    }
}

impl EventSourceConfig {
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_tick(mut self, period: Duration) -> Self {
        self.tick = (!period.is_zero()).then_some(period);
        self
    }

    /// Defaults overridden by [`ENV_EVENT_QUEUE`] and [`ENV_TICK_MS`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`EventSourceConfig::from_env`] with a custom lookup (for tests).
    ///
    /// Unparseable or zero values are ignored.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = get_env(ENV_EVENT_QUEUE) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.queue_capacity = n,
                _ => {
                    gridtui_core::warn!(value = %raw, "ignoring invalid {}", ENV_EVENT_QUEUE);
                }
            }
        }

        if let Some(raw) = get_env(ENV_TICK_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.tick = Some(Duration::from_millis(ms)),
                _ => {
                    gridtui_core::warn!(value = %raw, "ignoring invalid {}", ENV_TICK_MS);
                }
            }
        }

        config
    }
}

/// Shared stop flag the worker threads wait on.
#[derive(Clone, Default)]
struct Stop {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Stop {
    fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep up to `duration`; returns `true` as soon as stop is triggered.
    fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now() + duration;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        while !*stopped {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            stopped = cvar
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

/// A live subscription to input events.
///
/// Dropping it stops the worker threads without waiting for them; use
/// [`EventSource::close`] to wait. Either way a new subscription is only
/// accepted once the old workers have exited.
pub struct EventSource {
    rx: Receiver<Event>,
    stop: Stop,
    workers: Vec<JoinHandle<()>>,
    claim: Arc<Claim>,
}

impl EventSource {
    /// Subscribe to terminal input with `config`.
    ///
    /// The terminal should already be in raw mode (see
    /// [`CrosstermSink`](crate::CrosstermSink)).
    pub fn subscribe(config: EventSourceConfig) -> Result<Self> {
        Self::with_reader(CrosstermReader, config)
    }

    /// Subscribe using a custom reader.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadySubscribed`] while another source is live, or
    /// [`Error::Io`] if a worker thread cannot be spawned.
    pub fn with_reader<R: EventReader>(reader: R, config: EventSourceConfig) -> Result<Self> {
        let Some(claim) = Claim::acquire() else {
            return Err(Error::AlreadySubscribed);
        };

        let (tx, rx) = mpsc::sync_channel(config.queue_capacity.max(1));
        let mut source = Self {
            rx,
            stop: Stop::default(),
            workers: Vec::new(),
            claim,
        };

        // On error `source` drops, which stops any started worker. The
        // subscription is released once those workers are gone.
        let reader_handle = spawn_reader(
            reader,
            tx.clone(),
            source.stop.clone(),
            Arc::clone(&source.claim),
            config.poll_interval,
        )?;
        source.workers.push(reader_handle);

        if let Some(period) = config.tick {
            let timer_handle = spawn_timer(period, tx, source.stop.clone(), Arc::clone(&source.claim))?;
            source.workers.push(timer_handle);
        }

        gridtui_core::debug!(
            capacity = config.queue_capacity,
            tick = ?config.tick,
            "event source subscribed"
        );
        Ok(source)
    }

    /// Block until the next event.
    ///
    /// # Errors
    ///
    /// [`Error::Disconnected`] once every worker has stopped and the queue
    /// is drained.
    pub fn recv(&self) -> Result<Event> {
        self.rx.recv().map_err(|_| Error::Disconnected)
    }

    /// Next event if one is queued.
    pub fn try_recv(&self) -> Result<Option<Event>> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::Disconnected),
        }
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Event>> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Disconnected),
        }
    }

    /// Blocking iterator that ends when the source disconnects.
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.rx.iter()
    }

    /// Stop the workers and wait for them to exit.
    pub fn close(mut self) {
        self.stop.trigger();
        for handle in std::mem::take(&mut self.workers) {
            // A worker blocked on a full queue needs room to notice the stop.
            while !handle.is_finished() {
                while self.rx.try_recv().is_ok() {}
                thread::sleep(Duration::from_millis(1));
            }
            let _ = handle.join();
        }
        gridtui_core::debug!("event source closed");
    }
}

impl Drop for EventSource {
    fn drop(&mut self) {
        self.stop.trigger();
    }
}

fn spawn_reader<R: EventReader>(
    mut reader: R,
    tx: SyncSender<Event>,
    stop: Stop,
    claim: Arc<Claim>,
    poll_interval: Duration,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("gridtui-events".into())
        .spawn(move || {
            while !stop.is_stopped() {
                match reader.poll(poll_interval) {
                    Ok(Some(event)) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(_err) => {
                        gridtui_core::error!(error = %_err, "event reader failed");
                        break;
                    }
                }
            }
            // The input must be released before anyone can subscribe again.
            drop(reader);
            drop(claim);
        })
}

fn spawn_timer(
    period: Duration,
    tx: SyncSender<Event>,
    stop: Stop,
    claim: Arc<Claim>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("gridtui-timer".into())
        .spawn(move || {
            let _claim = claim;
            let mut count: u64 = 0;
            while !stop.wait_timeout(period) {
                count += 1;
                if tx.send(Event::tick(count, period)).is_err() {
                    break;
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn config_defaults() {
        let config = EventSourceConfig::from_env_with(env(&[]));
        assert_eq!(config, EventSourceConfig::default());
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.tick, None);
    }

    #[test]
    fn config_reads_env() {
        let config = EventSourceConfig::from_env_with(env(&[
            (ENV_EVENT_QUEUE, "8"),
            (ENV_TICK_MS, " 250 "),
        ]));
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.tick, Some(Duration::from_millis(250)));
    }

    #[test]
    fn config_ignores_bad_values() {
        let config = EventSourceConfig::from_env_with(env(&[
            (ENV_EVENT_QUEUE, "0"),
            (ENV_TICK_MS, "soon"),
        ]));
        assert_eq!(config, EventSourceConfig::default());
    }

    #[test]
    fn builder_clamps() {
        let config = EventSourceConfig::default()
            .with_queue_capacity(0)
            .with_tick(Duration::ZERO);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.tick, None);
    }

    #[test]
    fn scripted_reader_replays_then_idles() {
        let mut reader = ScriptedReader::new([Event::resize(10, 5)]);
        assert_eq!(reader.remaining(), 1);
        assert_eq!(
            reader.poll(Duration::ZERO).unwrap(),
            Some(Event::resize(10, 5))
        );
        assert_eq!(reader.poll(Duration::from_millis(1)).unwrap(), None);
    }

    #[test]
    fn stop_wakes_waiter() {
        let stop = Stop::default();
        let waiter = stop.clone();
        let handle = thread::spawn(move || waiter.wait_timeout(Duration::from_secs(10)));
        thread::sleep(Duration::from_millis(10));
        stop.trigger();
        assert!(handle.join().unwrap());
        assert!(stop.is_stopped());
    }

    #[test]
    fn stop_times_out() {
        assert!(!Stop::default().wait_timeout(Duration::from_millis(5)));
    }
}
