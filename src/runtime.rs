//! Event plumbing between the terminal and the app loop.
//!
//! Input is read on a dedicated thread and forwarded over a channel; the loop
//! waits on that channel for at most one tick period, so a quiet terminal
//! still produces a steady stream of `Tick`s.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The input side hung up; no further key can arrive.
    Closed,
}

/// Where the loop gets its input from
pub trait EventSource: Send + 'static {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Channel-backed source, fed either by the terminal reader thread or by a test
pub struct ChannelSource {
    rx: Receiver<AppEvent>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }

    /// Spawn the crossterm reader. The sender is dropped when reading fails
    /// or the receiving side goes away, which the runner reports as `Closed`.
    pub fn terminal() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let event = match event::read() {
                Ok(CtEvent::Key(key)) => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "terminal event reader stopped");
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl EventSource for ChannelSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Turns an event source into the loop's event stream
pub struct Runner<E: EventSource> {
    source: E,
    tick_period: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, tick_period: Duration) -> Self {
        Self {
            source,
            tick_period,
        }
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Next input event, `Tick` when nothing arrived within one period, or
    /// `Closed` once the source has hung up.
    pub fn step(&self) -> AppEvent {
        match self.source.recv_timeout(self.tick_period) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => AppEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => AppEvent::Closed,
        }
    }
}
