use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::engine::{format_time, FormattedTime, LapRecord};

/// How long the time readout stays highlighted after a refresh
pub const PULSE_DURATION: Duration = Duration::from_millis(100);

/// Output port of the timer engine
pub trait DisplaySink {
    fn show_time(&mut self, time: &FormattedTime);
    /// Called once per recorded lap; the newest lap goes to the top.
    fn push_lap(&mut self, lap: &LapRecord);
    fn clear_laps(&mut self);
}

/// In-memory sink holding what the terminal UI draws
#[derive(Debug, Clone)]
pub struct Screen {
    pub time: FormattedTime,
    pub laps: VecDeque<LapRecord>,
    pub refreshes: u64,
    last_refresh: Option<Instant>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            time: format_time(0),
            laps: VecDeque::new(),
            refreshes: 0,
            last_refresh: None,
        }
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pulsing(&self) -> bool {
        self.last_refresh
            .map(|at| at.elapsed() < PULSE_DURATION)
            .unwrap_or(false)
    }
}

impl DisplaySink for Screen {
    fn show_time(&mut self, time: &FormattedTime) {
        self.time = time.clone();
        self.refreshes += 1;
        self.last_refresh = Some(Instant::now());
    }

    fn push_lap(&mut self, lap: &LapRecord) {
        self.laps.push_front(lap.clone());
    }

    fn clear_laps(&mut self) {
        self.laps.clear();
    }
}
