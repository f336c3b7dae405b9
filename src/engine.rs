//! Stopwatch core: timing state, lap bookkeeping and time formatting.
//!
//! The engine never talks to a terminal or a timer thread directly. Time comes
//! from a [`Clock`], periodic refreshes are registered with a [`Scheduler`] and
//! everything visible goes out through a [`DisplaySink`].

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::clock::Clock;
use crate::display::DisplaySink;
use crate::schedule::{Scheduler, TaskHandle};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(10);

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Display form of an elapsed duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTime {
    /// `HH:MM:SS`; the hour field widens past two digits instead of wrapping
    pub main: String,
    /// hundredths of a second, always two digits
    pub fractional: String,
}

impl fmt::Display for FormattedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.main, self.fractional)
    }
}

pub fn format_time(total_ms: u64) -> FormattedTime {
    let hours = total_ms / MS_PER_HOUR;
    let minutes = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let hundredths = (total_ms % MS_PER_SECOND) / 10;

    FormattedTime {
        main: format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
        fractional: format!("{:02}", hundredths),
    }
}

/// A recorded lap, numbered from 1 since the last reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapRecord {
    pub index: u32,
    /// `HH:MM:SS.FF`
    pub formatted_time: String,
}

impl LapRecord {
    pub fn new(index: u32, formatted_time: String) -> Self {
        Self {
            index,
            formatted_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TimerStatus {
    Stopped,
    Running,
}

/// Which controls currently do something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub stop: bool,
    pub lap: bool,
}

#[derive(Debug)]
pub struct TimerEngine<C: Clock, S: Scheduler, D: DisplaySink> {
    clock: C,
    scheduler: S,
    sink: D,
    tick_period: Duration,
    tick_task: Option<TaskHandle>,
    running: bool,
    start_epoch: i64,
    elapsed: u64,
    lap_count: u32,
    laps: VecDeque<LapRecord>,
}

impl<C: Clock, S: Scheduler, D: DisplaySink> TimerEngine<C, S, D> {
    pub fn new(clock: C, scheduler: S, sink: D) -> Self {
        Self::with_tick_period(clock, scheduler, sink, DEFAULT_TICK_PERIOD)
    }

    pub fn with_tick_period(clock: C, scheduler: S, sink: D, tick_period: Duration) -> Self {
        Self {
            clock,
            scheduler,
            sink,
            tick_period,
            tick_task: None,
            running: false,
            start_epoch: 0,
            elapsed: 0,
            lap_count: 0,
            laps: VecDeque::new(),
        }
    }

    /// Begin or resume counting. The display picks up the new state on the
    /// first scheduled tick.
    pub fn start(&mut self) {
        if self.running {
            return;
        }

        self.start_epoch = self.clock.now_ms() - self.elapsed as i64;
        self.running = true;
        self.tick_task = Some(self.scheduler.schedule_repeating(self.tick_period));
        tracing::debug!(elapsed_ms = self.elapsed, "stopwatch started");
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.cancel_tick();
        self.elapsed = self.live_elapsed();
        self.running = false;
        self.sink.show_time(&format_time(self.elapsed));
        tracing::debug!(elapsed_ms = self.elapsed, "stopwatch stopped");
    }

    /// Zero everything and drop all laps; valid in any state.
    pub fn reset(&mut self) {
        self.cancel_tick();
        self.running = false;
        self.elapsed = 0;
        self.lap_count = 0;
        self.laps.clear();
        self.sink.show_time(&format_time(0));
        self.sink.clear_laps();
        tracing::debug!("stopwatch reset");
    }

    pub fn record_lap(&mut self) {
        if !self.running {
            return;
        }

        self.elapsed = self.live_elapsed();
        self.lap_count += 1;
        let lap = LapRecord::new(self.lap_count, format_time(self.elapsed).to_string());
        self.sink.push_lap(&lap);
        tracing::debug!(lap = lap.index, time = %lap.formatted_time, "lap recorded");
        self.laps.push_front(lap);
    }

    /// Recompute elapsed time and push it to the display.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        self.elapsed = self.live_elapsed();
        self.sink.show_time(&format_time(self.elapsed));
    }

    /// Run `tick` if the repeating task is due. Returns whether it ran.
    pub fn on_timer(&mut self) -> bool {
        let Some(handle) = self.tick_task else {
            return false;
        };

        if self.scheduler.poll(handle, self.clock.now_ms()) {
            self.tick();
            true
        } else {
            false
        }
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> TimerStatus {
        if self.running {
            TimerStatus::Running
        } else {
            TimerStatus::Stopped
        }
    }

    pub fn controls(&self) -> Controls {
        Controls {
            start: !self.running,
            stop: self.running,
            lap: self.running,
        }
    }

    /// Elapsed milliseconds, read live from the clock while running
    pub fn elapsed_ms(&self) -> u64 {
        if self.running {
            self.live_elapsed()
        } else {
            self.elapsed
        }
    }

    pub fn lap_count(&self) -> u32 {
        self.lap_count
    }

    /// Laps, most recent first
    pub fn laps(&self) -> impl Iterator<Item = &LapRecord> {
        self.laps.iter()
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn live_elapsed(&self) -> u64 {
        // a wall clock stepping backwards must not yield negative time
        (self.clock.now_ms() - self.start_epoch).max(0) as u64
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick_task.take() {
            self.scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::display::Screen;
    use crate::schedule::IntervalScheduler;

    type TestEngine = TimerEngine<ManualClock, IntervalScheduler, Screen>;

    fn engine() -> (TestEngine, ManualClock) {
        let clock = ManualClock::new(1_700_000_000_000);
        let engine = TimerEngine::new(clock.clone(), IntervalScheduler::new(), Screen::new());
        (engine, clock)
    }

    #[test]
    fn test_format_time_zero() {
        let t = format_time(0);
        assert_eq!(t.main, "00:00:00");
        assert_eq!(t.fractional, "00");
    }

    #[test]
    fn test_format_time_mixed_fields() {
        let t = format_time(3_661_050);
        assert_eq!(t.main, "01:01:01");
        assert_eq!(t.fractional, "05");
    }

    #[test]
    fn test_format_time_truncates_sub_hundredths() {
        assert_eq!(format_time(9).fractional, "00");
        assert_eq!(format_time(999).fractional, "99");
        assert_eq!(format_time(59_999).main, "00:00:59");
        assert_eq!(format_time(60_000).main, "00:01:00");
    }

    #[test]
    fn test_format_time_hours_widen() {
        assert_eq!(format_time(99 * MS_PER_HOUR).main, "99:00:00");
        assert_eq!(format_time(100 * MS_PER_HOUR).main, "100:00:00");
        assert_eq!(format_time(1234 * MS_PER_HOUR + 5_010).main, "1234:00:05");
    }

    #[test]
    fn test_format_time_display_uses_dot() {
        assert_eq!(format_time(1_500).to_string(), "00:00:01.50");
    }

    fn parse_back(t: &FormattedTime) -> u64 {
        let parts: Vec<u64> = t.main.split(':').map(|p| p.parse().unwrap()).collect();
        let hundredths: u64 = t.fractional.parse().unwrap();
        parts[0] * MS_PER_HOUR + parts[1] * MS_PER_MINUTE + parts[2] * MS_PER_SECOND + hundredths * 10
    }

    #[test]
    fn test_format_time_reconstructs_within_10ms() {
        let samples = (0..5_000u64)
            .map(|i| i * 7_919)
            .chain([0, 9, 10, 999, 1_000, 59_999, 3_599_999, 3_600_000, 360_000_009, u32::MAX as u64]);

        for ms in samples {
            let back = parse_back(&format_time(ms));
            assert!(back <= ms && ms - back < 10, "ms={} back={}", ms, back);
        }
    }

    #[test]
    fn test_new_engine_is_stopped_and_zeroed() {
        let (engine, _) = engine();
        assert!(!engine.is_running());
        assert_eq!(engine.status(), TimerStatus::Stopped);
        assert_eq!(engine.elapsed_ms(), 0);
        assert_eq!(engine.lap_count(), 0);
        assert_eq!(engine.laps().count(), 0);
        assert_eq!(engine.tick_period(), DEFAULT_TICK_PERIOD);
    }

    #[test]
    fn test_start_does_not_refresh_synchronously() {
        let (mut engine, _) = engine();
        engine.start();

        assert!(engine.is_running());
        assert_eq!(engine.sink().refreshes, 0);

        assert!(engine.on_timer());
        assert_eq!(engine.sink().refreshes, 1);
    }

    #[test]
    fn test_start_twice_is_same_as_once() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(300);
        engine.start();
        clock.advance(200);

        assert_eq!(engine.elapsed_ms(), 500);
        assert_eq!(engine.scheduler().active_tasks(), 1);
    }

    #[test]
    fn test_ticks_follow_the_period() {
        let (mut engine, clock) = engine();
        engine.start();

        assert!(engine.on_timer());
        clock.advance(4);
        assert!(!engine.on_timer());
        clock.advance(6);
        assert!(engine.on_timer());
        assert_eq!(engine.sink().time.fractional, "01");
    }

    #[test]
    fn test_stop_then_start_resumes() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(500);
        engine.on_timer();
        engine.stop();

        clock.advance(1_000);
        assert_eq!(engine.elapsed_ms(), 500);
        assert!(!engine.on_timer());

        engine.start();
        clock.advance(200);
        engine.stop();

        assert_eq!(engine.elapsed_ms(), 700);
        assert_eq!(engine.sink().time.main, "00:00:00");
        assert_eq!(engine.sink().time.fractional, "70");
    }

    #[test]
    fn test_stop_pushes_exactly_one_refresh() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(1_234);
        engine.stop();

        assert_eq!(engine.sink().refreshes, 1);
        assert_eq!(engine.sink().time.main, "00:00:01");
        assert_eq!(engine.sink().time.fractional, "23");

        // a second stop is a no-op and leaves the display alone
        engine.stop();
        assert_eq!(engine.sink().refreshes, 1);
    }

    #[test]
    fn test_stop_cancels_tick_task() {
        let (mut engine, clock) = engine();
        engine.start();
        engine.stop();
        engine.stop();

        assert_eq!(engine.scheduler().active_tasks(), 0);
        clock.advance(100);
        assert!(!engine.on_timer());
    }

    #[test]
    fn test_lap_while_stopped_is_noop() {
        let (mut engine, _) = engine();
        engine.record_lap();

        assert_eq!(engine.lap_count(), 0);
        assert_eq!(engine.laps().count(), 0);
        assert!(engine.sink().laps.is_empty());
    }

    #[test]
    fn test_laps_are_most_recent_first() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(1_000);
        engine.record_lap();
        clock.advance(1_250);
        engine.record_lap();

        let laps: Vec<_> = engine.laps().cloned().collect();
        assert_eq!(laps[0], LapRecord::new(2, "00:00:02.25".into()));
        assert_eq!(laps[1], LapRecord::new(1, "00:00:01.00".into()));
        assert_eq!(engine.sink().laps.front().map(|l| l.index), Some(2));
    }

    #[test]
    fn test_reset_clears_laps_and_restarts_numbering() {
        let (mut engine, clock) = engine();
        engine.start();
        for _ in 0..3 {
            clock.advance(100);
            engine.record_lap();
        }
        assert_eq!(engine.lap_count(), 3);

        engine.reset();
        assert_eq!(engine.lap_count(), 0);
        assert_eq!(engine.laps().count(), 0);
        assert!(engine.sink().laps.is_empty());
        assert!(!engine.is_running());

        engine.start();
        clock.advance(50);
        engine.record_lap();
        assert_eq!(engine.laps().next().map(|l| l.index), Some(1));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (mut engine, _) = engine();
        engine.reset();
        engine.reset();

        assert_eq!(engine.elapsed_ms(), 0);
        assert_eq!(engine.sink().refreshes, 2);
        assert_eq!(engine.sink().time, format_time(0));
    }

    #[test]
    fn test_reset_while_running_cancels_ticks() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(250);
        engine.on_timer();
        engine.reset();

        assert_eq!(engine.scheduler().active_tasks(), 0);
        clock.advance(250);
        assert!(!engine.on_timer());
        assert_eq!(engine.elapsed_ms(), 0);
    }

    #[test]
    fn test_lap_scenario() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(1_500);
        engine.record_lap();

        assert_eq!(
            engine.laps().next(),
            Some(&LapRecord::new(1, "00:00:01.50".into()))
        );

        engine.stop();
        engine.reset();
        assert_eq!(engine.sink().time.main, "00:00:00");
        assert_eq!(engine.sink().time.fractional, "00");
        assert!(engine.sink().laps.is_empty());
    }

    #[test]
    fn test_clock_going_backwards_clamps_to_zero() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance(-5_000);
        engine.on_timer();

        assert_eq!(engine.elapsed_ms(), 0);
        assert_eq!(engine.sink().time, format_time(0));
    }

    #[test]
    fn test_tick_while_stopped_is_noop() {
        let (mut engine, _) = engine();
        engine.tick();
        assert_eq!(engine.sink().refreshes, 0);
    }

    #[test]
    fn test_controls_follow_state() {
        let (mut engine, _) = engine();
        assert_eq!(
            engine.controls(),
            Controls {
                start: true,
                stop: false,
                lap: false
            }
        );

        engine.toggle();
        assert_eq!(
            engine.controls(),
            Controls {
                start: false,
                stop: true,
                lap: true
            }
        );

        engine.toggle();
        assert!(!engine.is_running());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TimerStatus::Running.to_string(), "Running");
        assert_eq!(TimerStatus::Stopped.to_string(), "Stopped");
    }
}
