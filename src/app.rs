use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::config::PreferenceStore;
use crate::display::Screen;
use crate::engine::TimerEngine;
use crate::input::{map_key, Command};
use crate::runtime::AppEvent;
use crate::schedule::IntervalScheduler;
use crate::theme::Theme;

pub type Engine<C> = TimerEngine<C, IntervalScheduler, Screen>;

/// Owns the stopwatch and everything wired around it
pub struct App<C: Clock = SystemClock> {
    pub engine: Engine<C>,
    pub theme: Theme,
    prefs: Box<dyn PreferenceStore>,
    should_quit: bool,
}

impl<C: Clock> App<C> {
    pub fn new(clock: C, tick_period: Duration, prefs: Box<dyn PreferenceStore>) -> Self {
        let theme = Theme::load(prefs.as_ref());
        tracing::info!(%theme, tick_ms = tick_period.as_millis() as u64, "app initialized");

        Self {
            engine: TimerEngine::with_tick_period(
                clock,
                IntervalScheduler::new(),
                Screen::new(),
                tick_period,
            ),
            theme,
            prefs,
            should_quit: false,
        }
    }

    /// Force a theme for this session and remember it
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.theme.save(self.prefs.as_mut());
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::ToggleRun => self.engine.toggle(),
            Command::Start => self.engine.start(),
            Command::Stop => self.engine.stop(),
            Command::Reset => self.engine.reset(),
            Command::Lap => self.engine.record_lap(),
            Command::ToggleTheme => self.set_theme(self.theme.toggle()),
            Command::Quit => self.should_quit = true,
        }
    }

    /// Feed one loop event in. Returns true when the screen needs a redraw.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Tick => self.engine.on_timer(),
            AppEvent::Resize => true,
            AppEvent::Closed => {
                tracing::warn!("input closed, shutting down");
                self.should_quit = true;
                false
            }
            AppEvent::Key(key) => match map_key(key, self.engine.is_running()) {
                Some(command) => {
                    self.apply(command);
                    true
                }
                None => false,
            },
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn screen(&self) -> &Screen {
        self.engine.sink()
    }
}
