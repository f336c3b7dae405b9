use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use lapwatch::{
    app::App,
    clock::SystemClock,
    config::FilePreferenceStore,
    error::RuntimeError,
    logging,
    runtime::{AppEvent, ChannelSource, EventSource, Runner},
    theme::Theme,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Stdout},
    path::PathBuf,
    time::Duration,
};

/// terminal stopwatch with laps and a persistent light/dark theme
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal stopwatch. Space starts and stops, (r) resets, (l) records a lap while running, (t) toggles the theme."
)]
pub struct Cli {
    /// display refresh period in milliseconds
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// theme to use for this session (also saved as the new preference)
    #[clap(long, value_enum)]
    theme: Option<Theme>,

    /// preference file to use instead of the platform config location
    #[clap(long)]
    prefs: Option<PathBuf>,

    /// log file to write to (filter with LAPWATCH_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn prefs_store(&self) -> FilePreferenceStore {
        match &self.prefs {
            Some(path) => FilePreferenceStore::with_path(path),
            None => FilePreferenceStore::new(),
        }
    }

    fn build_app(&self) -> App {
        let mut app = App::new(SystemClock, self.tick_period(), Box::new(self.prefs_store()));
        if let Some(theme) = self.theme {
            app.set_theme(theme);
        }
        app
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = logging::init(cli.log_file.clone());

    // leave the user's terminal usable even if rendering panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut terminal = undo_on_error(setup_terminal, restore_terminal)?;

    let mut app = cli.build_app();
    let runner = Runner::new(ChannelSource::terminal(), cli.tick_period());
    let result = run(&mut terminal, &mut app, &runner);

    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "stopwatch exited with an error");
    }
    tracing::info!("stopwatch exited");
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Run `step`; if it fails, run `undo` before handing the error back.
fn undo_on_error<T>(
    step: impl FnOnce() -> io::Result<T>,
    undo: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    step().inspect_err(|_| {
        let _ = undo();
    })
}

fn run<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit() {
        let event = runner.step();
        if let AppEvent::Closed = event {
            app.handle_event(event);
            return Err(RuntimeError::InputClosed.into());
        }
        if app.handle_event(event) && !app.should_quit() {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
