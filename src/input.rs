use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleRun,
    Start,
    Stop,
    Reset,
    Lap,
    ToggleTheme,
    Quit,
}

/// Translate a terminal key event into a command.
///
/// Releases are dropped; auto-repeated presses map like any other press.
/// `running` gates the lap key the same way the lap control is disabled
/// while stopped.
pub fn map_key(key: KeyEvent, running: bool) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            ' ' => Some(Command::ToggleRun),
            'r' => Some(Command::Reset),
            'l' if running => Some(Command::Lap),
            's' => Some(Command::Start),
            'p' => Some(Command::Stop),
            't' => Some(Command::ToggleTheme),
            'q' => Some(Command::Quit),
            _ => None,
        },
        _ => None,
    }
}
