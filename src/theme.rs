use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::config::PreferenceStore;

pub const THEME_KEY: &str = "theme";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colours used by the terminal UI for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label for the control that switches away from this theme
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "☾ DARK MODE",
            Theme::Dark => "☀ LIGHT MODE",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: Color::White,
                foreground: Color::Black,
                accent: Color::Blue,
                muted: Color::Gray,
            },
            Theme::Dark => Palette {
                background: Color::Black,
                foreground: Color::White,
                accent: Color::Cyan,
                muted: Color::DarkGray,
            },
        }
    }

    /// The stored value is the serde name of the theme. Anything that does
    /// not name one, including an unreadable store, falls back to light.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        store
            .get(THEME_KEY)
            .and_then(|raw| serde_json::from_value(serde_json::Value::String(raw)).ok())
            .unwrap_or_default()
    }

    /// Best-effort: a failed write is logged and otherwise ignored.
    pub fn save(self, store: &mut dyn PreferenceStore) {
        let stored = match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => name,
            _ => self.to_string(),
        };
        if let Err(e) = store.set(THEME_KEY, &stored) {
            tracing::warn!(theme = %self, error = %e, "could not persist theme preference");
        }
    }
}
