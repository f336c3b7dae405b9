// Library surface shared by the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod schedule;
pub mod theme;
pub mod ui;
