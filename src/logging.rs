//! File-based tracing setup.
//!
//! The terminal belongs to the UI, so log output only ever goes to a file.
//! The filter comes from `LAPWATCH_LOG` (same syntax as `RUST_LOG`) and
//! defaults to `info`.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app_dirs::AppDirs;

pub const LOG_ENV: &str = "LAPWATCH_LOG";

/// Install the global subscriber.
///
/// The returned guard must live until shutdown so buffered lines are
/// flushed. Returns `None` (logging disabled) when no log file can be opened.
pub fn init(path: Option<PathBuf>) -> Option<WorkerGuard> {
    let path = path.or_else(AppDirs::log_path)?;
    let (dir, file_name) = split_log_path(&path)?;

    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("lapwatch: cannot create log directory {:?}: {}", dir, e);
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(&dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("lapwatch: cannot open log file {:?}: {}", path, e);
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // a subscriber may already be installed (e.g. in tests); keep that one
    if tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .try_init()
        .is_err()
    {
        return None;
    }

    tracing::info!(log_file = ?path, "logging initialized");
    Some(guard)
}

fn split_log_path(path: &Path) -> Option<(PathBuf, String)> {
    let file_name = path.file_name()?.to_str()?.to_string();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, file_name))
}
