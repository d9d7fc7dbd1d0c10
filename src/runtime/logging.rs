use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{BaseDir, LogSettings};

const DAYS_TO_KEEP: usize = 7;

/// `$XDG_STATE_HOME/tryza/logs`, else `~/.local/state/tryza/logs`.
pub fn default_log_dir() -> Option<PathBuf> {
    BaseDir::State.app_dir().map(|dir| dir.join("logs"))
}

/// Send `tracing` output to a daily rolling file.
///
/// The terminal belongs to the UI, so nothing is written to stdout. `RUST_LOG`
/// overrides the configured level. Returns `None` when no log file could be
/// set up; the player runs without logs then. Keep the guard alive for the
/// whole run so buffered lines are flushed.
pub fn init(settings: &LogSettings) -> Option<WorkerGuard> {
    let dir = settings.directory.clone().or_else(default_log_dir)?;
    fs::create_dir_all(&dir).ok()?;

    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("tryza")
        .filename_suffix("log")
        .build(&dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .ok()?;

    Some(guard)
}
