//! Structured logging for scribe using the tracing crate.
//!
//! Everything goes to a daily-rotated file under the XDG state directory so
//! the terminal only shows the transcript and the styled status lines.

use anyhow::anyhow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

const LOG_FILE_PREFIX: &str = "scribe.log";

/// Rotated files kept on disk, one per day.
const KEEP_LOG_FILES: usize = 7;

/// Starts file logging. Level comes from `RUST_LOG` (default "info").
///
/// The returned guard owns the background writer; drop it before exiting so
/// pending lines reach the file.
///
/// # Errors
/// - If the log directory cannot be determined or created
/// - If a global subscriber is already set
pub fn init_logging() -> anyhow::Result<WorkerGuard> {
    let log_dir = log_dir(
        std::env::var_os("XDG_STATE_HOME").map(PathBuf::from),
        dirs::home_dir(),
    )
    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
    fs::create_dir_all(&log_dir)?;

    if let Err(e) = prune_rotated_logs(&log_dir, KEEP_LOG_FILES) {
        eprintln!("Warning: Failed to cleanup old logs: {e}");
    }

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX));

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| anyhow!("Logging already initialized: {e}"))?;

    tracing::debug!("Logging to {}", log_dir.display());
    Ok(guard)
}

/// `$XDG_STATE_HOME/scribe`, else `~/.local/state/scribe`.
fn log_dir(xdg_state_home: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    match xdg_state_home.filter(|p| !p.as_os_str().is_empty()) {
        Some(state) => Some(state.join("scribe")),
        None => home.map(|h| h.join(".local").join("state").join("scribe")),
    }
}

/// Deletes `scribe.log.YYYY-MM-DD` files beyond the `keep` newest.
///
/// Returns how many files were removed.
fn prune_rotated_logs(log_dir: &Path, keep: usize) -> anyhow::Result<usize> {
    let rotated_prefix = format!("{LOG_FILE_PREFIX}.");
    let mut rotated: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            name.strip_prefix(&rotated_prefix)
                .is_some_and(|date| date.matches('-').count() == 2)
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((entry.path(), modified))
        })
        .collect();

    rotated.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in rotated.iter().skip(keep) {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("Failed to delete old log file {}: {e}", path.display()),
        }
    }
    Ok(removed)
}
