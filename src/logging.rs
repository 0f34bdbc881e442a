//! Logging for the batch utilities.
//!
//! Every run writes its own log file under the `.stimprep` logs directory
//! and mirrors events to stdout, so an operator can still answer "what
//! happened to that stimulus last week" after the terminal is gone. Each
//! batch is short-lived and single-threaded, so the file is written
//! directly; old run logs are pruned by filename, newest kept.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app_dirs;

const LOG_FILE_PREFIX: &str = "stimprep";
/// Run logs kept on disk, counting the one being created.
const MAX_RUN_LOGS: usize = 10;

/// Errors that may occur while initializing logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error(transparent)]
    Dirs(#[from] app_dirs::AppDirError),
    #[error("Failed to create log file {path}: {source}")]
    CreateLogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to install the tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Initialize tracing to stdout plus a fresh per-run log file.
///
/// Failures are returned so the utilities can keep running with stdout-only
/// output instead of aborting a batch over a logging problem.
pub fn init() -> Result<(), LoggingError> {
    let logs_dir = app_dirs::logs_dir()?;
    prune_run_logs(&logs_dir, MAX_RUN_LOGS.saturating_sub(1));

    let path = logs_dir.join(run_log_name(OffsetDateTime::now_utc()));
    let file = File::create(&path).map_err(|source| LoggingError::CreateLogFile {
        path: path.clone(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        .try_init()?;

    tracing::info!("Logging to {}", path.display());
    Ok(())
}

/// `stimprep_2023-11-14_22-13-20.log`. Lexicographic order of these names
/// is chronological order, which is what pruning relies on.
fn run_log_name(now: OffsetDateTime) -> String {
    const STAMP: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    match now.format(STAMP) {
        Ok(stamp) => format!("{LOG_FILE_PREFIX}_{stamp}.log"),
        Err(_) => format!("{LOG_FILE_PREFIX}_run.log"),
    }
}

/// Delete the oldest run logs until at most `keep` remain. Best-effort: an
/// undeletable log file is not worth failing startup over.
fn prune_run_logs(dir: &Path, keep: usize) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log"))
        .collect();
    names.sort();

    let excess = names.len().saturating_sub(keep);
    for name in names.into_iter().take(excess) {
        let path = dir.join(&name);
        if let Err(err) = std::fs::remove_file(&path) {
            eprintln!("Could not prune old log {}: {err}", path.display());
        }
    }
}
