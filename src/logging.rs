use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// `<dir>/<YYYY-MM-DD>.log`
pub fn log_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.log", date.format("%Y-%m-%d")))
}

fn env_filter(debug: bool) -> EnvFilter {
    std::env::var("REQLAB_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| {
                if debug {
                    EnvFilter::new("debug")
                } else {
                    EnvFilter::new("info")
                }
            },
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new("info")),
        )
}

/// Sends all tracing output to today's log file under `dir`, creating the
/// directory if needed. The terminal belongs to the UI, so nothing is
/// written to stdout or stderr once this succeeds.
pub fn init_file_logging(dir: &Path, debug: bool) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("error creating log directory {}", dir.display()))?;

    let path = log_file_path(dir, Local::now().date_naive());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("error opening log file {}", path.display()))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter(debug))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
    Ok(path)
}
