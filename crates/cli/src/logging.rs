use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// `log_<YYYY-MM-DD_HH-MM-SS>.log`
pub fn log_file_name(at: DateTime<Local>) -> String {
    format!("log_{}.log", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Install the global subscriber: console output, plus a plain-text log file
/// in `log_dir` when one is given. Returns the log file path.
pub fn init(log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_target(false).with_level(true);

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let path = dir.join(log_file_name(Local::now()));
            let file = File::create(&path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(log_path)
}
