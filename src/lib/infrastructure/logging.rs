//! Logging setup: console output plus `info` and `error` log files

use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

/// File receiving every event at `info` and above
pub const INFO_LOG_FILE: &str = "infoLogger.log";

/// File receiving `error` events only
pub const ERROR_LOG_FILE: &str = "errorLogger.log";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct LogConfig {
    /// Directory holding the log files, created if missing
    #[arg(long, env = "LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

/// Builds the subscriber: console filtered by `RUST_LOG` (default `info`), and two append-only
/// files in `config.log_dir`.
pub fn subscriber(config: &LogConfig) -> Result<impl Subscriber + Send + Sync + 'static> {
    fs::create_dir_all(&config.log_dir).with_context(|| {
        format!(
            "failed to create log directory {}",
            config.log_dir.display()
        )
    })?;

    let info_file = open_log_file(&config.log_dir.join(INFO_LOG_FILE))?;
    let error_file = open_log_file(&config.log_dir.join(ERROR_LOG_FILE))?;

    let console = fmt::layer().with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );

    let info_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(info_file)
        .with_filter(LevelFilter::INFO);

    let error_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(error_file)
        .with_filter(LevelFilter::ERROR);

    Ok(Registry::default()
        .with(console)
        .with(info_layer)
        .with(error_layer))
}

/// Installs the subscriber as the global default
#[mutants::skip]
pub fn init(config: &LogConfig) -> Result<()> {
    subscriber(config)?
        .try_init()
        .context("failed to install tracing subscriber")
}

fn open_log_file(path: &Path) -> Result<Arc<File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    Ok(Arc::new(file))
}
