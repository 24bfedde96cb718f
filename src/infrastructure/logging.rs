//! Logging system configuration and initialization
//!
//! - Single log file in the logs directory, previous run's file rotated aside
//! - Level from configuration, `RUST_LOG` overrides everything
//! - Structured JSON logging (optional)
//! - Console output (optional, off by default since stdout belongs to the status ticker)
//! - Local time stamps

#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking writer flushing for the life of the process
static LOG_GUARDS: Lazy<Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>>> =
    Lazy::new(|| Mutex::new(Vec::new()));

/// Dependencies that are capped unless the level is `trace`
const NOISY_TARGETS: &[(&str, &str)] = &[
    ("reqwest", "info"),
    ("hyper", "warn"),
    ("hyper_util", "warn"),
    ("h2", "warn"),
    ("html5ever", "warn"),
    ("selectors", "warn"),
    ("chromiumoxide", "warn"),
    ("tungstenite", "warn"),
    ("tokio", "info"),
    ("runtime", "warn"),
];

struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Renames the previous run's log file to `<stem>.<timestamp>.log`.
///
/// Returns the new path when a file was rotated.
pub fn rotate_existing_log_file(log_dir: &Path, log_file_name: &str) -> Result<Option<PathBuf>> {
    let log_file_path = log_dir.join(log_file_name);
    if !log_file_path.exists() {
        return Ok(None);
    }

    let metadata = std::fs::metadata(&log_file_path)
        .map_err(|e| anyhow!("Failed to get log file metadata: {}", e))?;
    let file_time = metadata
        .modified()
        .or_else(|_| metadata.created())
        .unwrap_or_else(|_| std::time::SystemTime::now());
    let datetime: DateTime<Local> = file_time.into();

    let file_stem = log_file_name.trim_end_matches(".log");
    let timestamped_name = format!("{}.{}.log", file_stem, datetime.format("%Y%m%dT%H%M%S"));
    let timestamped_path = log_dir.join(&timestamped_name);

    std::fs::rename(&log_file_path, &timestamped_path).map_err(|e| {
        anyhow!(
            "Failed to rotate log file {} to {}: {}",
            log_file_path.display(),
            timestamped_path.display(),
            e
        )
    })?;

    Ok(Some(timestamped_path))
}

/// Builds the filter for the configured level.
///
/// `RUST_LOG`, when set, replaces the whole filter:
/// ```bash
/// RUST_LOG="debug,reqwest=debug,chromiumoxide=debug" imdb-scraper
/// ```
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    if !config.level.to_lowercase().contains("trace") {
        for (target, level) in NOISY_TARGETS {
            filter = filter.add_directive(format!("{}={}", target, level).parse()?);
        }
        filter = filter.add_directive(format!("imdb_scraper_lib={}", config.level).parse()?);
    }

    Ok(filter)
}

/// Installs the global subscriber.
///
/// Fails when neither file nor console output is enabled, or when a
/// subscriber is already installed.
pub fn init_logging_with_config(config: &LoggingConfig, log_dir: &Path) -> Result<()> {
    if !config.file_output && !config.console_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(config)?;

    let mut rotated = None;
    let file_layer = if config.file_output {
        std::fs::create_dir_all(log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;
        rotated = rotate_existing_log_file(log_dir, &config.file_name)?;

        let file_appender = rolling::never(log_dir, &config.file_name);
        let (file_writer, file_guard) = non_blocking(file_appender);
        if let Ok(mut guards) = LOG_GUARDS.lock() {
            guards.push(file_guard);
        }

        let layer = if config.json_format {
            fmt::Layer::new()
                .json()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .boxed()
        } else {
            fmt::Layer::new()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(false)
                .with_ansi(false)
                .boxed()
        };
        Some(layer)
    } else {
        None
    };

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    });

    Registry::default()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log directory: {:?}", log_dir);
    info!("Log level: {}", config.level);
    if let Some(path) = rotated {
        info!("Rotated previous log file to: {:?}", path);
    }
    if config.level.to_lowercase().contains("trace") {
        info!("TRACE level active - dependency logs are not filtered");
    }

    Ok(())
}

/// Log system information for diagnostics
pub fn log_system_info() {
    info!("=== IMDb Scraper System Information ===");
    info!("Application version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {}", std::env::consts::OS);
    info!("Architecture: {}", std::env::consts::ARCH);

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
    info!("=======================================");
}
