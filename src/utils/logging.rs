//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the SIORMA client.

use std::path::Path;

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::{SiormaError, Result};

/// Initialize logging based on configuration.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// When a log file is configured the returned guard must be held until exit,
/// otherwise buffered lines are dropped.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| SiormaError::Config(format!("Invalid log filter {}: {}", config.level, e)))?;

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &config.file_path {
        Some(file_path) => {
            let path = Path::new(file_path);
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "siorma.log".to_string());

            let file_appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| SiormaError::Config(format!("Failed to install tracing subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a completed API call
pub fn log_api_call(method: &str, path: &str, status: u16, duration_ms: u64) {
    if status < 400 {
        debug!(
            method = method,
            path = path,
            status = status,
            duration_ms = duration_ms,
            "API call completed"
        );
    } else {
        warn!(
            method = method,
            path = path,
            status = status,
            duration_ms = duration_ms,
            "API call failed"
        );
    }
}

/// Log admin actions
pub fn log_admin_action(action: &str, target: &str, id: Option<i64>) {
    info!(
        action = action,
        target = target,
        id = id,
        "Admin action performed"
    );
}
