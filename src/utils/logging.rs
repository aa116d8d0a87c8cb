//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the TripPlanner application.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{Result, TripPlannerError};

/// Initialize logging based on configuration.
///
/// Returns the file writer guard when a log directory is configured; keep it
/// alive for the lifetime of the process or buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| TripPlannerError::Config(format!("Invalid log filter: {}", e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed()
    };

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "trip-planner.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| TripPlannerError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: &str, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log trip mutations
pub fn log_trip_action(trip_id: &str, action: &str, user_id: &str, details: Option<&str>) {
    info!(
        trip_id = trip_id,
        action = action,
        user_id = user_id,
        details = details,
        "Trip action performed"
    );
}

/// Log navigation between screens
pub fn log_navigation(from: &str, to: &str) {
    debug!(from = from, to = to, "Navigation");
}

/// Log a failed operation surfaced to a screen
pub fn log_operation_failure(operation: &str, error: &TripPlannerError) {
    if error.is_recoverable() {
        warn!(
            operation = operation,
            error = %error,
            severity = %error.severity(),
            "Operation failed"
        );
    } else {
        error!(
            operation = operation,
            error = %error,
            severity = %error.severity(),
            "Operation failed"
        );
    }
}
