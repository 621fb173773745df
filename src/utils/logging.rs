//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging helpers
//! for locale switches, catalog loads and formatter cache activity.

use tracing::{debug, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{I18nError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the application.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| I18nError::Logging(e.to_string()))?;

    let json = config.format == "json";
    let stdout_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "untitled-i18n.log");
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
        .map_err(|e| I18nError::Logging(e.to_string()))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log an applied locale switch
pub fn log_locale_change(from: &str, to: &str, namespace: &str, message_count: usize) {
    info!(
        from = from,
        to = to,
        namespace = namespace,
        message_count = message_count,
        "Locale activated"
    );
}

/// Log a currency switch
pub fn log_currency_change(from: &str, to: &str) {
    info!(from = from, to = to, "Currency changed");
}

/// Log the outcome of a catalog load
pub fn log_catalog_load(locale: &str, namespace: &str, message_count: usize, error: Option<&str>) {
    match error {
        Some(error) => warn!(
            locale = locale,
            namespace = namespace,
            error = error,
            "Catalog load failed, activating empty catalog"
        ),
        None => debug!(
            locale = locale,
            namespace = namespace,
            message_count = message_count,
            "Catalog loaded"
        ),
    }
}

/// Log a formatter cache miss
pub fn log_format_cache_miss(kind: &str, key: &str) {
    trace!(kind = kind, key = key, "Formatter cache miss");
}
