//! Structured logging.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and either
//! JSON (production) or pretty (development) output. Decision spans opened by
//! the authorization engine carry `principal`, `verb`, `resource` and
//! `namespace`; enabling `span_events` adds their close events, which include
//! the time each decision took.
//!
//! ```rust,ignore
//! use vigil_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(principal = "alice", "authorizing request");
//! ```

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Log subscriber settings.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Install a subscriber at all.
    pub enabled: bool,
    /// Filter directives, e.g. `info` or `vigil_authz=debug,warn`.
    pub level: String,
    /// JSON output when true, pretty output otherwise.
    pub json_format: bool,
    /// Emit span close events.
    pub span_events: bool,
    /// Include source file and line.
    pub file_line_info: bool,
    /// Colour the pretty output.
    pub ansi: bool,
    /// Reported once when the subscriber is installed.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            ansi: false,
            service_name: "vigil".to_string(),
        }
    }
}

impl LogConfig {
    /// Pretty, coloured debug output with span timings and source locations.
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            ansi: true,
            ..Self::default()
        }
    }

    /// JSON output at `info`.
    pub fn production() -> Self {
        Self::default()
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Installs the global log subscriber described by `config`.
///
/// Does nothing when logging is disabled.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for bad filter directives and
/// [`TelemetryError::Subscriber`] if a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;
    let layer = if config.json_format {
        fmt::layer()
            .json()
            .with_span_events(config.span_events())
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_ansi(config.ansi)
            .with_span_events(config.span_events())
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;

    tracing::debug!(service = %config.service_name, level = %config.level, "logging initialized");
    Ok(())
}

/// Parses filter directives.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if `directives` does not parse.
pub fn create_env_filter(directives: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| TelemetryError::invalid_filter(directives, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let prod = LogConfig::production();
        assert!(prod.json_format);
        assert_eq!(prod.level, "info");
        assert_eq!(prod.span_events(), FmtSpan::NONE);

        let dev = LogConfig::development();
        assert!(!dev.json_format);
        assert!(dev.ansi);
        assert_eq!(dev.span_events(), FmtSpan::CLOSE);
    }

    #[test]
    fn test_create_env_filter() {
        assert!(create_env_filter("vigil_authz=debug,warn").is_ok());

        let err = create_env_filter("vigil_authz=loud").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }

    #[test]
    fn test_disabled_logging() {
        let config = LogConfig {
            enabled: false,
            ..LogConfig::default()
        };
        assert!(init_logging(&config).is_ok());
    }
}
