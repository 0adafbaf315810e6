//! Combined telemetry configuration.

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;

/// Logging and metrics settings for one service.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name, attached to the start-up log line and every log record.
    pub service_name: String,
    /// Deployment environment (development, staging, production).
    pub environment: String,
    /// Prometheus exporter settings.
    pub metrics: MetricsConfig,
    /// Log subscriber settings.
    pub logging: LogConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "vigil".to_string(),
            environment: "development".to_string(),
            metrics: MetricsConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl TelemetryConfig {
    /// Starts a builder from the defaults.
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder {
            config: Self::default(),
        }
    }

    /// Pretty debug logs, no metrics listener.
    pub fn development() -> Self {
        Self::builder()
            .logging(LogConfig::development())
            .metrics(MetricsConfig {
                enabled: false,
                ..MetricsConfig::default()
            })
            .build()
    }

    /// JSON logs at info, metrics on the default address.
    pub fn production() -> Self {
        Self::builder()
            .environment("production")
            .logging(LogConfig::production())
            .build()
    }
}

/// Builder for [`TelemetryConfig`].
///
/// [`build`](Self::build) copies the service name into the log settings so
/// both always agree.
#[derive(Debug, Clone)]
pub struct TelemetryConfigBuilder {
    config: TelemetryConfig,
}

impl TelemetryConfigBuilder {
    /// Sets the service name.
    pub fn service_name(mut self, name: &str) -> Self {
        self.config.service_name = name.to_string();
        self
    }

    /// Sets the environment.
    pub fn environment(mut self, env: &str) -> Self {
        self.config.environment = env.to_string();
        self
    }

    /// Replaces the metrics settings.
    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.config.metrics = metrics;
        self
    }

    /// Replaces the log settings.
    pub fn logging(mut self, logging: LogConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Finishes the configuration.
    pub fn build(mut self) -> TelemetryConfig {
        self.config
            .logging
            .service_name
            .clone_from(&self.config.service_name);
        self.config
    }
}
