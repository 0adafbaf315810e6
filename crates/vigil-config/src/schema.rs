//! Configuration schema types.
//!
//! Every section rejects unknown fields, so a typo in a file is a load error
//! rather than a silently ignored setting.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Enable metrics collection and export.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Prometheus metrics endpoint address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g. "info" or "vigil_authz=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfigSection {
    /// Service name for telemetry identification.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Deployment environment (e.g., "development", "staging", "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfigSection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TelemetryConfigSection {
    /// Converts this section into the runtime telemetry configuration.
    #[must_use]
    pub fn to_telemetry_config(&self) -> vigil_telemetry::TelemetryConfig {
        let logging = vigil_telemetry::LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            json_format: self.logging.format == LogFormat::Json,
            file_line_info: self.logging.include_location,
            ansi: self.logging.ansi_enabled,
            ..vigil_telemetry::LogConfig::default()
        };

        let metrics = vigil_telemetry::MetricsConfig {
            enabled: self.metrics.enabled,
            addr: self.metrics.addr.clone(),
            ..vigil_telemetry::MetricsConfig::default()
        };

        vigil_telemetry::TelemetryConfig::builder()
            .service_name(&self.service_name)
            .environment(&self.environment)
            .logging(logging)
            .metrics(metrics)
            .build()
    }
}

fn default_service_name() -> String {
    "vigil".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

/// How a rule with an empty `resource_names` list treats a named request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResourceNamePolicy {
    /// An empty list places no constraint on the resource name.
    #[default]
    Unrestricted,
    /// A named request is only allowed if its name is listed.
    Restrictive,
}

impl ResourceNamePolicy {
    /// Parses the configuration spelling of a policy.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "unrestricted" => Some(Self::Unrestricted),
            "restrictive" => Some(Self::Restrictive),
            _ => None,
        }
    }
}

/// Authorization configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuthorizationConfig {
    /// Treatment of rules without `resource_names` for named requests.
    #[serde(default)]
    pub resource_name_policy: ResourceNamePolicy,

    /// Maximum concurrent per-namespace checks in a visibility listing.
    #[serde(default = "default_visibility_concurrency")]
    pub visibility_concurrency: usize,

    /// Deadline for a single authorization decision, in milliseconds.
    #[serde(default)]
    pub decision_timeout_ms: Option<u64>,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            resource_name_policy: ResourceNamePolicy::default(),
            visibility_concurrency: default_visibility_concurrency(),
            decision_timeout_ms: None,
        }
    }
}

impl AuthorizationConfig {
    /// The decision deadline as a [`Duration`], if one is configured.
    #[must_use]
    pub fn decision_timeout(&self) -> Option<Duration> {
        self.decision_timeout_ms.map(Duration::from_millis)
    }
}

fn default_visibility_concurrency() -> usize {
    16
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.addr, "0.0.0.0:9090");
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);

        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfigSection::default();
        assert_eq!(config.service_name, "vigil");
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_to_telemetry_config() {
        let section = TelemetryConfigSection {
            service_name: "vigil-backend".to_string(),
            logging: LoggingConfig {
                format: LogFormat::Pretty,
                include_location: true,
                ..Default::default()
            },
            metrics: MetricsConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };

        let config = section.to_telemetry_config();
        assert_eq!(config.service_name, "vigil-backend");
        assert_eq!(config.logging.service_name, "vigil-backend");
        assert!(!config.logging.json_format);
        assert!(config.logging.file_line_info);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_resource_name_policy_deserialize() {
        let policy: ResourceNamePolicy = serde_json::from_str(r#""restrictive""#).unwrap();
        assert_eq!(policy, ResourceNamePolicy::Restrictive);

        let policy: ResourceNamePolicy = serde_json::from_str(r#""unrestricted""#).unwrap();
        assert_eq!(policy, ResourceNamePolicy::Unrestricted);
    }

    #[test]
    fn test_resource_name_policy_parse() {
        assert_eq!(
            ResourceNamePolicy::parse("Restrictive"),
            Some(ResourceNamePolicy::Restrictive)
        );
        assert_eq!(ResourceNamePolicy::parse("lenient"), None);
    }

    #[test]
    fn test_authorization_config_default() {
        let config = AuthorizationConfig::default();
        assert_eq!(config.resource_name_policy, ResourceNamePolicy::Unrestricted);
        assert_eq!(config.visibility_concurrency, 16);
        assert!(config.decision_timeout().is_none());
    }

    #[test]
    fn test_authorization_config_deserialize() {
        let toml = r#"
            resource_name_policy = "restrictive"
            decision_timeout_ms = 250
        "#;
        let config: AuthorizationConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.resource_name_policy, ResourceNamePolicy::Restrictive);
        assert_eq!(config.decision_timeout(), Some(Duration::from_millis(250)));
        // Defaults applied
        assert_eq!(config.visibility_concurrency, 16);
    }

    #[test]
    fn test_authorization_config_unknown_field_rejected() {
        let toml = r#"
            mode = "rbac"
        "#;
        let result: Result<AuthorizationConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
