//! Main configuration types.
//!
//! This module provides the top-level [`VigilConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{
    AuthorizationConfig, ConfigError, LogFormat, ResourceNamePolicy, TelemetryConfigSection,
};

/// Complete Vigil configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use vigil_config::VigilConfig;
///
/// let config = VigilConfig::default();
/// assert_eq!(config.authorization.visibility_concurrency, 16);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct VigilConfig {
    /// Telemetry configuration (metrics, logging).
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,

    /// Authorization engine configuration.
    #[serde(default)]
    pub authorization: AuthorizationConfig,
}

impl VigilConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> VigilConfigBuilder {
        VigilConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - Metrics are enabled with an unparsable address
    /// - `visibility_concurrency` is zero
    /// - `decision_timeout_ms` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telemetry.metrics.enabled
            && self
                .telemetry
                .metrics
                .addr
                .parse::<std::net::SocketAddr>()
                .is_err()
        {
            return Err(ConfigError::invalid(
                "telemetry.metrics.addr",
                format!("invalid socket address: {}", self.telemetry.metrics.addr),
            ));
        }

        if self.authorization.visibility_concurrency == 0 {
            return Err(ConfigError::invalid(
                "authorization.visibility_concurrency",
                "must be at least 1",
            ));
        }

        if self.authorization.decision_timeout_ms == Some(0) {
            return Err(ConfigError::invalid(
                "authorization.decision_timeout_ms",
                "must be greater than zero when set",
            ));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, coloured debug logs with source locations. Metrics stay off so
    /// several local processes can run side by side.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.ansi_enabled = true;
        config.telemetry.logging.include_location = true;
        config.telemetry.metrics.enabled = false;
        config.telemetry.environment = "development".to_string();

        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON logs at info level and a one second decision deadline. Name
    /// matching stays unrestricted so wildcard rules keep covering named
    /// operations.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.ansi_enabled = false;
        config.telemetry.environment = "production".to_string();

        config.authorization.resource_name_policy = ResourceNamePolicy::Unrestricted;
        config.authorization.decision_timeout_ms = Some(1000);

        config
    }
}

/// Builder for [`VigilConfig`].
#[derive(Debug, Default)]
pub struct VigilConfigBuilder {
    telemetry: Option<TelemetryConfigSection>,
    authorization: Option<AuthorizationConfig>,
}

impl VigilConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Set the authorization configuration.
    #[must_use]
    pub fn authorization(mut self, authorization: AuthorizationConfig) -> Self {
        self.authorization = Some(authorization);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> VigilConfig {
        VigilConfig {
            telemetry: self.telemetry.unwrap_or_default(),
            authorization: self.authorization.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<VigilConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricsConfig;

    #[test]
    fn test_default_config() {
        let config = VigilConfig::default();
        assert_eq!(config.telemetry.service_name, "vigil");
        assert_eq!(
            config.authorization.resource_name_policy,
            ResourceNamePolicy::Unrestricted
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_all_sections() {
        let config = VigilConfig::builder()
            .telemetry(TelemetryConfigSection {
                service_name: "vigil-backend".to_string(),
                ..Default::default()
            })
            .authorization(AuthorizationConfig {
                visibility_concurrency: 4,
                ..Default::default()
            })
            .build();

        assert_eq!(config.telemetry.service_name, "vigil-backend");
        assert_eq!(config.authorization.visibility_concurrency, 4);
    }

    #[test]
    fn test_validate_invalid_metrics_addr() {
        let config = VigilConfig::builder()
            .telemetry(TelemetryConfigSection {
                metrics: MetricsConfig {
                    enabled: true,
                    addr: "invalid".to_string(),
                },
                ..Default::default()
            })
            .build();

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("metrics.addr"));
    }

    #[test]
    fn test_validate_disabled_metrics_ignores_addr() {
        let config = VigilConfig::builder()
            .telemetry(TelemetryConfigSection {
                metrics: MetricsConfig {
                    enabled: false,
                    addr: "invalid".to_string(),
                },
                ..Default::default()
            })
            .build();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let result = VigilConfig::builder()
            .authorization(AuthorizationConfig {
                visibility_concurrency: 0,
                ..Default::default()
            })
            .build_validated();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("visibility_concurrency"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let result = VigilConfig::builder()
            .authorization(AuthorizationConfig {
                decision_timeout_ms: Some(0),
                ..Default::default()
            })
            .build_validated();

        assert!(result.unwrap_err().to_string().contains("decision_timeout_ms"));
    }

    #[test]
    fn test_development_preset() {
        let config = VigilConfig::development();
        assert_eq!(config.telemetry.logging.level, "debug");
        assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
        assert!(config.telemetry.logging.ansi_enabled);
        assert!(!config.telemetry.metrics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_preset() {
        let config = VigilConfig::production();
        assert_eq!(config.telemetry.logging.format, LogFormat::Json);
        assert_eq!(
            config.authorization.resource_name_policy,
            ResourceNamePolicy::Unrestricted
        );
        assert_eq!(config.authorization.decision_timeout_ms, Some(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let config = VigilConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[telemetry]"));
        assert!(toml_str.contains("[authorization]"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let toml_str = r#"
            [server]
            http_addr = "127.0.0.1:8000"
        "#;

        let result: Result<VigilConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }
}
