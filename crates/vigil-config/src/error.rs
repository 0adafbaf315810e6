//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`VigilConfig`](crate::VigilConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration file does not exist.
    #[error("configuration file not found: {}", .path.display())]
    MissingFile {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A configuration file exists but could not be read.
    #[error("cannot read configuration file {}", .path.display())]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Neither TOML nor JSON.
    #[error("unsupported configuration format '{0}' (expected toml or json)")]
    UnsupportedFormat(String),

    /// Malformed TOML, or a field that does not exist.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or a field that does not exist.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment override could not be parsed.
    #[error("cannot parse {var}: {reason}")]
    Env {
        /// Variable name, prefix included.
        var: String,
        /// What was expected.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the field, e.g. `authorization.visibility_concurrency`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Create a missing file error.
    pub fn missing_file(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }

    /// Create a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create an environment override error.
    pub fn env(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Env {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Create an out-of-range value error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_culprit() {
        let err = ConfigError::missing_file("/etc/vigil/vigil.toml");
        assert!(err.to_string().contains("/etc/vigil/vigil.toml"));

        let field = "authorization.visibility_concurrency";
        let err = ConfigError::invalid(field, "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid value for authorization.visibility_concurrency: must be at least 1"
        );

        let err = ConfigError::env("VIGIL__AUTHORIZATION__DECISION_TIMEOUT_MS", "expected integer");
        assert_eq!(
            err.to_string(),
            "cannot parse VIGIL__AUTHORIZATION__DECISION_TIMEOUT_MS: expected integer"
        );

        let err = ConfigError::UnsupportedFormat("yaml".to_string());
        assert!(err.to_string().contains("'yaml'"));
    }

    #[test]
    fn test_read_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::read("/etc/vigil/vigil.toml", io);
        assert!(err.source().is_some());
    }
}
