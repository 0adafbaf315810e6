//! Telemetry error types.

use thiserror::Error;

/// Errors raised while installing logging or metrics.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global tracing subscriber was already set.
    #[error("cannot install log subscriber: {0}")]
    Subscriber(String),

    /// The metrics listen address could not be parsed.
    #[error("invalid metrics address '{addr}': {reason}")]
    InvalidAddress {
        /// The rejected address.
        addr: String,
        /// Parser message.
        reason: String,
    },

    /// The Prometheus recorder could not be built or installed.
    #[error("cannot install metrics recorder: {0}")]
    Recorder(String),
}

impl TelemetryError {
    /// Create an invalid filter error.
    pub fn invalid_filter(filter: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidFilter {
            filter: filter.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid address error.
    pub fn invalid_address(addr: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidAddress {
            addr: addr.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a recorder error.
    pub fn recorder(reason: impl ToString) -> Self {
        Self::Recorder(reason.to_string())
    }
}
