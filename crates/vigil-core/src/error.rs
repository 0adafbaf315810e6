//! Error types for Vigil.
//!
//! This module provides the [`VigilError`] type and the closed set of
//! [`ErrorCategory`] values the transport layer maps to status codes.
//!
//! | `ErrorCategory` | Status | Meaning |
//! |---|---|---|
//! | `Validation` | 400 | A record failed model validation |
//! | `NotFound` | 404 | A requested record does not exist |
//! | `RoleNotFound` | 403 | A matching binding references a missing role |
//! | `PermissionDenied` | 403 | The decision engine denied the operation |
//! | `Internal` | 500 | Store or engine failure |
//!
//! A dangling role reference is deliberately a 403 rather than a 500: the
//! request fails closed without revealing internal state.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`VigilError`].
pub type VigilResult<T> = Result<T, VigilError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A record failed validation.
    Validation,
    /// A requested record does not exist.
    NotFound,
    /// A binding references a role that does not exist.
    RoleNotFound,
    /// Access denied by the decision engine.
    PermissionDenied,
    /// Internal or store failure.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RoleNotFound | Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable code used in error envelopes.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Standard error type for Vigil.
///
/// # Example
///
/// ```
/// use vigil_core::{ErrorCategory, VigilError};
///
/// let err = VigilError::role_not_found("ClusterRole", "admin");
/// assert_eq!(err.category(), ErrorCategory::RoleNotFound);
/// assert_eq!(err.status_code().as_u16(), 403);
/// ```
#[derive(Error, Debug)]
pub enum VigilError {
    /// A record failed validation.
    #[error("invalid record: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
        /// The offending field, if known.
        field: Option<String>,
    },

    /// A requested record does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Record kind, e.g. `RoleBinding`.
        kind: String,
        /// Record name, namespace-qualified where applicable.
        name: String,
    },

    /// A binding references a role that does not exist.
    #[error("{message}")]
    RoleNotFound {
        /// Human-readable error message.
        message: String,
        /// The missing role's name.
        role: String,
    },

    /// Operation denied.
    #[error("forbidden: {message}")]
    PermissionDenied {
        /// Human-readable error message.
        message: String,
    },

    /// Store or engine failure.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl VigilError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a validation error pointing at a field.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        Self::Validation {
            message: format!("{field}: {}", message.into()),
            field: Some(field),
        }
    }

    /// Creates a not found error for a record of `kind`.
    #[must_use]
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates a role not found error naming the missing role.
    #[must_use]
    pub fn role_not_found(kind: impl Into<String>, role: impl Into<String>) -> Self {
        let role = role.into();
        Self::RoleNotFound {
            message: format!("{} '{role}' referenced by a binding does not exist", kind.into()),
            role,
        }
    }

    /// Creates a permission denied error.
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::RoleNotFound { .. } => ErrorCategory::RoleNotFound,
            Self::PermissionDenied { .. } => ErrorCategory::PermissionDenied,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Converts this error to a serializable error envelope.
    ///
    /// Internal errors never expose their source chain.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        let category = self.category();
        ErrorEnvelope {
            error: ErrorDetail {
                code: category.code().to_string(),
                message: self.to_string(),
                category,
                details: self.error_details(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation {
                field: Some(field), ..
            } => Some(serde_json::json!({ "field": field })),
            Self::NotFound { kind, name } => {
                Some(serde_json::json!({ "kind": kind, "name": name }))
            }
            Self::RoleNotFound { role, .. } => Some(serde_json::json!({ "role": role })),
            _ => None,
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
