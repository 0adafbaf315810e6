//! Error types for the authorization crate.
//!
//! Two layers exist. [`StoreError`] is what the store collaborator reports;
//! [`AuthzError`] is what the engine reports to its caller. The engine
//! classifies every store error before it escapes:
//!
//! | Store error | While | Engine error |
//! |-------------|-------|--------------|
//! | `NotFound` | resolving the role of a matching binding | `RoleNotFound` (403) |
//! | any | listing bindings | `Internal` (500) |
//! | `Unavailable` / `Internal` | resolving a role | `Internal` (500) |

use std::time::Duration;

use http::StatusCode;
use thiserror::Error;
use vigil_core::{ErrorCategory, RoleRefKind, VigilError};

use crate::attributes::Attributes;

/// Result type for authorization operations.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Result type for store collaborator calls.
pub type StoreResult<T> = Result<T, StoreError>;

fn qualified(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}/{name}")
    }
}

/// Errors reported by an [`RbacStore`](crate::RbacStore).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The requested role does not exist.
    #[error("{} '{}' not found", .kind.as_str(), qualified(.namespace, .name))]
    NotFound {
        /// Kind of the missing record.
        kind: RoleRefKind,
        /// Namespace searched; empty for cluster roles.
        namespace: String,
        /// Name searched for.
        name: String,
    },

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store failed for another reason.
    #[error("store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create a not found error for a namespaced role.
    pub fn role_not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RoleRefKind::Role,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create a not found error for a cluster role.
    pub fn cluster_role_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: RoleRefKind::ClusterRole,
            namespace: String::new(),
            name: name.into(),
        }
    }

    /// Check if this is a not found error.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the error category.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Unavailable(_) | Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

/// Errors that can occur during authorization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthzError {
    /// A binding that matches the caller references a role that does not
    /// exist. The decision is negative.
    #[error(
        "{} '{}' referenced by binding '{}' does not exist",
        .kind.as_str(),
        qualified(.namespace, .name),
        .binding
    )]
    RoleNotFound {
        /// Kind of the missing role.
        kind: RoleRefKind,
        /// Namespace of the missing role; empty for cluster roles.
        namespace: String,
        /// Name of the missing role.
        name: String,
        /// Binding holding the dangling reference, namespace-qualified.
        binding: String,
    },

    /// The caller is not allowed to perform the operation.
    #[error("{principal} may not {verb} {resource} in {scope}")]
    PermissionDenied {
        /// Caller's user name.
        principal: String,
        /// Requested verb.
        verb: String,
        /// Requested resource (with name, when given).
        resource: String,
        /// Namespace, or "cluster scope".
        scope: String,
    },

    /// The decision could not be made.
    #[error("authorization failed: {message}")]
    Internal {
        /// What the engine was doing.
        message: String,
        /// Store failure behind the error, if any.
        #[source]
        source: Option<StoreError>,
    },
}

impl AuthzError {
    /// Create a role not found error.
    pub fn role_not_found(
        kind: RoleRefKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
        binding: impl Into<String>,
    ) -> Self {
        Self::RoleNotFound {
            kind,
            namespace: namespace.into(),
            name: name.into(),
            binding: binding.into(),
        }
    }

    /// Create a permission denied error for a refused request.
    pub fn permission_denied(attrs: &Attributes) -> Self {
        let resource = if attrs.resource_name().is_empty() {
            attrs.resource().to_string()
        } else {
            format!("{}/{}", attrs.resource(), attrs.resource_name())
        };
        let scope = if attrs.namespace().is_empty() {
            "cluster scope".to_string()
        } else {
            format!("namespace '{}'", attrs.namespace())
        };
        Self::PermissionDenied {
            principal: attrs.principal().name().to_string(),
            verb: attrs.verb().to_string(),
            resource,
            scope,
        }
    }

    /// Create an internal error caused by a store failure.
    pub fn store(context: impl Into<String>, source: StoreError) -> Self {
        Self::Internal {
            message: format!("{}: {source}", context.into()),
            source: Some(source),
        }
    }

    /// Create an internal error for an expired decision deadline.
    pub fn deadline_exceeded(limit: Duration) -> Self {
        Self::Internal {
            message: format!("decision deadline of {}ms exceeded", limit.as_millis()),
            source: None,
        }
    }

    /// Check if this is a role not found error.
    pub const fn is_role_not_found(&self) -> bool {
        matches!(self, Self::RoleNotFound { .. })
    }

    /// Check if this is an internal error.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Check if the caller may reasonably retry. Only an unreachable store
    /// qualifies; the engine itself never retries.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Internal {
                source: Some(StoreError::Unavailable(_)),
                ..
            }
        )
    }

    /// Returns the error category.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::RoleNotFound { .. } => ErrorCategory::RoleNotFound,
            Self::PermissionDenied { .. } => ErrorCategory::PermissionDenied,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Converts into the transport-facing error type.
    pub fn into_api_error(self) -> VigilError {
        match self {
            Self::RoleNotFound {
                kind,
                namespace,
                name,
                ..
            } => VigilError::role_not_found(kind.as_str(), qualified(&namespace, &name)),
            err @ Self::PermissionDenied { .. } => VigilError::permission_denied(err.to_string()),
            Self::Internal {
                message,
                source: Some(source),
            } => VigilError::internal_with_source(message, source),
            Self::Internal {
                message,
                source: None,
            } => VigilError::internal(message),
        }
    }
}

impl From<AuthzError> for VigilError {
    fn from(err: AuthzError) -> Self {
        err.into_api_error()
    }
}

/// Maps a decision to the HTTP status the transport should answer with.
///
/// | Decision | Status |
/// |----------|--------|
/// | `Ok(true)` | 200 |
/// | `Ok(false)` | 403 |
/// | `Err(RoleNotFound)` | 403 |
/// | `Err(Internal)` | 500 |
pub fn decision_status(decision: &AuthzResult<bool>) -> StatusCode {
    match decision {
        Ok(true) => StatusCode::OK,
        Ok(false) => StatusCode::FORBIDDEN,
        Err(err) => err.status_code(),
    }
}
