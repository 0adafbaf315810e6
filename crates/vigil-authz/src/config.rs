//! Configuration for the decision engine.

use std::time::Duration;

use vigil_config::AuthorizationConfig;

pub use vigil_config::ResourceNamePolicy;

/// Runtime configuration for an [`Authorizer`](crate::Authorizer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizerConfig {
    /// How rules without `resource_names` treat named requests.
    pub resource_name_policy: ResourceNamePolicy,
    /// Deadline for one decision. `None` waits for the store indefinitely.
    pub decision_timeout: Option<Duration>,
    /// Maximum concurrent per-namespace checks in a visibility listing.
    pub visibility_concurrency: usize,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            resource_name_policy: ResourceNamePolicy::default(),
            decision_timeout: None,
            visibility_concurrency: 16,
        }
    }
}

impl AuthorizerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resource name policy.
    pub fn with_resource_name_policy(mut self, policy: ResourceNamePolicy) -> Self {
        self.resource_name_policy = policy;
        self
    }

    /// Set the decision deadline.
    pub fn with_decision_timeout(mut self, timeout: Duration) -> Self {
        self.decision_timeout = Some(timeout);
        self
    }

    /// Set the visibility fan-out limit. Zero is raised to one.
    pub fn with_visibility_concurrency(mut self, limit: usize) -> Self {
        self.visibility_concurrency = limit.max(1);
        self
    }

    /// Create a production configuration.
    ///
    /// Keeps the unrestricted name policy so wildcard rules still cover
    /// named operations and adds a one second decision deadline.
    pub fn production() -> Self {
        Self {
            resource_name_policy: ResourceNamePolicy::Unrestricted,
            decision_timeout: Some(Duration::from_secs(1)),
            visibility_concurrency: 16,
        }
    }

    /// Create a development configuration.
    pub fn development() -> Self {
        Self {
            resource_name_policy: ResourceNamePolicy::Unrestricted,
            decision_timeout: None,
            visibility_concurrency: 4,
        }
    }
}

impl From<&AuthorizationConfig> for AuthorizerConfig {
    fn from(config: &AuthorizationConfig) -> Self {
        Self {
            resource_name_policy: config.resource_name_policy,
            decision_timeout: config.decision_timeout(),
            visibility_concurrency: config.visibility_concurrency.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthorizerConfig::default();
        assert_eq!(config.resource_name_policy, ResourceNamePolicy::Unrestricted);
        assert!(config.decision_timeout.is_none());
        assert_eq!(config.visibility_concurrency, 16);
    }

    #[test]
    fn test_builder_pattern() {
        let config = AuthorizerConfig::new()
            .with_resource_name_policy(ResourceNamePolicy::Restrictive)
            .with_decision_timeout(Duration::from_millis(200))
            .with_visibility_concurrency(0);

        assert_eq!(config.resource_name_policy, ResourceNamePolicy::Restrictive);
        assert_eq!(config.decision_timeout, Some(Duration::from_millis(200)));
        assert_eq!(config.visibility_concurrency, 1);
    }

    #[test]
    fn test_presets() {
        let prod = AuthorizerConfig::production();
        assert_eq!(prod.resource_name_policy, ResourceNamePolicy::Unrestricted);
        assert_eq!(prod.decision_timeout, Some(Duration::from_secs(1)));
        assert!(AuthorizerConfig::development().decision_timeout.is_none());
    }

    #[test]
    fn test_from_authorization_config() {
        let section = AuthorizationConfig {
            resource_name_policy: ResourceNamePolicy::Restrictive,
            visibility_concurrency: 8,
            decision_timeout_ms: Some(750),
        };

        let config = AuthorizerConfig::from(&section);
        assert_eq!(config.resource_name_policy, ResourceNamePolicy::Restrictive);
        assert_eq!(config.visibility_concurrency, 8);
        assert_eq!(config.decision_timeout, Some(Duration::from_millis(750)));
    }
}
