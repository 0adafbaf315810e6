//! The RBAC decision engine.
//!
//! A decision runs in two phases:
//!
//! 1. **Cluster phase.** Every cluster role binding naming the caller is
//!    resolved to its cluster role, whose rules are matched against the
//!    request.
//! 2. **Namespace phase.** Only when the cluster phase found nothing and the
//!    request targets a namespace: the same procedure over the role bindings
//!    of that namespace. A role binding may reference a role of its own
//!    namespace or a cluster role.
//!
//! The first matching rule allows the request. Nothing matching is a plain
//! negative decision, not an error. Store errors end the decision at once;
//! a binding that could not be resolved is never skipped.
//!
//! Namespaced bindings are only ever loaded for the namespace the request
//! targets, so they cannot grant anything outside it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};
use vigil_core::{ObjectMeta, Principal, RoleBinding, RoleRef, RoleRefKind, Rule};
use vigil_telemetry::metrics::record_authz_decision;

use crate::attributes::Attributes;
use crate::config::AuthorizerConfig;
use crate::error::{AuthzError, AuthzResult, StoreError};
use crate::matcher::{matches_principal, role_allows};
use crate::store::RbacStore;

/// The binding and role that allowed a request.
#[derive(Debug)]
struct Grant {
    binding: String,
    role: String,
}

/// Decides whether a caller may perform an operation.
///
/// Holds no per-request state; clones share the store and may be used from
/// any number of tasks at once.
#[derive(Clone)]
pub struct Authorizer {
    store: Arc<dyn RbacStore>,
    config: AuthorizerConfig,
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Authorizer {
    /// Create an authorizer reading from `store`.
    pub fn new(store: Arc<dyn RbacStore>, config: AuthorizerConfig) -> Self {
        Self { store, config }
    }

    /// Create an authorizer with default configuration.
    pub fn with_defaults(store: Arc<dyn RbacStore>) -> Self {
        Self::new(store, AuthorizerConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &AuthorizerConfig {
        &self.config
    }

    /// Decides whether the request described by `attrs` is allowed.
    ///
    /// Returns `Ok(false)` when no binding grants the request.
    ///
    /// # Errors
    ///
    /// - [`AuthzError::RoleNotFound`] if a binding naming the caller
    ///   references a role that does not exist
    /// - [`AuthzError::Internal`] if the store fails or the decision deadline
    ///   passes
    #[instrument(
        skip(self, attrs),
        fields(
            principal = %attrs.principal().name(),
            verb = %attrs.verb(),
            resource = %attrs.resource(),
            namespace = %attrs.namespace(),
        )
    )]
    pub async fn authorize(&self, attrs: &Attributes) -> AuthzResult<bool> {
        let start = Instant::now();
        let result = self.with_deadline(self.decide(attrs)).await;
        record_authz_decision(outcome(&result), start.elapsed());
        result
    }

    /// Like [`authorize`](Self::authorize), but a negative decision becomes
    /// [`AuthzError::PermissionDenied`].
    ///
    /// # Errors
    ///
    /// As [`authorize`](Self::authorize), plus `PermissionDenied` for a
    /// negative decision.
    pub async fn enforce(&self, attrs: &Attributes) -> AuthzResult<()> {
        if self.authorize(attrs).await? {
            Ok(())
        } else {
            Err(AuthzError::permission_denied(attrs))
        }
    }

    /// Returns true if some role binding in `namespace` names the principal
    /// and resolves to a role that grants at least one verb on at least one
    /// resource.
    ///
    /// Resolution failures are reported exactly as in
    /// [`authorize`](Self::authorize).
    #[instrument(skip(self, principal), fields(principal = %principal.name()))]
    pub async fn has_namespace_grant(
        &self,
        principal: &Principal,
        namespace: &str,
    ) -> AuthzResult<bool> {
        self.with_deadline(self.implicit_grant(principal, namespace))
            .await
    }

    async fn decide(&self, attrs: &Attributes) -> AuthzResult<bool> {
        if let Some(grant) = self.cluster_phase(attrs).await? {
            debug!(binding = %grant.binding, role = %grant.role, "allowed by cluster role binding");
            return Ok(true);
        }

        if !attrs.namespace().is_empty() {
            if let Some(grant) = self.namespace_phase(attrs).await? {
                debug!(binding = %grant.binding, role = %grant.role, "allowed by role binding");
                return Ok(true);
            }
        }

        debug!("no binding grants the request");
        Ok(false)
    }

    async fn implicit_grant(&self, principal: &Principal, namespace: &str) -> AuthzResult<bool> {
        let bindings = self.namespace_bindings(namespace).await?;
        for binding in bindings
            .iter()
            .filter(|b| matches_principal(principal, &b.subjects))
        {
            let rules = self
                .resolve_rules(&binding.metadata, &binding.role_ref)
                .await?;
            if rules.iter().any(Rule::grants_anything) {
                debug!(
                    binding = %binding.metadata.name,
                    role = %binding.role_ref.name,
                    "namespace grant found"
                );
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn cluster_phase(&self, attrs: &Attributes) -> AuthzResult<Option<Grant>> {
        let bindings = self
            .store
            .list_cluster_role_bindings()
            .await
            .map_err(|e| store_failure("listing cluster role bindings", e))?;

        for binding in bindings
            .iter()
            .filter(|b| matches_principal(attrs.principal(), &b.subjects))
        {
            // Cluster role bindings always resolve to a cluster role.
            let role_ref = RoleRef::cluster_role(&binding.role_ref.name);
            let rules = self.resolve_rules(&binding.metadata, &role_ref).await?;
            if role_allows(attrs, &rules, self.config.resource_name_policy) {
                return Ok(Some(Grant {
                    binding: binding.metadata.name.clone(),
                    role: role_ref.name,
                }));
            }
        }

        Ok(None)
    }

    async fn namespace_phase(&self, attrs: &Attributes) -> AuthzResult<Option<Grant>> {
        let bindings = self.namespace_bindings(attrs.namespace()).await?;

        for binding in bindings
            .iter()
            .filter(|b| matches_principal(attrs.principal(), &b.subjects))
        {
            let rules = self
                .resolve_rules(&binding.metadata, &binding.role_ref)
                .await?;
            if role_allows(attrs, &rules, self.config.resource_name_policy) {
                return Ok(Some(Grant {
                    binding: format!("{}/{}", binding.metadata.namespace, binding.metadata.name),
                    role: binding.role_ref.name.clone(),
                }));
            }
        }

        Ok(None)
    }

    async fn namespace_bindings(&self, namespace: &str) -> AuthzResult<Vec<RoleBinding>> {
        let mut bindings = self
            .store
            .list_role_bindings(namespace)
            .await
            .map_err(|e| store_failure("listing role bindings", e))?;
        // Bindings from any other namespace must not take part in the decision.
        bindings.retain(|b| b.metadata.namespace == namespace);
        Ok(bindings)
    }

    /// Fetches the rules of the role `role_ref` points at, on behalf of the
    /// binding described by `binding`.
    async fn resolve_rules(
        &self,
        binding: &ObjectMeta,
        role_ref: &RoleRef,
    ) -> AuthzResult<Vec<Rule>> {
        let fetched = match role_ref.kind {
            RoleRefKind::Role => self
                .store
                .get_role(&binding.namespace, &role_ref.name)
                .await
                .map(|role| role.rules),
            RoleRefKind::ClusterRole => self
                .store
                .get_cluster_role(&role_ref.name)
                .await
                .map(|role| role.rules),
        };

        fetched.map_err(|err| match err {
            StoreError::NotFound {
                kind,
                namespace,
                name,
            } => {
                let binding = if binding.namespace.is_empty() {
                    binding.name.clone()
                } else {
                    format!("{}/{}", binding.namespace, binding.name)
                };
                warn!(
                    %binding,
                    role = %name,
                    kind = kind.as_str(),
                    "binding references a missing role"
                );
                AuthzError::role_not_found(kind, namespace, name, binding)
            }
            other => store_failure("resolving role", other),
        })
    }

    async fn with_deadline<T, F>(&self, decision: F) -> AuthzResult<T>
    where
        F: Future<Output = AuthzResult<T>>,
    {
        match self.config.decision_timeout {
            Some(limit) => match tokio::time::timeout(limit, decision).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(?limit, "decision deadline exceeded");
                    Err(AuthzError::deadline_exceeded(limit))
                }
            },
            None => decision.await,
        }
    }
}

fn store_failure(context: &str, err: StoreError) -> AuthzError {
    warn!(error = %err, "{context} failed");
    AuthzError::store(context, err)
}

fn outcome(result: &AuthzResult<bool>) -> &'static str {
    match result {
        Ok(true) => "allowed",
        Ok(false) => "denied",
        Err(AuthzError::RoleNotFound { .. }) => "role_not_found",
        Err(_) => "internal",
    }
}
