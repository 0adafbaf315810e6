//! Namespace visibility.
//!
//! Answers "which of these namespaces may the caller see?" for namespace
//! listings. A namespace is visible if either:
//!
//! - **explicit**: the caller may `get` the `namespaces` resource by that
//!   name, asked from the caller's context namespace, or
//! - **implicit**: some role binding inside the namespace grants the caller
//!   anything at all. A grant inside a namespace is useless if the namespace
//!   itself cannot be seen.
//!
//! Checks run concurrently, bounded by the configured limit. The result keeps
//! the order of the candidates. Nothing is cached between calls.

use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::instrument;
use vigil_core::{Namespace, Principal};
use vigil_telemetry::metrics::record_visible_namespaces;

use crate::attributes::Attributes;
use crate::authorizer::Authorizer;
use crate::error::AuthzResult;

/// Resource name of namespaces themselves.
pub const NAMESPACES_RESOURCE: &str = "namespaces";

/// Filters namespace listings down to what the caller may see.
#[derive(Debug, Clone)]
pub struct VisibilityFilter {
    authorizer: Authorizer,
    concurrency: usize,
}

impl VisibilityFilter {
    /// Create a filter over `authorizer`, using its configured fan-out limit.
    pub fn new(authorizer: Authorizer) -> Self {
        let concurrency = authorizer.config().visibility_concurrency.max(1);
        Self {
            authorizer,
            concurrency,
        }
    }

    /// Override the fan-out limit. Zero is raised to one.
    #[must_use]
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// Returns the candidates visible to `principal`, in input order.
    ///
    /// `context_namespace` is the namespace the caller works in, usually the
    /// one its session or client is scoped to. It is not taken from the
    /// listing route: `/api/core/v2/namespaces` carries no namespace. The
    /// explicit check for each candidate runs in it, so Roles bound there can
    /// grant `get` on namespaces. Empty means only cluster bindings count for
    /// the explicit check.
    ///
    /// # Errors
    ///
    /// Fails closed: if any check fails, the whole call fails with the error
    /// of the earliest failing candidate.
    #[instrument(
        skip_all,
        fields(
            principal = %principal.name(),
            namespace = %context_namespace,
            candidates = candidates.len(),
        )
    )]
    pub async fn visible_namespaces(
        &self,
        principal: &Principal,
        context_namespace: &str,
        candidates: Vec<Namespace>,
    ) -> AuthzResult<Vec<Namespace>> {
        let checked: Vec<(Namespace, bool)> = stream::iter(candidates)
            .map(|namespace| async move {
                self.is_visible(principal, context_namespace, &namespace.name)
                    .await
                    .map(|visible| (namespace, visible))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let visible: Vec<Namespace> = checked
            .into_iter()
            .filter_map(|(namespace, visible)| visible.then_some(namespace))
            .collect();

        tracing::debug!(visible = visible.len(), "namespace visibility resolved");
        record_visible_namespaces(visible.len());
        Ok(visible)
    }

    /// Returns true if `principal` may see `namespace`.
    ///
    /// # Errors
    ///
    /// Propagates the authorizer's errors.
    pub async fn is_visible(
        &self,
        principal: &Principal,
        context_namespace: &str,
        namespace: &str,
    ) -> AuthzResult<bool> {
        let lookup = Attributes::builder(principal.clone())
            .namespace(context_namespace)
            .resource(NAMESPACES_RESOURCE)
            .resource_name(namespace)
            .verb("get")
            .build();
        if self.authorizer.authorize(&lookup).await? {
            return Ok(true);
        }
        self.authorizer.has_namespace_grant(principal, namespace).await
    }
}
