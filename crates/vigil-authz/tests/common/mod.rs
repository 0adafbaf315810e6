//! Shared helpers for the integration tests.
//!
//! Each store here wraps a [`MemoryStore`] and changes one aspect of its
//! behavior.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use vigil_authz::{Attributes, Authorizer, MemoryStore, RbacStore, StoreError, StoreResult};
use vigil_core::fixtures::{self, RbacFixture};
use vigil_core::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};

/// Authorizer with default configuration over the records of `fixture`.
pub fn authorizer_for(fixture: &RbacFixture) -> Authorizer {
    let store = MemoryStore::from_fixture(fixture).unwrap();
    Authorizer::with_defaults(Arc::new(store))
}

/// A request by the fixture principal.
pub fn request(namespace: &str, verb: &str, resource: &str) -> Attributes {
    Attributes::builder(fixtures::principal())
        .api_group("core")
        .api_version("v2")
        .namespace(namespace)
        .resource(resource)
        .verb(verb)
        .build()
}

/// Fails every namespaced call with `error`; cluster calls go through.
pub struct NamespaceFailingStore {
    pub inner: MemoryStore,
    pub error: StoreError,
    /// Namespace whose calls fail. `None` fails all of them.
    pub only: Option<String>,
}

impl NamespaceFailingStore {
    pub fn new(inner: MemoryStore, error: StoreError) -> Self {
        Self {
            inner,
            error,
            only: None,
        }
    }

    pub fn only_in(mut self, namespace: &str) -> Self {
        self.only = Some(namespace.to_string());
        self
    }

    fn fails(&self, namespace: &str) -> bool {
        self.only.as_deref().map_or(true, |only| only == namespace)
    }
}

#[async_trait]
impl RbacStore for NamespaceFailingStore {
    async fn list_cluster_role_bindings(&self) -> StoreResult<Vec<ClusterRoleBinding>> {
        self.inner.list_cluster_role_bindings().await
    }

    async fn get_cluster_role(&self, name: &str) -> StoreResult<ClusterRole> {
        self.inner.get_cluster_role(name).await
    }

    async fn list_role_bindings(&self, namespace: &str) -> StoreResult<Vec<RoleBinding>> {
        if self.fails(namespace) {
            return Err(self.error.clone());
        }
        self.inner.list_role_bindings(namespace).await
    }

    async fn get_role(&self, namespace: &str, name: &str) -> StoreResult<Role> {
        if self.fails(namespace) {
            return Err(self.error.clone());
        }
        self.inner.get_role(namespace, name).await
    }
}

/// Fails every call with `Unavailable`.
pub struct UnavailableStore;

#[async_trait]
impl RbacStore for UnavailableStore {
    async fn list_cluster_role_bindings(&self) -> StoreResult<Vec<ClusterRoleBinding>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn get_cluster_role(&self, _name: &str) -> StoreResult<ClusterRole> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn list_role_bindings(&self, _namespace: &str) -> StoreResult<Vec<RoleBinding>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn get_role(&self, _namespace: &str, _name: &str) -> StoreResult<Role> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Delays every call by `delay`.
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

#[async_trait]
impl RbacStore for SlowStore {
    async fn list_cluster_role_bindings(&self) -> StoreResult<Vec<ClusterRoleBinding>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list_cluster_role_bindings().await
    }

    async fn get_cluster_role(&self, name: &str) -> StoreResult<ClusterRole> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_cluster_role(name).await
    }

    async fn list_role_bindings(&self, namespace: &str) -> StoreResult<Vec<RoleBinding>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list_role_bindings(namespace).await
    }

    async fn get_role(&self, namespace: &str, name: &str) -> StoreResult<Role> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_role(namespace, name).await
    }
}

/// Tracks how many namespaced listings are in flight at once.
pub struct ConcurrencyTracker {
    pub inner: MemoryStore,
    pub delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyTracker {
    pub fn new(inner: MemoryStore, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Highest number of simultaneous `list_role_bindings` calls seen.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RbacStore for ConcurrencyTracker {
    async fn list_cluster_role_bindings(&self) -> StoreResult<Vec<ClusterRoleBinding>> {
        self.inner.list_cluster_role_bindings().await
    }

    async fn get_cluster_role(&self, name: &str) -> StoreResult<ClusterRole> {
        self.inner.get_cluster_role(name).await
    }

    async fn list_role_bindings(&self, namespace: &str) -> StoreResult<Vec<RoleBinding>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.list_role_bindings(namespace).await
    }

    async fn get_role(&self, namespace: &str, name: &str) -> StoreResult<Role> {
        self.inner.get_role(namespace, name).await
    }
}
