//! The store collaborator.
//!
//! Roles and bindings live in an external resource store. The engine reads
//! them through [`RbacStore`] on every decision and never writes. A missing
//! role must be reported as
//! [`StoreError::NotFound`](crate::StoreError::NotFound) so the engine can tell a
//! dangling reference apart from a store outage.

use async_trait::async_trait;
use vigil_core::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};

use crate::error::StoreResult;

/// Read access to RBAC records.
///
/// Implementations must be safe to call concurrently. Dropping a returned
/// future cancels the call.
#[async_trait]
pub trait RbacStore: Send + Sync {
    /// Lists every cluster role binding.
    async fn list_cluster_role_bindings(&self) -> StoreResult<Vec<ClusterRoleBinding>>;

    /// Fetches a cluster role by name.
    async fn get_cluster_role(&self, name: &str) -> StoreResult<ClusterRole>;

    /// Lists the role bindings of one namespace.
    async fn list_role_bindings(&self, namespace: &str) -> StoreResult<Vec<RoleBinding>>;

    /// Fetches a role by namespace and name.
    async fn get_role(&self, namespace: &str, name: &str) -> StoreResult<Role>;
}
