//! In-memory RBAC store.
//!
//! Backs tests and embedders that keep their RBAC records in process. Records
//! are validated on write; reads hand out owned copies so a decision never
//! observes a half-applied update.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use vigil_core::fixtures::RbacFixture;
use vigil_core::{ClusterRole, ClusterRoleBinding, Role, RoleBinding, VigilResult};

use crate::error::{StoreError, StoreResult};
use crate::store::RbacStore;

/// Read counters, one per store operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// `list_cluster_role_bindings` calls.
    pub cluster_binding_lists: u64,
    /// `get_cluster_role` calls.
    pub cluster_role_gets: u64,
    /// `list_role_bindings` calls.
    pub role_binding_lists: u64,
    /// `get_role` calls.
    pub role_gets: u64,
}

/// Thread-safe in-memory [`RbacStore`].
///
/// Each record type sits behind its own lock. No method holds more than one
/// lock at a time and no lock is held across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Cluster roles by name.
    cluster_roles: RwLock<BTreeMap<String, ClusterRole>>,
    /// Cluster role bindings by name.
    cluster_role_bindings: RwLock<BTreeMap<String, ClusterRoleBinding>>,
    /// Roles by namespace, then name.
    roles: RwLock<BTreeMap<String, BTreeMap<String, Role>>>,
    /// Role bindings by namespace, then name.
    role_bindings: RwLock<BTreeMap<String, BTreeMap<String, RoleBinding>>>,

    cluster_binding_lists: AtomicU64,
    cluster_role_gets: AtomicU64,
    role_binding_lists: AtomicU64,
    role_gets: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding every record of `fixture`.
    ///
    /// # Errors
    ///
    /// Returns the first validation error among the fixture's records.
    pub fn from_fixture(fixture: &RbacFixture) -> VigilResult<Self> {
        let store = Self::new();
        for role in &fixture.cluster_roles {
            store.put_cluster_role(role.clone())?;
        }
        for binding in &fixture.cluster_role_bindings {
            store.put_cluster_role_binding(binding.clone())?;
        }
        for role in &fixture.roles {
            store.put_role(role.clone())?;
        }
        for binding in &fixture.role_bindings {
            store.put_role_binding(binding.clone())?;
        }
        Ok(store)
    }

    /// Insert or replace a cluster role.
    pub fn put_cluster_role(&self, role: ClusterRole) -> VigilResult<()> {
        role.validate()?;
        self.cluster_roles
            .write()
            .insert(role.metadata.name.clone(), role);
        Ok(())
    }

    /// Insert or replace a cluster role binding.
    pub fn put_cluster_role_binding(&self, binding: ClusterRoleBinding) -> VigilResult<()> {
        binding.validate()?;
        self.cluster_role_bindings
            .write()
            .insert(binding.metadata.name.clone(), binding);
        Ok(())
    }

    /// Insert or replace a role.
    pub fn put_role(&self, role: Role) -> VigilResult<()> {
        role.validate()?;
        self.roles
            .write()
            .entry(role.metadata.namespace.clone())
            .or_default()
            .insert(role.metadata.name.clone(), role);
        Ok(())
    }

    /// Insert or replace a role binding.
    pub fn put_role_binding(&self, binding: RoleBinding) -> VigilResult<()> {
        binding.validate()?;
        self.role_bindings
            .write()
            .entry(binding.metadata.namespace.clone())
            .or_default()
            .insert(binding.metadata.name.clone(), binding);
        Ok(())
    }

    /// Remove a cluster role. Returns true if it existed.
    ///
    /// Bindings referencing it are left in place and become dangling.
    pub fn delete_cluster_role(&self, name: &str) -> bool {
        self.cluster_roles.write().remove(name).is_some()
    }

    /// Remove a cluster role binding. Returns true if it existed.
    pub fn delete_cluster_role_binding(&self, name: &str) -> bool {
        self.cluster_role_bindings.write().remove(name).is_some()
    }

    /// Remove a role. Returns true if it existed.
    pub fn delete_role(&self, namespace: &str, name: &str) -> bool {
        remove_nested(&mut self.roles.write(), namespace, name)
    }

    /// Remove a role binding. Returns true if it existed.
    pub fn delete_role_binding(&self, namespace: &str, name: &str) -> bool {
        remove_nested(&mut self.role_bindings.write(), namespace, name)
    }

    /// Read counters since creation.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            cluster_binding_lists: self.cluster_binding_lists.load(Ordering::Relaxed),
            cluster_role_gets: self.cluster_role_gets.load(Ordering::Relaxed),
            role_binding_lists: self.role_binding_lists.load(Ordering::Relaxed),
            role_gets: self.role_gets.load(Ordering::Relaxed),
        }
    }
}

fn remove_nested<T>(
    map: &mut BTreeMap<String, BTreeMap<String, T>>,
    namespace: &str,
    name: &str,
) -> bool {
    let Some(records) = map.get_mut(namespace) else {
        return false;
    };
    let removed = records.remove(name).is_some();
    if records.is_empty() {
        map.remove(namespace);
    }
    removed
}

#[async_trait]
impl RbacStore for MemoryStore {
    async fn list_cluster_role_bindings(&self) -> StoreResult<Vec<ClusterRoleBinding>> {
        self.cluster_binding_lists.fetch_add(1, Ordering::Relaxed);
        Ok(self.cluster_role_bindings.read().values().cloned().collect())
    }

    async fn get_cluster_role(&self, name: &str) -> StoreResult<ClusterRole> {
        self.cluster_role_gets.fetch_add(1, Ordering::Relaxed);
        self.cluster_roles
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::cluster_role_not_found(name))
    }

    async fn list_role_bindings(&self, namespace: &str) -> StoreResult<Vec<RoleBinding>> {
        self.role_binding_lists.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .role_bindings
            .read()
            .get(namespace)
            .map(|bindings| bindings.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_role(&self, namespace: &str, name: &str) -> StoreResult<Role> {
        self.role_gets.fetch_add(1, Ordering::Relaxed);
        self.roles
            .read()
            .get(namespace)
            .and_then(|roles| roles.get(name))
            .cloned()
            .ok_or_else(|| StoreError::role_not_found(namespace, name))
    }
}
