//! Test fixtures for Vigil development and testing.
//!
//! Each function returns an [`RbacFixture`]: the full set of roles and
//! bindings a store would hold for one scenario. The namespace visibility
//! scenarios all evaluate the same six candidate namespaces
//! ([`candidate_namespaces`]) for the same caller ([`principal`]).
//!
//! # Example
//!
//! ```
//! use vigil_core::fixtures;
//!
//! let fixture = fixtures::cluster_admin_scenario();
//! assert_eq!(fixture.cluster_role_bindings.len(), 1);
//! assert_eq!(fixtures::candidate_namespaces().len(), 6);
//! ```

use crate::identity::Principal;
use crate::model::{
    ClusterRole, ClusterRoleBinding, Namespace, Role, RoleBinding, RoleRef, Rule, Subject,
};

/// User name of the fixture principal.
pub const USER: &str = "alice";

/// Group through which the fixture principal receives its bindings.
pub const GROUP: &str = "operators";

/// Namespace the fixture principal issues its requests from.
pub const HOME_NAMESPACE: &str = "default";

/// Roles and bindings making up one scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RbacFixture {
    /// Cluster roles.
    pub cluster_roles: Vec<ClusterRole>,
    /// Cluster role bindings.
    pub cluster_role_bindings: Vec<ClusterRoleBinding>,
    /// Namespaced roles.
    pub roles: Vec<Role>,
    /// Namespaced role bindings.
    pub role_bindings: Vec<RoleBinding>,
}

/// The caller used by every scenario: `alice`, member of `operators`.
#[must_use]
pub fn principal() -> Principal {
    Principal::new(USER).with_groups([GROUP])
}

/// Namespaces `a` through `f`, in name order.
#[must_use]
pub fn candidate_namespaces() -> Vec<Namespace> {
    ["a", "b", "c", "d", "e", "f"]
        .into_iter()
        .map(Namespace::new)
        .collect()
}

/// The caller's group is bound to a cluster role granting everything.
#[must_use]
pub fn cluster_admin_scenario() -> RbacFixture {
    RbacFixture {
        cluster_roles: vec![ClusterRole::new("cluster-admin", vec![Rule::wildcard()])],
        cluster_role_bindings: vec![ClusterRoleBinding::new(
            "cluster-admin",
            "cluster-admin",
            vec![Subject::group(GROUP)],
        )],
        ..RbacFixture::default()
    }
}

/// Bindings exist, but none reference the caller.
#[must_use]
pub fn no_bindings_scenario() -> RbacFixture {
    RbacFixture {
        cluster_roles: vec![ClusterRole::new("cluster-admin", vec![Rule::wildcard()])],
        cluster_role_bindings: vec![ClusterRoleBinding::new(
            "cluster-admin",
            "cluster-admin",
            vec![Subject::group("administrators"), Subject::user("root")],
        )],
        ..RbacFixture::default()
    }
}

/// The caller may `get` namespaces `a`, `c` and `e` by name, through a role in
/// its home namespace.
#[must_use]
pub fn named_namespaces_scenario() -> RbacFixture {
    RbacFixture {
        roles: vec![Role::new(
            HOME_NAMESPACE,
            "namespace-reader",
            vec![Rule::new(["get"], ["namespaces"]).with_resource_names(["a", "c", "e"])],
        )],
        role_bindings: vec![RoleBinding::new(
            HOME_NAMESPACE,
            "namespace-reader",
            RoleRef::role("namespace-reader"),
            vec![Subject::group(GROUP)],
        )],
        ..RbacFixture::default()
    }
}

/// The caller may manage checks inside namespace `a` and has no explicit
/// grant on namespaces at all.
#[must_use]
pub fn implicit_namespace_scenario() -> RbacFixture {
    RbacFixture {
        roles: vec![Role::new(
            "a",
            "check-operator",
            vec![Rule::new(["delete", "get"], ["checks"])],
        )],
        role_bindings: vec![RoleBinding::new(
            "a",
            "check-operator",
            RoleRef::role("check-operator"),
            vec![Subject::group(GROUP)],
        )],
        ..RbacFixture::default()
    }
}

/// The caller's group is bound to a cluster role that was never created.
#[must_use]
pub fn dangling_cluster_binding_scenario() -> RbacFixture {
    RbacFixture {
        cluster_role_bindings: vec![ClusterRoleBinding::new(
            "ghost",
            "does-not-exist",
            vec![Subject::group(GROUP)],
        )],
        ..RbacFixture::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_records_are_valid() {
        let fixtures = [
            cluster_admin_scenario(),
            no_bindings_scenario(),
            named_namespaces_scenario(),
            implicit_namespace_scenario(),
            dangling_cluster_binding_scenario(),
        ];
        for fixture in fixtures {
            for role in &fixture.cluster_roles {
                role.validate().unwrap();
            }
            for binding in &fixture.cluster_role_bindings {
                binding.validate().unwrap();
            }
            for role in &fixture.roles {
                role.validate().unwrap();
            }
            for binding in &fixture.role_bindings {
                binding.validate().unwrap();
            }
        }
    }

    #[test]
    fn test_candidates_in_name_order() {
        let names: Vec<String> = candidate_namespaces().into_iter().map(|n| n.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
