//! RBAC data model.
//!
//! Two tiers of records exist: cluster-scoped ([`ClusterRole`],
//! [`ClusterRoleBinding`]) and namespace-scoped ([`Role`], [`RoleBinding`]).
//! A binding's subjects decide *who*; the rules of the role it references
//! decide *what*. Roles hold no back-pointer to their bindings, lookup is by
//! name only.
//!
//! Field names serialize in camelCase (`roleRef`, `resourceNames`) so records
//! round-trip with the resource store's wire shape.

use serde::{Deserialize, Serialize};

use crate::error::{VigilError, VigilResult};

/// Wildcard sentinel matching any verb or resource.
pub const WILDCARD: &str = "*";

/// Name and (optional) namespace of a stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Record name.
    pub name: String,
    /// Owning namespace; empty for cluster-scoped records.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl ObjectMeta {
    /// Metadata for a cluster-scoped record.
    pub fn cluster(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
        }
    }

    /// Metadata for a namespaced record.
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    fn require_name(&self, kind: &str) -> VigilResult<()> {
        if self.name.is_empty() {
            return Err(VigilError::invalid_field(
                "metadata.name",
                format!("{kind} name must not be empty"),
            ));
        }
        Ok(())
    }

    fn require_namespace(&self, kind: &str) -> VigilResult<()> {
        if self.namespace.is_empty() {
            return Err(VigilError::invalid_field(
                "metadata.namespace",
                format!("{kind} must belong to a namespace"),
            ));
        }
        Ok(())
    }
}

/// A grant of verbs over resources, optionally restricted to named instances.
///
/// An empty `verbs` or `resources` list matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Granted verbs, or [`WILDCARD`].
    #[serde(default)]
    pub verbs: Vec<String>,
    /// Granted resource types, or [`WILDCARD`].
    #[serde(default)]
    pub resources: Vec<String>,
    /// Named instances the rule is restricted to.
    #[serde(default)]
    pub resource_names: Vec<String>,
}

impl Rule {
    /// Creates a rule with no name restriction.
    pub fn new<V, R>(verbs: V, resources: R) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            verbs: verbs.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
            resource_names: Vec::new(),
        }
    }

    /// Restricts the rule to the given resource names.
    #[must_use]
    pub fn with_resource_names<N>(mut self, names: N) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
    {
        self.resource_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// A rule granting every verb on every resource.
    pub fn wildcard() -> Self {
        Self::new([WILDCARD], [WILDCARD])
    }

    /// Returns true if the rule grants every verb on every resource without a
    /// name restriction.
    pub fn is_wildcard(&self) -> bool {
        self.verbs.iter().any(|v| v == WILDCARD)
            && self.resources.iter().any(|r| r == WILDCARD)
            && self.resource_names.is_empty()
    }

    /// Returns true if the rule could ever match an operation.
    pub fn grants_anything(&self) -> bool {
        !self.verbs.is_empty() && !self.resources.is_empty()
    }

    /// Validates the rule.
    ///
    /// # Errors
    ///
    /// Fails when `verbs` or `resources` is empty, or any entry is blank.
    pub fn validate(&self) -> VigilResult<()> {
        if self.verbs.is_empty() {
            return Err(VigilError::invalid_field("verbs", "must not be empty"));
        }
        if self.resources.is_empty() {
            return Err(VigilError::invalid_field("resources", "must not be empty"));
        }
        let blank = |values: &[String]| values.iter().any(|v| v.trim().is_empty());
        if blank(&self.verbs) || blank(&self.resources) || blank(&self.resource_names) {
            return Err(VigilError::validation("rule entries must not be blank"));
        }
        Ok(())
    }
}

fn validate_rules(rules: &[Rule]) -> VigilResult<()> {
    for (i, rule) in rules.iter().enumerate() {
        rule.validate().map_err(|e| match e {
            VigilError::Validation {
                field: Some(field),
                message,
            } => VigilError::Validation {
                message: format!("rules[{i}].{message}"),
                field: Some(format!("rules[{i}].{field}")),
            },
            other => other,
        })?;
    }
    Ok(())
}

/// A namespace-scoped bundle of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Name and namespace.
    pub metadata: ObjectMeta,
    /// Granted rules.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Role {
    /// Creates a role in `namespace`.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            metadata: ObjectMeta::namespaced(namespace, name),
            rules,
        }
    }

    /// Validates the role.
    pub fn validate(&self) -> VigilResult<()> {
        self.metadata.require_name("role")?;
        self.metadata.require_namespace("role")?;
        validate_rules(&self.rules)
    }
}

/// A cluster-scoped bundle of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRole {
    /// Name; the namespace is always empty.
    pub metadata: ObjectMeta,
    /// Granted rules.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl ClusterRole {
    /// Creates a cluster role.
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            metadata: ObjectMeta::cluster(name),
            rules,
        }
    }

    /// Validates the cluster role.
    pub fn validate(&self) -> VigilResult<()> {
        self.metadata.require_name("cluster role")?;
        if !self.metadata.namespace.is_empty() {
            return Err(VigilError::invalid_field(
                "metadata.namespace",
                "cluster roles are not namespaced",
            ));
        }
        validate_rules(&self.rules)
    }
}

/// Kind of a binding subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    /// Matches a principal by user name.
    User,
    /// Matches a principal by group membership.
    Group,
}

/// A user or group referenced by a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// User or group.
    pub kind: SubjectKind,
    /// User or group name.
    pub name: String,
}

impl Subject {
    /// A user subject.
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::User,
            name: name.into(),
        }
    }

    /// A group subject.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::Group,
            name: name.into(),
        }
    }
}

/// Kind of role a binding references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleRefKind {
    /// A role in the binding's own namespace.
    Role,
    /// A cluster-wide role.
    ClusterRole,
}

impl RoleRefKind {
    /// The kind's name as written in records and error messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "Role",
            Self::ClusterRole => "ClusterRole",
        }
    }
}

/// Reference from a binding to a role, by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleRef {
    /// Role or cluster role.
    pub kind: RoleRefKind,
    /// Referenced role name.
    pub name: String,
}

impl RoleRef {
    /// Reference to a namespaced role.
    pub fn role(name: impl Into<String>) -> Self {
        Self {
            kind: RoleRefKind::Role,
            name: name.into(),
        }
    }

    /// Reference to a cluster role.
    pub fn cluster_role(name: impl Into<String>) -> Self {
        Self {
            kind: RoleRefKind::ClusterRole,
            name: name.into(),
        }
    }
}

/// Grants a role (or a cluster role, scoped down) inside one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBinding {
    /// Name and namespace.
    pub metadata: ObjectMeta,
    /// Who the binding applies to.
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// The role whose rules are granted.
    pub role_ref: RoleRef,
}

impl RoleBinding {
    /// Creates a role binding in `namespace`.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        role_ref: RoleRef,
        subjects: Vec<Subject>,
    ) -> Self {
        Self {
            metadata: ObjectMeta::namespaced(namespace, name),
            subjects,
            role_ref,
        }
    }

    /// Validates the binding.
    pub fn validate(&self) -> VigilResult<()> {
        self.metadata.require_name("role binding")?;
        self.metadata.require_namespace("role binding")?;
        validate_binding_refs(&self.subjects, &self.role_ref)
    }
}

/// Grants a cluster role across every namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBinding {
    /// Name; the namespace is always empty.
    pub metadata: ObjectMeta,
    /// Who the binding applies to.
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// The cluster role whose rules are granted.
    pub role_ref: RoleRef,
}

impl ClusterRoleBinding {
    /// Creates a cluster role binding to the cluster role `role`.
    pub fn new(name: impl Into<String>, role: impl Into<String>, subjects: Vec<Subject>) -> Self {
        Self {
            metadata: ObjectMeta::cluster(name),
            subjects,
            role_ref: RoleRef::cluster_role(role),
        }
    }

    /// Validates the binding.
    ///
    /// # Errors
    ///
    /// Fails when the role reference is not a cluster role.
    pub fn validate(&self) -> VigilResult<()> {
        self.metadata.require_name("cluster role binding")?;
        if self.role_ref.kind != RoleRefKind::ClusterRole {
            return Err(VigilError::invalid_field(
                "roleRef.kind",
                "cluster role bindings may only reference a ClusterRole",
            ));
        }
        validate_binding_refs(&self.subjects, &self.role_ref)
    }
}

fn validate_binding_refs(subjects: &[Subject], role_ref: &RoleRef) -> VigilResult<()> {
    if subjects.is_empty() {
        return Err(VigilError::invalid_field("subjects", "must not be empty"));
    }
    if subjects.iter().any(|s| s.name.is_empty()) {
        return Err(VigilError::invalid_field("subjects", "subject names must not be empty"));
    }
    if role_ref.name.is_empty() {
        return Err(VigilError::invalid_field("roleRef.name", "must not be empty"));
    }
    Ok(())
}

/// A partition of the system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace name.
    pub name: String,
}

impl Namespace {
    /// Creates a namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
