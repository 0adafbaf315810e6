//! Subject and rule matching.
//!
//! Pure predicates; nothing here touches the store. A rule's clauses are
//! combined with AND, a role's rules with OR.

use vigil_core::{Principal, Rule, Subject, SubjectKind, WILDCARD};

use crate::attributes::Attributes;
use crate::config::ResourceNamePolicy;

/// Returns true if `subject` refers to `principal`.
///
/// Users match on the exact name, groups on exact membership. There is no
/// prefix or pattern matching.
pub fn subject_matches(principal: &Principal, subject: &Subject) -> bool {
    match subject.kind {
        SubjectKind::User => subject.name == principal.name(),
        SubjectKind::Group => principal.in_group(&subject.name),
    }
}

/// Returns true if any of `subjects` refers to `principal`.
pub fn matches_principal(principal: &Principal, subjects: &[Subject]) -> bool {
    subjects.iter().any(|s| subject_matches(principal, s))
}

/// Returns true if the rule grants `verb`.
pub fn verb_matches(rule: &Rule, verb: &str) -> bool {
    rule.verbs.iter().any(|v| v == WILDCARD || v == verb)
}

/// Returns true if the rule grants access to `resource`.
pub fn resource_matches(rule: &Rule, resource: &str) -> bool {
    rule.resources.iter().any(|r| r == WILDCARD || r == resource)
}

/// Returns true if the rule covers the named instance `name`.
///
/// An empty `name` (a collection operation) is always covered. A listed name
/// is always covered. Whether a rule without `resource_names` covers a named
/// instance is decided by `policy`.
pub fn resource_name_matches(rule: &Rule, name: &str, policy: ResourceNamePolicy) -> bool {
    if name.is_empty() {
        return true;
    }
    if rule.resource_names.is_empty() && policy == ResourceNamePolicy::Unrestricted {
        return true;
    }
    rule.resource_names.iter().any(|n| n == name)
}

/// Returns true if the rule allows the operation described by `attrs`.
pub fn rule_allows(attrs: &Attributes, rule: &Rule, policy: ResourceNamePolicy) -> bool {
    verb_matches(rule, attrs.verb())
        && resource_matches(rule, attrs.resource())
        && resource_name_matches(rule, attrs.resource_name(), policy)
}

/// Returns true if any rule allows the operation. Stops at the first match.
pub fn role_allows(attrs: &Attributes, rules: &[Rule], policy: ResourceNamePolicy) -> bool {
    rules.iter().any(|rule| rule_allows(attrs, rule, policy))
}
