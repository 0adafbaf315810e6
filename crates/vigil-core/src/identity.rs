//! Caller identity.
//!
//! A [`Principal`] is produced by the credential layer once per request and is
//! never mutated afterwards. Authorization only ever reads it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The authenticated caller: a user name plus group memberships.
///
/// Groups are kept in a sorted set so that two principals with the same
/// memberships compare and serialize identically.
///
/// # Example
///
/// ```rust
/// use vigil_core::Principal;
///
/// let alice = Principal::new("alice").with_groups(["ops", "oncall"]);
/// assert!(alice.in_group("ops"));
/// assert!(!alice.in_group("op"));
/// println!("Request from: {}", alice.log_id());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    name: String,
    #[serde(default)]
    groups: BTreeSet<String>,
}

impl Principal {
    /// Creates a principal with no group memberships.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: BTreeSet::new(),
        }
    }

    /// Adds group memberships.
    #[must_use]
    pub fn with_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// The user name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group memberships, in sorted order.
    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Returns true if the principal belongs to exactly this group.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// Returns a string identifier suitable for logging.
    ///
    /// Group names are omitted; they can be long and are available from
    /// [`Principal::groups`] when needed.
    pub fn log_id(&self) -> String {
        format!("user:{}", self.name)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_id() {
        let principal = Principal::new("alice");
        assert_eq!(principal.log_id(), "user:alice");
    }

    #[test]
    fn test_group_membership_is_exact() {
        let principal = Principal::new("bob").with_groups(["administrators"]);
        assert!(principal.in_group("administrators"));
        assert!(!principal.in_group("admins"));
        assert!(!principal.in_group("admin"));
    }

    #[test]
    fn test_groups_are_sorted_and_deduplicated() {
        let principal = Principal::new("carol").with_groups(["x", "admins", "x"]);
        let groups: Vec<&str> = principal.groups().iter().map(String::as_str).collect();
        assert_eq!(groups, vec!["admins", "x"]);
    }

    #[test]
    fn test_serialization() {
        let principal = Principal::new("dave").with_groups(["ops"]);
        let json = serde_json::to_string(&principal).expect("serialization should work");
        assert_eq!(json, r#"{"name":"dave","groups":["ops"]}"#);

        let parsed: Principal = serde_json::from_str(r#"{"name":"dave"}"#).unwrap();
        assert!(parsed.groups().is_empty());
    }
}
