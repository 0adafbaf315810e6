//! The authorization question.
//!
//! An [`Attributes`] value says who wants to do what, and where. It is built
//! once per request and never mutated.
//!
//! The routing layer normally builds it with [`Attributes::from_request`]:
//!
//! | Method | Verb |
//! |--------|------|
//! | `POST` | `create` |
//! | `GET`, `HEAD` | `get`, or `list` when no name is present |
//! | `PUT`, `PATCH` | `update` |
//! | `DELETE` | `delete` |

use http::Method;
use vigil_core::{Principal, VigilError, VigilResult};

/// Path prefix of every API route.
const API_PREFIX: &str = "api";

/// One authorization question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    principal: Principal,
    api_group: String,
    api_version: String,
    namespace: String,
    resource: String,
    resource_name: String,
    verb: String,
}

impl Attributes {
    /// Starts building attributes for `principal`.
    ///
    /// # Example
    ///
    /// ```
    /// use vigil_authz::Attributes;
    /// use vigil_core::Principal;
    ///
    /// let attrs = Attributes::builder(Principal::new("alice"))
    ///     .namespace("default")
    ///     .resource("checks")
    ///     .verb("list")
    ///     .build();
    ///
    /// assert_eq!(attrs.resource(), "checks");
    /// assert!(attrs.resource_name().is_empty());
    /// ```
    pub fn builder(principal: Principal) -> AttributesBuilder {
        AttributesBuilder {
            attrs: Self {
                principal,
                api_group: String::new(),
                api_version: String::new(),
                namespace: String::new(),
                resource: String::new(),
                resource_name: String::new(),
                verb: String::new(),
            },
        }
    }

    /// Maps an inbound request onto attributes.
    ///
    /// `path` has the shape
    /// `/api/{group}/{version}[/namespaces/{namespace}]/{resource}[/{name}]`;
    /// a query string is ignored.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unsupported method or a path that
    /// does not have that shape.
    pub fn from_request(method: &Method, path: &str, principal: Principal) -> VigilResult<Self> {
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let [prefix, group, version, rest @ ..] = segments.as_slice() else {
            return Err(malformed(path));
        };
        if *prefix != API_PREFIX {
            return Err(malformed(path));
        }

        let (namespace, rest) = match rest {
            ["namespaces", namespace, rest @ ..] if !rest.is_empty() => (*namespace, rest),
            _ => ("", rest),
        };

        let (resource, name) = match rest {
            [resource] => (*resource, ""),
            [resource, name] => (*resource, *name),
            _ => return Err(malformed(path)),
        };

        let verb = verb_for_method(method, !name.is_empty()).ok_or_else(|| {
            VigilError::invalid_field("method", format!("{method} has no authorization verb"))
        })?;

        Ok(Self::builder(principal)
            .api_group(*group)
            .api_version(*version)
            .namespace(namespace)
            .resource(resource)
            .resource_name(name)
            .verb(verb)
            .build())
    }

    /// The caller.
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// API group of the resource.
    pub fn api_group(&self) -> &str {
        &self.api_group
    }

    /// API version of the resource.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Target namespace; empty for cluster-scoped operations.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resource type.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Named instance; empty for collection operations.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Requested verb.
    pub fn verb(&self) -> &str {
        &self.verb
    }
}

const ROUTE_SHAPE: &str = "/api/{group}/{version}[/namespaces/{namespace}]/{resource}[/{name}]";

fn malformed(path: &str) -> VigilError {
    VigilError::invalid_field("path", format!("'{path}' is not {ROUTE_SHAPE}"))
}

/// Builder for [`Attributes`]. Unset fields stay empty.
#[derive(Debug, Clone)]
pub struct AttributesBuilder {
    attrs: Attributes,
}

impl AttributesBuilder {
    /// Sets the API group.
    #[must_use]
    pub fn api_group(mut self, group: impl Into<String>) -> Self {
        self.attrs.api_group = group.into();
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.attrs.api_version = version.into();
        self
    }

    /// Sets the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.attrs.namespace = namespace.into();
        self
    }

    /// Sets the resource type.
    #[must_use]
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.attrs.resource = resource.into();
        self
    }

    /// Sets the resource name.
    #[must_use]
    pub fn resource_name(mut self, name: impl Into<String>) -> Self {
        self.attrs.resource_name = name.into();
        self
    }

    /// Sets the verb.
    #[must_use]
    pub fn verb(mut self, verb: impl Into<String>) -> Self {
        self.attrs.verb = verb.into();
        self
    }

    /// Builds the attributes.
    #[must_use]
    pub fn build(self) -> Attributes {
        self.attrs
    }
}

/// Returns the verb an HTTP method maps to, or `None` for methods that carry
/// no authorization meaning (`OPTIONS`, `TRACE`, ...).
pub fn verb_for_method(method: &Method, has_name: bool) -> Option<&'static str> {
    match *method {
        Method::POST => Some("create"),
        Method::GET | Method::HEAD if has_name => Some("get"),
        Method::GET | Method::HEAD => Some("list"),
        Method::PUT | Method::PATCH => Some("update"),
        Method::DELETE => Some("delete"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Principal {
        Principal::new("alice").with_groups(["ops"])
    }

    #[test]
    fn test_verb_for_method() {
        assert_eq!(verb_for_method(&Method::POST, false), Some("create"));
        assert_eq!(verb_for_method(&Method::GET, true), Some("get"));
        assert_eq!(verb_for_method(&Method::GET, false), Some("list"));
        assert_eq!(verb_for_method(&Method::HEAD, true), Some("get"));
        assert_eq!(verb_for_method(&Method::HEAD, false), Some("list"));
        assert_eq!(verb_for_method(&Method::PUT, true), Some("update"));
        assert_eq!(verb_for_method(&Method::PATCH, true), Some("update"));
        assert_eq!(verb_for_method(&Method::DELETE, true), Some("delete"));
        assert_eq!(verb_for_method(&Method::OPTIONS, false), None);
    }

    #[test]
    fn test_builder_defaults_to_empty() {
        let attrs = Attributes::builder(alice()).verb("list").build();
        assert_eq!(attrs.verb(), "list");
        assert!(attrs.namespace().is_empty());
        assert!(attrs.resource_name().is_empty());
        assert_eq!(attrs.principal().name(), "alice");
    }

    #[test]
    fn test_from_request_namespaced_named() {
        let path = "/api/core/v2/namespaces/dev/checks/disk";
        let attrs = Attributes::from_request(&Method::DELETE, path, alice()).unwrap();

        assert_eq!(attrs.api_group(), "core");
        assert_eq!(attrs.api_version(), "v2");
        assert_eq!(attrs.namespace(), "dev");
        assert_eq!(attrs.resource(), "checks");
        assert_eq!(attrs.resource_name(), "disk");
        assert_eq!(attrs.verb(), "delete");
    }

    #[test]
    fn test_from_request_namespaced_collection() {
        let path = "/api/core/v2/namespaces/dev/checks?limit=10";
        let attrs = Attributes::from_request(&Method::GET, path, alice()).unwrap();

        assert_eq!(attrs.namespace(), "dev");
        assert_eq!(attrs.resource(), "checks");
        assert_eq!(attrs.verb(), "list");
    }

    #[test]
    fn test_from_request_namespace_resource_itself() {
        let attrs =
            Attributes::from_request(&Method::GET, "/api/core/v2/namespaces", alice()).unwrap();
        assert!(attrs.namespace().is_empty());
        assert_eq!(attrs.resource(), "namespaces");
        assert_eq!(attrs.verb(), "list");

        let attrs =
            Attributes::from_request(&Method::GET, "/api/core/v2/namespaces/a", alice()).unwrap();
        assert!(attrs.namespace().is_empty());
        assert_eq!(attrs.resource(), "namespaces");
        assert_eq!(attrs.resource_name(), "a");
        assert_eq!(attrs.verb(), "get");
    }

    #[test]
    fn test_from_request_cluster_scoped() {
        let attrs =
            Attributes::from_request(&Method::POST, "/api/core/v2/clusterroles/", alice()).unwrap();
        assert!(attrs.namespace().is_empty());
        assert_eq!(attrs.resource(), "clusterroles");
        assert_eq!(attrs.verb(), "create");
    }

    #[test]
    fn test_from_request_rejects_malformed_paths() {
        for path in ["/", "/api/core", "/health/core/v2/checks", "/api/core/v2/a/b/c"] {
            let err = Attributes::from_request(&Method::GET, path, alice()).unwrap_err();
            assert!(err.to_string().contains("path"), "{path}");
        }
    }

    #[test]
    fn test_from_request_rejects_unmapped_method() {
        let err = Attributes::from_request(&Method::OPTIONS, "/api/core/v2/checks", alice())
            .unwrap_err();
        assert!(err.to_string().contains("method"));
    }
}
