//! Vigil Authorization - RBAC decision engine
//!
//! This crate decides whether a caller may perform an operation, based on
//! roles and bindings held in an external store, and filters namespace
//! listings down to what the caller may see.
//!
//! # Overview
//!
//! - [`Attributes`] describe one request: who, what verb, which resource,
//!   where.
//! - [`Authorizer`] evaluates cluster role bindings first, then the role
//!   bindings of the request's namespace. Anything not granted is denied.
//! - [`VisibilityFilter`] keeps the namespaces the caller may `get`
//!   explicitly, or holds any grant inside.
//! - [`RbacStore`] is the read-only store collaborator; [`MemoryStore`] is an
//!   in-process implementation.
//!
//! # Architecture
//!
//! ```text
//!      Attributes          ┌────────────────────────────┐
//!          │               │   Authorizer               │
//!          ▼               │   cluster phase            │
//!   ┌──────────────┐       │   namespace phase          │
//!   │ Visibility   │──────▶│                            │
//!   │ Filter       │       └──────────┬─────────────────┘
//!   └──────────────┘                  │ list / get
//!                          ┌──────────▼─────────────────┐
//!                          │   RbacStore                │
//!                          │   (roles + bindings)       │
//!                          └────────────────────────────┘
//! ```
//!
//! Every decision reads the store afresh. Nothing is cached.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use vigil_authz::{Attributes, Authorizer, MemoryStore};
//! use vigil_core::fixtures;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::from_fixture(&fixtures::cluster_admin_scenario())?;
//! let authorizer = Authorizer::with_defaults(Arc::new(store));
//!
//! let attrs = Attributes::builder(fixtures::principal())
//!     .namespace("dev")
//!     .resource("checks")
//!     .verb("delete")
//!     .build();
//!
//! assert!(authorizer.authorize(&attrs).await?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod attributes;
pub mod authorizer;
pub mod config;
pub mod error;
pub mod matcher;
pub mod memory;
pub mod store;
pub mod visibility;

// Re-exports for convenience
pub use attributes::{verb_for_method, Attributes, AttributesBuilder};
pub use authorizer::Authorizer;
pub use config::{AuthorizerConfig, ResourceNamePolicy};
pub use error::{decision_status, AuthzError, AuthzResult, StoreError, StoreResult};
pub use memory::{MemoryStore, StoreStats};
pub use store::RbacStore;
pub use visibility::VisibilityFilter;
