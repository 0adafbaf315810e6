//! # Vigil Core
//!
//! Core types shared by the Vigil control plane crates.
//!
//! This crate provides the foundational types used by the authorization engine
//! and the layers around it:
//!
//! - [`Principal`] - The authenticated caller (name + group memberships)
//! - [`Rule`], [`Role`], [`ClusterRole`] - Bundles of access grants
//! - [`RoleBinding`], [`ClusterRoleBinding`] - Who receives which role
//! - [`VigilError`] / [`ErrorCategory`] - The closed error taxonomy and its
//!   HTTP status mapping
//! - [`fixtures`] - Canned RBAC data sets used by tests across the workspace

#![doc(html_root_url = "https://docs.rs/vigil-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod fixtures;
mod identity;
pub mod model;

pub use error::{ErrorCategory, ErrorDetail, ErrorEnvelope, VigilError, VigilResult};
pub use identity::Principal;
pub use model::{
    ClusterRole, ClusterRoleBinding, Namespace, ObjectMeta, Role, RoleBinding, RoleRef,
    RoleRefKind, Rule, Subject, SubjectKind, WILDCARD,
};
