//! Typed configuration for Vigil.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use vigil_config::ConfigLoader;
//!
//! # fn main() -> Result<(), vigil_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("vigil.toml")?
//!     .with_env_prefix("VIGIL")
//!     .load()?;
//!
//! println!("visibility concurrency: {}", config.authorization.visibility_concurrency);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [telemetry]
//! service_name = "vigil-backend"
//! environment = "production"
//!
//! [telemetry.metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//!
//! [authorization]
//! resource_name_policy = "unrestricted"
//! visibility_concurrency = 16
//! decision_timeout_ms = 500
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables of the form `PREFIX__SECTION__KEY`:
//!
//! - `VIGIL__TELEMETRY__LOGGING__LEVEL=debug`
//! - `VIGIL__AUTHORIZATION__RESOURCE_NAME_POLICY=restrictive`
//! - `VIGIL__AUTHORIZATION__DECISION_TIMEOUT_MS=none`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{VigilConfig, VigilConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
