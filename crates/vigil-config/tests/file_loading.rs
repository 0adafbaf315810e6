//! Loading configuration files from disk.

use std::io::Write;

use tempfile::NamedTempFile;
use vigil_config::{ConfigError, ConfigLoader, LogFormat, ResourceNamePolicy};

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// A complete TOML file populates every section.
#[test]
fn test_complete_toml_file() {
    let file = write_temp(
        ".toml",
        r#"
            [telemetry]
            service_name = "vigil-backend"
            environment = "staging"

            [telemetry.metrics]
            enabled = true
            addr = "127.0.0.1:9191"

            [telemetry.logging]
            enabled = true
            level = "vigil_authz=debug,info"
            format = "pretty"
            include_location = true

            [authorization]
            resource_name_policy = "restrictive"
            visibility_concurrency = 4
            decision_timeout_ms = 500
        "#,
    );

    let config = ConfigLoader::new()
        .with_file(file.path())
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(config.telemetry.service_name, "vigil-backend");
    assert_eq!(config.telemetry.metrics.addr, "127.0.0.1:9191");
    assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    assert_eq!(
        config.authorization.resource_name_policy,
        ResourceNamePolicy::Restrictive
    );
    assert_eq!(config.authorization.visibility_concurrency, 4);
    assert_eq!(config.authorization.decision_timeout_ms, Some(500));
}

/// JSON files are selected by extension.
#[test]
fn test_json_file() {
    let file = write_temp(
        ".json",
        r#"{
            "authorization": {"resource_name_policy": "unrestricted", "visibility_concurrency": 1}
        }"#,
    );

    let config = ConfigLoader::new()
        .with_file(file.path())
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(config.authorization.visibility_concurrency, 1);
}

/// Unknown keys in a file fail the load.
#[test]
fn test_unknown_field_in_file() {
    let file = write_temp(
        ".toml",
        r#"
            [authorization]
            mode = "allow_all"
        "#,
    );

    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

/// Files with other extensions are refused.
#[test]
fn test_unsupported_extension() {
    let file = write_temp(".yaml", "authorization: {}\n");

    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
}

/// An existing optional file is loaded like a required one.
#[test]
fn test_optional_file_present() {
    let file = write_temp(
        ".toml",
        r#"
            [telemetry]
            service_name = "from-file"
        "#,
    );

    let config = ConfigLoader::new()
        .with_optional_file(file.path())
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(config.telemetry.service_name, "from-file");
}
