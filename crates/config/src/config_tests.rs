//! Unit tests for configuration building and loading

use crate::{CleanupConfig, CleanupConfigLoader, CleanupConfigOverrides, ConfigSource};
use scopekit_core::{Error, FailurePolicy};
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_defaults() {
    let config = CleanupConfig::default();
    assert_eq!(config.failure_policy, FailurePolicy::ContinueAndAggregate);
    assert!(config.automatic_cleanup);
    assert!(!config.log_each_callback);
}

#[test]
fn test_builder() {
    let config = CleanupConfig::builder()
        .with_failure_policy(FailurePolicy::FailFast)
        .with_automatic_cleanup(false)
        .with_callback_logging(true)
        .build();

    assert_eq!(config.failure_policy, FailurePolicy::FailFast);
    assert!(!config.automatic_cleanup);
    assert!(config.log_each_callback);
}

#[test]
fn test_apply_only_touches_set_fields() {
    let mut config = CleanupConfig::default();
    config.apply(&CleanupConfigOverrides {
        log_each_callback: Some(true),
        ..Default::default()
    });

    assert_eq!(config.failure_policy, FailurePolicy::ContinueAndAggregate);
    assert!(config.automatic_cleanup);
    assert!(config.log_each_callback);
}

#[test]
fn test_resolve_without_sources_is_default() {
    let resolved = CleanupConfigLoader::resolve(None, env(&[])).unwrap();
    assert_eq!(resolved.config, CleanupConfig::default());
    assert_eq!(resolved.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let resolved = CleanupConfigLoader::resolve(Some(path.as_path()), env(&[])).unwrap();
    assert_eq!(resolved.source, ConfigSource::Default);
}

#[test]
fn test_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"cleanup": {"failure_policy": "fail-fast", "automatic_cleanup": false}}"#,
    )
    .unwrap();

    let resolved = CleanupConfigLoader::resolve(Some(path.as_path()), env(&[])).unwrap();
    assert_eq!(resolved.config.failure_policy, FailurePolicy::FailFast);
    assert!(!resolved.config.automatic_cleanup);
    assert!(!resolved.config.log_each_callback);
    assert_eq!(resolved.source, ConfigSource::ConfigFile(path));
}

#[test]
fn test_file_without_cleanup_section_is_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"other_tool": {"verbose": true}}"#).unwrap();

    let resolved = CleanupConfigLoader::resolve(Some(path.as_path()), env(&[])).unwrap();
    assert_eq!(resolved.source, ConfigSource::Default);
}

#[test]
fn test_env_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"cleanup": {"failure_policy": "fail-fast", "log_each_callback": true}}"#,
    )
    .unwrap();

    let resolved = CleanupConfigLoader::resolve(
        Some(path.as_path()),
        env(&[("SCOPEKIT_FAILURE_POLICY", "continue")]),
    )
    .unwrap();

    assert_eq!(
        resolved.config.failure_policy,
        FailurePolicy::ContinueAndAggregate
    );
    // untouched by the environment, so the file value stands
    assert!(resolved.config.log_each_callback);
    assert!(matches!(
        resolved.source,
        ConfigSource::EnvironmentVariable(_)
    ));
}

#[test]
fn test_env_flags() {
    let resolved = CleanupConfigLoader::resolve(
        None,
        env(&[
            ("SCOPEKIT_AUTO_CLEANUP", "off"),
            ("SCOPEKIT_LOG_CALLBACKS", "1"),
        ]),
    )
    .unwrap();

    assert!(!resolved.config.automatic_cleanup);
    assert!(resolved.config.log_each_callback);
}

#[test]
fn test_invalid_env_policy_is_error() {
    let err =
        CleanupConfigLoader::resolve(None, env(&[("SCOPEKIT_FAILURE_POLICY", "sometimes")]))
            .unwrap_err();

    assert!(matches!(err.root(), Error::InvalidPolicy { .. }));
    assert!(err.to_string().contains("SCOPEKIT_FAILURE_POLICY"));
}

#[test]
fn test_invalid_env_flag_is_error() {
    let err = CleanupConfigLoader::resolve(None, env(&[("SCOPEKIT_AUTO_CLEANUP", "maybe")]))
        .unwrap_err();
    assert!(err.to_string().contains("expected a boolean"));
}

#[test]
fn test_malformed_file_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let err = CleanupConfigLoader::resolve(Some(path.as_path()), env(&[])).unwrap_err();
    assert!(err.to_string().contains("invalid config file"));
}

#[test]
fn test_default_path_ends_in_scopekit_config() {
    if let Some(path) = CleanupConfigLoader::default_config_path() {
        assert!(path.ends_with("scopekit/config.json"));
    }
}
