//! Tests for configuration loading and resolution
//!
//! Tests that touch TEXTSCOPE_ROOT_FOLDER are marked with #[serial] so they
//! do not race on the process environment.

use serial_test::serial;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use textscope_common::config::{
    resolve_root_folder, ConfigOverrides, Environment, ServiceConfig, TomlConfig,
    DATABASE_FILE_NAME, ROOT_FOLDER_ENV,
};

// ============================================================================
// TOML parsing
// ============================================================================

#[test]
fn test_empty_toml_uses_defaults() {
    let config: TomlConfig = toml::from_str("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.environment, Environment::Development);
    assert_eq!(config.analysis.max_content_length, 10_000);
    assert_eq!(config.security.cors_origins, vec!["*".to_string()]);
    assert!(!config.storage.return_unsaved_on_failure);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_partial_toml_sections() {
    let config: TomlConfig = toml::from_str(
        r#"
        root_folder = "/srv/textscope"

        [server]
        port = 9000
        environment = "production"

        [analysis]
        max_content_length = 500

        [storage]
        return_unsaved_on_failure = true
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/textscope")));
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);
    assert!(config.server.environment.is_production());
    assert_eq!(config.analysis.max_content_length, 500);
    assert_eq!(config.analysis.key_phrase_count, 10);
    assert!(config.storage.return_unsaved_on_failure);
}

#[test]
fn test_load_invalid_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server\nport = ").unwrap();

    let err = TomlConfig::load(&path).unwrap_err();
    assert!(matches!(err, textscope_common::Error::Config(_)));
}

#[test]
fn test_discover_explicit_missing_file_fails() {
    let err = TomlConfig::discover(Some(Path::new("/nonexistent/textscope.toml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_discover_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

    let config = TomlConfig::discover(Some(&path)).unwrap();
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_environment_parsing() {
    assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
    assert_eq!("Dev".parse::<Environment>().unwrap(), Environment::Development);
    assert!("staging".parse::<Environment>().is_err());
    assert_eq!(Environment::Production.to_string(), "production");
}

// ============================================================================
// Root folder resolution
// ============================================================================

#[test]
#[serial]
fn test_cli_overrides_env_and_toml() {
    std::env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let resolved = resolve_root_folder(
        Some(Path::new("/from/cli")),
        ROOT_FOLDER_ENV,
        Some(Path::new("/from/toml")),
    );
    assert_eq!(resolved, PathBuf::from("/from/cli"));
    std::env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    std::env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let resolved = resolve_root_folder(None, ROOT_FOLDER_ENV, Some(Path::new("/from/toml")));
    assert_eq!(resolved, PathBuf::from("/from/env"));
    std::env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_when_env_empty() {
    std::env::set_var(ROOT_FOLDER_ENV, "");
    let resolved = resolve_root_folder(None, ROOT_FOLDER_ENV, Some(Path::new("/from/toml")));
    assert_eq!(resolved, PathBuf::from("/from/toml"));
    std::env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_default_root_folder_fallback() {
    std::env::remove_var(ROOT_FOLDER_ENV);
    let resolved = resolve_root_folder(None, ROOT_FOLDER_ENV, None);
    assert!(resolved.to_string_lossy().contains("textscope"));
}

// ============================================================================
// ServiceConfig
// ============================================================================

#[test]
#[serial]
fn test_resolve_merges_overrides_over_toml() {
    std::env::remove_var(ROOT_FOLDER_ENV);
    let toml_config: TomlConfig = toml::from_str(
        r#"
        root_folder = "/srv/textscope"
        [server]
        host = "0.0.0.0"
        port = 9000
        "#,
    )
    .unwrap();
    let overrides = ConfigOverrides {
        port: Some(7000),
        log_level: Some("warn".to_string()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(&overrides, &toml_config).unwrap();
    assert_eq!(config.bind_address(), "0.0.0.0:7000");
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.root_folder, PathBuf::from("/srv/textscope"));
    assert_eq!(
        config.database_path,
        PathBuf::from("/srv/textscope").join(DATABASE_FILE_NAME)
    );
}

#[test]
#[serial]
fn test_explicit_database_path_wins() {
    std::env::remove_var(ROOT_FOLDER_ENV);
    let overrides = ConfigOverrides {
        root_folder: Some(PathBuf::from("/srv/textscope")),
        database: Some(PathBuf::from("/data/analyses.db")),
        ..Default::default()
    };
    let config = ServiceConfig::resolve(&overrides, &TomlConfig::default()).unwrap();
    assert_eq!(config.database_path, PathBuf::from("/data/analyses.db"));
}

#[test]
#[serial]
fn test_zero_content_length_rejected() {
    std::env::remove_var(ROOT_FOLDER_ENV);
    let overrides = ConfigOverrides {
        max_content_length: Some(0),
        ..Default::default()
    };
    assert!(ServiceConfig::resolve(&overrides, &TomlConfig::default()).is_err());
}
