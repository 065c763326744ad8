//! Configuration resolution tests
//!
//! Covers file → override priority, config path discovery, and graceful
//! handling of a missing config file. Value variables (`DEX_MAX_ID` etc.) are
//! read by the binary's argument parser, not here.
//!
//! Note: Uses serial_test to prevent environment variable races.
//! Tests that touch `DEX_*` variables are marked with #[serial].

use dex_common::config::{Overrides, TomlConfig, DEFAULT_MAX_ID, DEFAULT_PAGE_SIZE};
use dex_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const DEX_VARS: &[&str] = &[
    "DEX_CONFIG",
    "DEX_UPSTREAM_URL",
    "DEX_MAX_ID",
    "DEX_PAGE_SIZE",
    "DEX_HOST",
    "DEX_PORT",
    "DEX_LOG_LEVEL",
];

fn clear_env() {
    for var in DEX_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let config = TomlConfig::resolve(Some(&path), &Overrides::default()).unwrap();

    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_file_values_are_loaded() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
        [upstream]
        base_url = "http://localhost:9999/api/v2"

        [catalog]
        max_id = 151
        page_size = 20

        [server]
        port = 6001
        "#,
    )
    .unwrap();

    let config = TomlConfig::resolve(Some(&path), &Overrides::default()).unwrap();

    assert_eq!(config.upstream.base_url, "http://localhost:9999/api/v2");
    assert_eq!(config.catalog.max_id, 151);
    assert_eq!(config.catalog.page_size, 20);
    assert_eq!(config.server.port, 6001);
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn test_overrides_beat_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
        [catalog]
        page_size = 20
        max_id = 151
        "#,
    )
    .unwrap();

    let overrides = Overrides {
        page_size: Some(40),
        ..Default::default()
    };
    let config = TomlConfig::resolve(Some(&path), &overrides).unwrap();

    assert_eq!(config.catalog.page_size, 40);
    assert_eq!(config.catalog.max_id, 151, "file value kept when not overridden");
}

#[test]
#[serial]
fn test_value_variables_are_not_read_by_resolution() {
    clear_env();
    env::set_var("DEX_MAX_ID", "lots");
    env::set_var("DEX_PAGE_SIZE", "30");

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");
    let config = TomlConfig::resolve(Some(&path), &Overrides::default()).unwrap();
    clear_env();

    assert_eq!(config.catalog.max_id, DEFAULT_MAX_ID);
    assert_eq!(config.catalog.page_size, DEFAULT_PAGE_SIZE);
}

#[test]
#[serial]
fn test_config_path_from_env() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("from-env.toml");
    fs::write(&path, "[catalog]\nmax_id = 9\n").unwrap();
    env::set_var("DEX_CONFIG", &path);

    let config = TomlConfig::resolve(None, &Overrides::default()).unwrap();
    clear_env();

    assert_eq!(config.catalog.max_id, 9);
    assert_eq!(config.catalog.page_size, DEFAULT_PAGE_SIZE);
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[catalog\nmax_id = ").unwrap();

    let result = TomlConfig::resolve(Some(&path), &Overrides::default());

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_resolved_config_round_trips_through_toml() {
    clear_env();
    let mut config = TomlConfig::default();
    config.catalog.page_size = 12;

    let text = config.to_toml_string().unwrap();
    let parsed: TomlConfig = toml::from_str(&text).unwrap();

    assert_eq!(parsed, config);
}
