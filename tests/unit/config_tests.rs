use std::fs;

use clap::Parser;
use tempfile::TempDir;

use crate::common::test_helpers::TestFixtures;
use sword_xml::config::{OutputFormatConfig, ValidationConfig};
use sword_xml::{Cli, Config, ConfigError, ConfigManager};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.validation, ValidationConfig::default());
    assert!(config.validation.report_extension_attributes);
    assert!(!config.validation.report_unknown_elements);
    assert!(config.validation.require_absolute_uris);
    assert_eq!(config.files.extensions, vec!["xml".to_string()]);
    assert_eq!(config.output.format, OutputFormatConfig::Human);
    assert!(!config.processing.strict);
}

#[test]
fn test_load_fixture_config() {
    let fixtures = TestFixtures::new();
    let config = ConfigManager::load_from_file(&fixtures.relaxed_config()).unwrap();

    assert!(config.validation.report_unknown_elements);
    assert!(!config.validation.require_absolute_uris);
    // Not in the file, so the default stays.
    assert!(config.validation.report_extension_attributes);
    assert!(config.processing.strict);
    assert_eq!(config.processing.threads, Some(2));
    assert_eq!(config.output.format, OutputFormatConfig::Summary);
    assert_eq!(config.files.extensions, vec!["xml", "atom"]);
}

#[test]
fn test_load_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sword-validate.json");
    fs::write(
        &path,
        r#"{"validation": {"report_extension_attributes": false}, "output": {"format": "json"}}"#,
    )
    .unwrap();

    let config = ConfigManager::load_from_file(&path).unwrap();
    assert!(!config.validation.report_extension_attributes);
    assert_eq!(config.output.format, OutputFormatConfig::Json);
}

#[test]
fn test_unsupported_config_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "validation: {}").unwrap();

    let result = ConfigManager::load_from_file(&path);
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
}

#[test]
fn test_malformed_toml_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[validation\nstrict = ").unwrap();

    assert!(ConfigManager::load_from_file(&path).is_err());
}

#[test]
fn test_cli_overrides_file() {
    let fixtures = TestFixtures::new();
    let config_path = fixtures.relaxed_config();
    let cli = Cli::try_parse_from([
        "sword-validate",
        "--config",
        config_path.to_str().unwrap(),
        "--format",
        "json",
        "--threads",
        "8",
        "-e",
        "atom",
        "/tmp",
    ])
    .unwrap();

    let file_config = ConfigManager::load_from_file(&config_path).unwrap();
    let config = ConfigManager::merge_with_cli(file_config, &cli);

    assert_eq!(config.output.format, OutputFormatConfig::Json);
    assert_eq!(config.processing.threads, Some(8));
    assert_eq!(config.files.extensions, vec!["atom"]);
    // Flags that were not given leave the file's values alone.
    assert!(config.processing.strict);
    assert!(!config.validation.require_absolute_uris);
}

#[test]
fn test_relaxed_uris_flag() {
    let cli = Cli::try_parse_from(["sword-validate", "--relaxed-uris", "/tmp"]).unwrap();
    let config = ConfigManager::merge_with_cli(Config::default(), &cli);
    assert!(!config.validation.require_absolute_uris);
}

#[test]
fn test_validate_config_rejects_zero_threads() {
    let mut config = Config::default();
    config.processing.threads = Some(0);
    assert!(ConfigManager::validate_config(&config).is_err());
}

#[test]
fn test_validate_config_rejects_empty_extensions() {
    let mut config = Config::default();
    config.files.extensions.clear();
    assert!(ConfigManager::validate_config(&config).is_err());
}
