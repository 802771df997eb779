//! Configuration module tests
//!
//! Test cases for configuration file and environment variable support:
//! 1. Load config from TOML file
//! 2. Environment variable override
//! 3. Default values
//! 4. Priority: CLI > ENV > Config > Default

use sitehits::config::app_config::AppConfig;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert_eq!(config.index_name(), "company_contacts");
    assert_eq!(config.hits_per_page(), 5);
    assert_eq!(config.scrape_concurrency(), 15);
}

#[test]
fn test_load_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    std::fs::write(&config_path, r#"
app_id = "FILEAPP"
search_api_key = "file-key"
index_name = "contacts_file"
hits_per_page = 8

[[fields]]
label = "Domain"
key = "domain"

[[fields]]
label = "Phone"
key = "phone_numbers"
"#).unwrap();

    let config = AppConfig::from_file(&config_path).unwrap();
    assert_eq!(config.app_id(), Some("FILEAPP"));
    assert_eq!(config.search_api_key(), Some("file-key"));
    assert_eq!(config.index_name(), "contacts_file");
    assert_eq!(config.hits_per_page(), 8);
    assert_eq!(config.fields().len(), 2);
    assert_eq!(config.fields().entries()[1].label, "Phone");
}

#[test]
fn test_env_override_and_merge_priority() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    std::fs::write(&config_path, r#"
app_id = "FILEAPP"
index_name = "contacts_file"
hits_per_page = 8
"#).unwrap();

    std::env::set_var("SITEHITS_INDEX", "contacts_env");
    std::env::set_var("SITEHITS_API_KEY", "env-key");

    let file_config = AppConfig::from_file(&config_path).unwrap();
    let env_config = AppConfig::from_env();
    let merged = file_config.merge_with(&env_config);

    // ENV should override file
    assert_eq!(merged.index_name(), "contacts_env");
    assert_eq!(merged.search_api_key(), Some("env-key"));
    // File value should be preserved where ENV is not set
    assert_eq!(merged.app_id(), Some("FILEAPP"));
    assert_eq!(merged.hits_per_page(), 8);

    std::env::remove_var("SITEHITS_INDEX");
    std::env::remove_var("SITEHITS_API_KEY");
}

#[test]
fn test_config_with_cli_override() {
    let config = AppConfig::default()
        .with_index_name("contacts_cli")
        .with_hits_per_page(3);

    assert_eq!(config.index_name(), "contacts_cli");
    assert_eq!(config.hits_per_page(), 3);
}

#[test]
fn test_validate_config() {
    assert!(AppConfig::default().validate().is_ok());
    assert!(AppConfig::default().with_index_name("  ").validate().is_err());
}

#[test]
fn test_config_serialization() {
    let config = AppConfig::default()
        .with_index_name("contacts_v2")
        .with_base_url("http://localhost:7700");

    let toml_str = config.to_toml().unwrap();
    assert!(toml_str.contains("index_name"));
    assert!(toml_str.contains("contacts_v2"));
    assert!(toml_str.contains("[[fields]]"));
}

#[test]
fn test_missing_file_returns_error() {
    let result = AppConfig::from_file(&PathBuf::from("/nonexistent/config.toml"));
    assert!(result.is_err());
}
