//! Path resolution module tests

use sitehits::config::path_resolver::{expand_home, get_default_config_path, resolve_path};
use tempfile::TempDir;

#[test]
fn test_absolute_path_unchanged() {
    let path = "/tmp/contacts.jsonl";
    let resolved = resolve_path(path).unwrap();
    assert_eq!(resolved.to_str().unwrap(), path);
}

#[test]
fn test_tilde_expansion() {
    let resolved = expand_home("~/contacts.jsonl");
    let home = std::env::var("HOME").unwrap();
    assert_eq!(resolved.to_str().unwrap(), format!("{}/contacts.jsonl", home));
}

#[test]
fn test_resolve_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("existing.csv");
    std::fs::write(&file_path, "domain\n").unwrap();

    let resolved = resolve_path(file_path.to_str().unwrap()).unwrap();
    assert!(resolved.exists());
}

#[test]
fn test_default_config_path() {
    let path = get_default_config_path();
    assert!(path.ends_with("sitehits/config.toml"));
}
