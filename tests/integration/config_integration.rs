//! Integration tests for configuration loading.

use herald::config::{ConfigLoader, HeraldConfig};
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = HeraldConfig::default();
    assert!(config.logging.enabled);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_config_loads_logging_section() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("herald.toml");

    std::fs::write(
        &config_file,
        r#"
[logging]
level = "debug"
format = "json"
color = false

[logging.modules]
"herald::registry" = "trace"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert!(!config.logging.color);
    assert_eq!(
        config.logging.modules.get("herald::registry"),
        Some(&"trace".to_string())
    );
}

#[test]
fn test_partial_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("herald.toml");

    std::fs::write(
        &config_file,
        r#"
[logging]
level = "warn"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, "text");
    assert!(config.logging.enabled);
}
