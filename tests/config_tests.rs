use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use yangtree::config::Config;
use yangtree::document::DataFormat;
use yangtree::log::LogLevel;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.default_format, DataFormat::Xml);
    assert!(!config.strict);
    assert!(config.show_logs);
    assert_eq!(config.log_level, "warning");
    assert_eq!(config.log_level(), LogLevel::Warning);
    assert_eq!(config.separator, " = ");
    assert!(config.schema_files.is_empty());
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        default_format: DataFormat::Json,
        strict: true,
        show_logs: false,
        log_level: "debug".to_string(),
        separator: ": ".to_string(),
        schema_files: vec![PathBuf::from("/etc/yang/interfaces.yaml")],
    };
    config.save_to(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("default_format = \"json\""));

    assert_eq!(Config::load_from(&path), config);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "default_format = \"yaml\"\nstrict = ").unwrap();

    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "separator = \"|\"\nschema_files = [\"a.yaml\", \"b.yaml\"]\n").unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config.separator, "|");
    assert_eq!(config.schema_files.len(), 2);
    assert!(config.show_logs);
    assert_eq!(config.default_format, DataFormat::Xml);
}
