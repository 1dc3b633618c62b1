//! Integration tests for polingo-config crate.

use polingo_config::{CatalogFormat, ConfigError, ConfigLoader};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    polingo_common::test_utils::init_test_logging();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r"
locale: es
locales: [en, es, pt_BR]
fallback: en
loader:
  base_url: ./locales
  format: po
cache:
  enabled: true
  max_entries: 4
  ttl_seconds: 120
logging:
  level: debug
  format: compact
"
    )
    .unwrap();

    let config = ConfigLoader::load_config(file.path()).unwrap();

    assert_eq!(config.locale.as_str(), "es");
    assert_eq!(config.locales[2].as_str(), "pt-BR");
    assert_eq!(config.fallback.unwrap().as_str(), "en");
    assert_eq!(config.loader.format, CatalogFormat::Po);
    assert_eq!(config.cache.max_entries, 4);
    assert_eq!(config.cache.ttl_seconds, 120);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_file_is_io_error() {
    let result = ConfigLoader::load_config("/definitely/not/here/polingo.yaml");
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}

#[test]
fn test_cache_bounds_validated() {
    let result = ConfigLoader::from_yaml_str("cache:\n  max_entries: 0\n");
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_empty_locale_set_rejected() {
    let result = ConfigLoader::from_yaml_str("locales: []\n");
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_invalid_locale_tag_rejected_at_parse() {
    let result = ConfigLoader::from_yaml_str("locales: ['en', 'not a tag!']\n");
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}
