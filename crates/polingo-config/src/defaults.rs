//! Default values for every configuration section.

use crate::schema::{CacheConfig, CatalogFormat, Config, LoaderConfig};
use polingo_common::{Locale, LoggingConfig};

/// Directory the demo application serves catalogs from.
pub const DEFAULT_BASE_URL: &str = "i18n";

/// Default number of cached catalogs.
pub const DEFAULT_CACHE_ENTRIES: u64 = 32;

/// Default catalog time-to-live, in seconds.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            locales: vec![Locale::default()],
            fallback: None,
            loader: LoaderConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            format: CatalogFormat::Json,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_CACHE_ENTRIES,
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}
