//! Configuration schema definitions using serde with validation attributes.

use polingo_common::{Locale, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationErrors};

/// Main configuration structure for the translation runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Locale active at startup.
    pub locale: Locale,

    /// Supported locales; must contain `locale`.
    #[validate(length(min = 1, message = "At least one supported locale is required"))]
    pub locales: Vec<Locale>,

    /// Locale consulted when a key is missing from the active catalog.
    pub fallback: Option<Locale>,

    /// Catalog source settings.
    pub loader: LoaderConfig,

    /// Catalog cache settings.
    pub cache: CacheConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Config {
    /// Builds a configuration for `locale` out of `locales`, catalogs under `base_url`.
    #[must_use]
    pub fn new(locale: Locale, locales: Vec<Locale>, base_url: impl Into<String>) -> Self {
        Self {
            locale,
            locales,
            loader: LoaderConfig {
                base_url: base_url.into(),
                ..LoaderConfig::default()
            },
            ..Self::default()
        }
    }

    /// Whether `locale` is one of the supported locales.
    #[must_use]
    pub fn supports(&self, locale: &Locale) -> bool {
        self.locales.contains(locale)
    }

    /// Run the derived field rules and the cross-field locale checks.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.loader.validate()?;
        self.cache.validate()?;
        crate::validator::validate_locale_set(self)
    }
}

/// Where and how catalog documents are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory or URL prefix; documents live at `{base_url}/{locale}.{ext}`.
    #[validate(length(min = 1, message = "Loader base URL cannot be empty"))]
    pub base_url: String,

    /// Document format.
    pub format: CatalogFormat,
}

/// Serialized catalog format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    /// gettext-parser JSON.
    #[default]
    Json,
    /// gettext `.po` text.
    Po,
}

impl CatalogFormat {
    /// File extension for documents in this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Po => "po",
        }
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for CatalogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "po" => Ok(Self::Po),
            other => Err(format!("unknown catalog format '{other}'")),
        }
    }
}

/// Catalog cache settings.
///
/// Deserializes from either a bare boolean (`cache: false`) or a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(from = "CacheRepr")]
pub struct CacheConfig {
    /// Reuse previously fetched catalogs instead of fetching on every switch.
    pub enabled: bool,

    /// Maximum number of cached catalogs.
    #[validate(range(min = 1, max = 10000, message = "Cache capacity must be between 1 and 10000"))]
    pub max_entries: u64,

    /// Time-to-live for a cached catalog.
    #[validate(range(min = 1, message = "Cache TTL must be at least one second"))]
    pub ttl_seconds: u64,
}

impl CacheConfig {
    /// A disabled cache with default bounds.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CacheRepr {
    Toggle(bool),
    Table(CacheTable),
}

#[derive(Deserialize)]
#[serde(default)]
struct CacheTable {
    enabled: bool,
    max_entries: u64,
    ttl_seconds: u64,
}

impl Default for CacheTable {
    fn default() -> Self {
        let defaults = CacheConfig::default();
        Self {
            enabled: defaults.enabled,
            max_entries: defaults.max_entries,
            ttl_seconds: defaults.ttl_seconds,
        }
    }
}

impl From<CacheRepr> for CacheConfig {
    fn from(repr: CacheRepr) -> Self {
        match repr {
            CacheRepr::Toggle(enabled) => Self {
                enabled,
                ..Self::default()
            },
            CacheRepr::Table(table) => Self {
                enabled: table.enabled,
                max_entries: table.max_entries,
                ttl_seconds: table.ttl_seconds,
            },
        }
    }
}
