//! Shared, swappable configuration with lock-free reads.

use crate::loader::ConfigError;
use crate::schema::Config;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::debug;

/// Configuration handle shared by the runtime.
///
/// Readers get an `Arc<Config>` snapshot; a replacement is validated before
/// it becomes visible, so readers never observe an invalid configuration.
#[derive(Debug)]
pub struct ConfigCache {
    config: ArcSwap<Config>,
}

impl ConfigCache {
    /// Validates `config` and wraps it.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate_all()?;
        Ok(Self {
            config: ArcSwap::from_pointee(config),
        })
    }

    /// Current configuration snapshot.
    pub fn get(&self) -> Arc<Config> {
        self.config.load_full()
    }

    /// Validates and installs a replacement, leaving the old one on error.
    pub fn update(&self, config: Config) -> Result<(), ConfigError> {
        config.validate_all()?;
        debug!("Installing configuration with {} locales", config.locales.len());
        self.config.store(Arc::new(config));
        Ok(())
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self {
            config: ArcSwap::from_pointee(Config::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polingo_common::Locale;

    #[test]
    fn test_update_swaps_snapshot() {
        let cache = ConfigCache::default();
        let before = cache.get();

        let es = Locale::parse("es").unwrap();
        let mut next = Config::default();
        next.locales.push(es.clone());
        next.locale = es.clone();
        cache.update(next).unwrap();

        assert_eq!(before.locale.as_str(), "en");
        assert_eq!(cache.get().locale, es);
    }

    #[test]
    fn test_invalid_update_keeps_previous() {
        let cache = ConfigCache::default();
        let mut bad = Config::default();
        bad.locale = Locale::parse("fr").unwrap();

        assert!(matches!(cache.update(bad), Err(ConfigError::ValidationError(_))));
        assert_eq!(cache.get().locale.as_str(), "en");
    }

    #[test]
    fn test_new_rejects_invalid() {
        let mut bad = Config::default();
        bad.locales.clear();
        assert!(ConfigCache::new(bad).is_err());
    }
}
