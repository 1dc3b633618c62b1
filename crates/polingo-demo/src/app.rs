//! The demo screen: current locale, a toggle label and a few sample lookups.

use crate::error::DemoResult;
use polingo_config::Config;
use polingo_i18n::{vars, CatalogSource, FileSource, LoadStatus, Translator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Demo application state.
#[derive(Debug, Clone)]
pub struct DemoApp {
    translator: Translator,
}

impl DemoApp {
    /// Builds the translator for `config`.
    ///
    /// A relative file `base_url` is resolved against `config_dir`, the
    /// directory of the configuration file it came from.
    pub fn new(config: Config, config_dir: Option<&Path>) -> DemoResult<Self> {
        let source = catalog_source(&config.loader.base_url, config_dir)?;
        let translator = Translator::new(config, source)?;
        Ok(Self::from_translator(translator))
    }

    /// Wraps an existing translator.
    #[must_use]
    pub const fn from_translator(translator: Translator) -> Self {
        Self { translator }
    }

    /// The shared translator handle.
    #[must_use]
    pub const fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Waits for the active catalog, logging a failed load.
    pub async fn ready(&self) -> LoadStatus {
        let status = self.translator.ready().await;
        if let Some(e) = status.error() {
            warn!("Catalog for {} unavailable: {}", self.translator.locale(), e);
        }
        status
    }

    /// Lines shown for the current locale.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let t = &self.translator;
        let mut lines = vec![
            format!("Current locale: {}", t.locale()),
            format!("[{}]", t.t("change locale", None)),
            t.t("hello", None),
            t.t("welcome", Some(&vars!["name" => "Polingo"])),
            t.tn("{n} item", "{n} items", 3, None),
            format!(
                "{} / {}",
                t.tp("menu", "File", None),
                t.tp("document", "File", None)
            ),
        ];

        if let Some(e) = t.status().error() {
            lines.push(format!("(catalog unavailable: {e})"));
        }
        lines
    }

    /// The locale the toggle switches to.
    #[must_use]
    pub fn toggle_target(&self) -> &'static str {
        if self.translator.locale() == "en" {
            "es"
        } else {
            "en"
        }
    }

    /// Switches between English and Spanish and waits for the new catalog.
    pub async fn toggle(&self) -> DemoResult<LoadStatus> {
        let target = self.toggle_target();
        info!("Toggling locale to {}", target);
        self.translator.set_locale(target)?;
        Ok(self.ready().await)
    }
}

/// Picks the catalog source for `base_url`.
pub fn catalog_source(
    base_url: &str,
    config_dir: Option<&Path>,
) -> DemoResult<Arc<dyn CatalogSource>> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        return http_source(base_url);
    }

    Ok(Arc::new(FileSource::new(resolve_dir(base_url, config_dir))))
}

/// Resolves a relative catalog directory against the config file's directory.
#[must_use]
pub fn resolve_dir(base_url: &str, config_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(base_url);
    match config_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

#[cfg(feature = "http")]
fn http_source(base_url: &str) -> DemoResult<Arc<dyn CatalogSource>> {
    Ok(Arc::new(polingo_i18n::HttpSource::new(base_url)))
}

#[cfg(not(feature = "http"))]
fn http_source(base_url: &str) -> DemoResult<Arc<dyn CatalogSource>> {
    Err(crate::error::DemoError::UnsupportedSource(base_url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dir() {
        let dir = Path::new("/etc/polingo");
        assert_eq!(resolve_dir("i18n", Some(dir)), PathBuf::from("/etc/polingo/i18n"));
        assert_eq!(resolve_dir("/srv/i18n", Some(dir)), PathBuf::from("/srv/i18n"));
        assert_eq!(resolve_dir("i18n", None), PathBuf::from("i18n"));
    }

    #[cfg(not(feature = "http"))]
    #[test]
    fn test_http_needs_feature() {
        let result = catalog_source("https://cdn.example.com/i18n", None);
        assert!(matches!(
            result,
            Err(crate::error::DemoError::UnsupportedSource(_))
        ));
    }
}
