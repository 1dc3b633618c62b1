//! Where catalog documents come from

use crate::error::LoadError;
use async_trait::async_trait;
use polingo_common::Locale;
use polingo_config::CatalogFormat;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::trace;

/// Fetches the raw document for a locale.
///
/// Implementations only move bytes; parsing is done by
/// [`CatalogLoader`](crate::CatalogLoader).
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the serialized catalog for `locale` in `format`
    async fn fetch(&self, locale: &Locale, format: CatalogFormat) -> Result<String, LoadError>;

    /// Human-readable location of `locale`'s document, used in logs and errors
    fn location(&self, locale: &Locale, format: CatalogFormat) -> String;
}

/// Reads `{base_dir}/{locale}.{ext}` from disk
#[derive(Debug, Clone)]
pub struct FileSource {
    base_dir: PathBuf,
}

impl FileSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path(&self, locale: &Locale, format: CatalogFormat) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", locale, format.extension()))
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    async fn fetch(&self, locale: &Locale, format: CatalogFormat) -> Result<String, LoadError> {
        let path = self.path(locale, format);
        trace!("Reading catalog from {}", path.display());

        tokio::fs::read_to_string(&path).await.map_err(|source| {
            let location = path.display().to_string();
            if source.kind() == ErrorKind::NotFound {
                LoadError::NotFound { location }
            } else {
                LoadError::Io { location, source }
            }
        })
    }

    fn location(&self, locale: &Locale, format: CatalogFormat) -> String {
        self.path(locale, format).display().to_string()
    }
}

/// Serves documents held in memory, keyed by locale tag
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemorySource::insert`]
    #[must_use]
    pub fn with(mut self, locale: &str, document: impl Into<String>) -> Self {
        self.insert(locale, document);
        self
    }

    pub fn insert(&mut self, locale: &str, document: impl Into<String>) {
        self.documents.insert(locale.to_string(), document.into());
    }
}

#[async_trait]
impl CatalogSource for MemorySource {
    async fn fetch(&self, locale: &Locale, format: CatalogFormat) -> Result<String, LoadError> {
        self.documents
            .get(locale.as_str())
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                location: self.location(locale, format),
            })
    }

    fn location(&self, locale: &Locale, format: CatalogFormat) -> String {
        format!("memory:{}.{}", locale, format.extension())
    }
}

/// GETs `{base_url}/{locale}.{ext}` over HTTP
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl CatalogSource for HttpSource {
    async fn fetch(&self, locale: &Locale, format: CatalogFormat) -> Result<String, LoadError> {
        let location = self.location(locale, format);
        trace!("Requesting catalog from {}", location);

        let response = match self.client.get(&location).send().await {
            Ok(response) => response,
            Err(e) => {
                return Err(LoadError::Transport {
                    location,
                    message: e.to_string(),
                })
            }
        };
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound { location });
        }
        if !status.is_success() {
            return Err(LoadError::Http {
                location,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| LoadError::Transport {
            location,
            message: e.to_string(),
        })
    }

    fn location(&self, locale: &Locale, format: CatalogFormat) -> String {
        format!("{}/{}.{}", self.base_url, locale, format.extension())
    }
}
