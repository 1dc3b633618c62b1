//! Catalog loading with an optional in-memory cache

use crate::catalog::Catalog;
use crate::error::LoadError;
use crate::po::parse_po;
use crate::source::CatalogSource;
use futures::FutureExt;
use moka::future::Cache;
use polingo_common::Locale;
use polingo_config::{CacheConfig, CatalogFormat};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Outcome of a load; errors are shared so one failure can be reported to
/// every waiter and stored in the status at the same time
pub type LoadResult = Result<Arc<Catalog>, Arc<LoadError>>;

/// Parse `document` as a catalog for `locale`
pub fn parse_catalog(
    locale: Locale,
    format: CatalogFormat,
    document: &str,
) -> Result<Catalog, LoadError> {
    match format {
        CatalogFormat::Json => Catalog::from_json(locale, document),
        CatalogFormat::Po => parse_po(locale, document),
    }
}

/// Loader counters
#[derive(Debug, Default)]
pub struct LoaderMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub fetches: AtomicU64,
    pub failures: AtomicU64,
}

impl LoaderMetrics {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of documents actually fetched from the source
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let total = hits + self.misses.load(Ordering::Relaxed) as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

/// Fetches and parses catalogs, memoising them per locale when enabled
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    format: CatalogFormat,
    cache: Option<Cache<Locale, Arc<Catalog>>>,
    metrics: Arc<LoaderMetrics>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>, format: CatalogFormat, config: &CacheConfig) -> Self {
        let cache = config.enabled.then(|| {
            Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(Duration::from_secs(config.ttl_seconds))
                .build()
        });

        Self {
            source,
            format,
            cache,
            metrics: Arc::new(LoaderMetrics::default()),
        }
    }

    pub fn format(&self) -> CatalogFormat {
        self.format
    }

    pub fn caching(&self) -> bool {
        self.cache.is_some()
    }

    pub fn metrics(&self) -> Arc<LoaderMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Load the catalog for `locale`
    ///
    /// With caching enabled, concurrent loads of the same locale share one
    /// fetch and later loads are served from memory until the entry expires.
    #[instrument(skip(self, locale), fields(locale = %locale))]
    pub async fn load(&self, locale: &Locale) -> LoadResult {
        let Some(cache) = &self.cache else {
            return self.fetch(locale).await.map(Arc::new).map_err(Arc::new);
        };

        if let Some(catalog) = cache.get(locale).await {
            debug!("Catalog cache hit for {}", locale);
            self.metrics.record_hit();
            return Ok(catalog);
        }

        self.metrics.record_miss();
        cache
            .try_get_with(locale.clone(), async {
                self.fetch(locale).await.map(Arc::new)
            })
            .await
    }

    /// Drop the cached catalog for `locale`, if any
    pub async fn invalidate(&self, locale: &Locale) {
        if let Some(cache) = &self.cache {
            debug!("Invalidating cached catalog for {}", locale);
            cache.invalidate(locale).await;
        }
    }

    /// Drop every cached catalog
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }

    async fn fetch(&self, locale: &Locale) -> Result<Catalog, LoadError> {
        self.metrics.record_fetch();

        let attempt = AssertUnwindSafe(async {
            let document = self.source.fetch(locale, self.format).await?;
            parse_catalog(locale.clone(), self.format, &document)
        });
        let result = attempt.catch_unwind().await.unwrap_or_else(|panic| {
            Err(LoadError::Panicked {
                location: self.source.location(locale, self.format),
                message: panic_message(panic.as_ref()),
            })
        });

        match &result {
            Ok(catalog) => info!(
                "Loaded {} messages for {} from {}",
                catalog.len(),
                locale,
                self.source.location(locale, self.format)
            ),
            Err(e) => {
                self.metrics.record_failure();
                warn!("Failed to load catalog for {}: {}", locale, e);
            }
        }

        result
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl std::fmt::Debug for CatalogLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLoader")
            .field("format", &self.format)
            .field("caching", &self.caching())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
