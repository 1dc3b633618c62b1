//! Loaded catalogs, one per locale

use crate::catalog::Catalog;
use dashmap::DashMap;
use polingo_common::Locale;
use std::sync::Arc;

/// Concurrent map of locale to its current catalog.
///
/// Catalogs are replaced wholesale; a reader holding an `Arc<Catalog>` keeps
/// seeing the version it fetched even if a newer one is stored meanwhile.
#[derive(Debug, Default)]
pub struct CatalogStore {
    catalogs: DashMap<Locale, Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, locale: &Locale) -> Option<Arc<Catalog>> {
        self.catalogs
            .get(locale)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Store `catalog` under its own locale, returning the one it replaced
    pub fn insert(&self, catalog: Arc<Catalog>) -> Option<Arc<Catalog>> {
        self.catalogs.insert(catalog.locale().clone(), catalog)
    }

    pub fn remove(&self, locale: &Locale) -> Option<Arc<Catalog>> {
        self.catalogs.remove(locale).map(|(_, catalog)| catalog)
    }

    pub fn contains(&self, locale: &Locale) -> bool {
        self.catalogs.contains_key(locale)
    }

    /// Locales with a stored catalog, sorted by tag
    pub fn locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = self
            .catalogs
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        locales.sort();
        locales
    }
}
