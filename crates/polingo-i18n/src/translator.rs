//! The translation facade handed to every consumer

use crate::catalog::{Catalog, MessageEntry};
use crate::error::{I18nError, I18nResult};
use crate::interpolate::{render, Variables};
use crate::loader::CatalogLoader;
use crate::locale::LocaleController;
use crate::source::CatalogSource;
use crate::status::{LoadPhase, LoadStatus, StatusTracker};
use crate::store::CatalogStore;
use futures::future::join_all;
use parking_lot::Mutex;
use polingo_common::Locale;
use polingo_config::{Config, ConfigCache};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Handle to the translation runtime.
///
/// Cheap to clone; every clone shares the same locale, catalogs and status.
/// Lookups never block and never fail: a missing translation resolves to
/// the source text passed by the caller.
#[derive(Clone)]
pub struct Translator {
    inner: Arc<Inner>,
}

struct Inner {
    config: ConfigCache,
    loader: CatalogLoader,
    store: CatalogStore,
    locale: LocaleController,
    status: StatusTracker,
    runtime: Handle,
    ticket: AtomicU64,
    task: Mutex<Option<LoadTask>>,
}

struct LoadTask {
    locale: Locale,
    handle: JoinHandle<()>,
}

impl Translator {
    /// Build a translator and start loading the initial locale.
    ///
    /// Must be called from within a tokio runtime; catalog loads are
    /// spawned onto it.
    pub fn new(config: Config, source: Arc<dyn CatalogSource>) -> I18nResult<Self> {
        let runtime = Handle::try_current().map_err(|_| I18nError::NoRuntime)?;

        if !config.supports(&config.locale) {
            return Err(invalid_locale(config.locale.as_str(), &config));
        }

        let loader = CatalogLoader::new(source, config.loader.format, &config.cache);
        let initial = config.locale.clone();
        let fallback = config.fallback.clone().filter(|f| *f != initial);
        let config = ConfigCache::new(config)?;

        let translator = Self {
            inner: Arc::new(Inner {
                config,
                loader,
                store: CatalogStore::new(),
                locale: LocaleController::new(initial.clone()),
                status: StatusTracker::new(),
                runtime,
                ticket: AtomicU64::new(0),
                task: Mutex::new(None),
            }),
        };

        info!("Translator starting with locale {}", initial);
        translator.start_load();

        if let Some(fallback) = fallback {
            let inner = Arc::clone(&translator.inner);
            translator.inner.runtime.spawn(async move {
                if let Ok(catalog) = inner.loader.load(&fallback).await {
                    debug!("Fallback catalog for {} loaded", fallback);
                    inner.store.insert(catalog);
                }
            });
        }

        Ok(translator)
    }

    /// The active locale
    pub fn locale(&self) -> Locale {
        self.inner.locale.get().as_ref().clone()
    }

    /// Switch the active locale.
    ///
    /// Subscribers are notified immediately and the status enters
    /// [`LoadPhase::Loading`] until the new catalog arrives. Any load still
    /// running for an earlier switch is abandoned. Until the catalog is in,
    /// lookups resolve against whatever is stored for the new locale, or the
    /// source text.
    pub fn set_locale(&self, tag: &str) -> I18nResult<()> {
        let config = self.inner.config.get();
        let locale = Locale::parse(tag)
            .ok()
            .filter(|l| config.supports(l))
            .ok_or_else(|| invalid_locale(tag, &config))?;

        // The swap and the load it triggers must not interleave with
        // another switch.
        let mut task = self.inner.task.lock();
        if self.inner.locale.is_active(&locale) {
            let phase = self.inner.status.snapshot().phase;
            if matches!(phase, LoadPhase::Ready | LoadPhase::Loading) {
                trace!("Locale {} already active", locale);
                return Ok(());
            }
        }

        self.inner.locale.replace(locale);
        self.spawn_load(&mut task);
        Ok(())
    }

    /// Receive every subsequent locale change
    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.inner.locale.subscribe()
    }

    pub fn status(&self) -> LoadStatus {
        self.inner.status.snapshot()
    }

    pub fn loading(&self) -> bool {
        self.status().loading()
    }

    /// Receive every subsequent status change
    pub fn watch_status(&self) -> watch::Receiver<LoadStatus> {
        self.inner.status.subscribe()
    }

    /// Wait until the active locale's load has settled
    pub async fn ready(&self) -> LoadStatus {
        let mut rx = self.inner.status.subscribe();
        let settled = rx.wait_for(|status| !status.loading()).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.status())
    }

    /// Fetch the active locale's catalog again, bypassing the cache
    pub async fn reload(&self) -> I18nResult<()> {
        let locale = self.locale();
        info!("Reloading catalog for {}", locale);

        self.inner.loader.invalidate(&locale).await;
        self.start_load();

        match self.ready().await.error {
            Some(e) => Err(I18nError::Load(e)),
            None => Ok(()),
        }
    }

    /// Load catalogs for `locales` without changing the active locale
    pub async fn preload(&self, locales: &[Locale]) -> Vec<(Locale, I18nResult<()>)> {
        let config = self.inner.config.get();

        let loads = locales.iter().map(|locale| {
            let config = Arc::clone(&config);
            async move {
                if !config.supports(locale) {
                    return (locale.clone(), Err(invalid_locale(locale.as_str(), &config)));
                }
                let result = self
                    .inner
                    .loader
                    .load(locale)
                    .await
                    .map(|catalog| {
                        self.inner.store.insert(catalog);
                    })
                    .map_err(I18nError::Load);
                (locale.clone(), result)
            }
        });

        join_all(loads).await
    }

    /// Locales whose catalog is currently stored
    pub fn loaded_locales(&self) -> Vec<Locale> {
        self.inner.store.locales()
    }

    pub fn supported_locales(&self) -> Vec<Locale> {
        self.inner.config.get().locales.clone()
    }

    /// Whether the active catalog translates `msgid` under `context`
    pub fn has_translation(&self, context: Option<&str>, msgid: &str) -> bool {
        self.inner
            .store
            .get(&self.inner.locale.get())
            .is_some_and(|catalog| catalog.contains(context, msgid))
    }

    /// Translate `msgid`
    pub fn t(&self, msgid: &str, vars: Option<&Variables>) -> String {
        self.translate(None, msgid, vars)
    }

    /// Translate `msgid` within `context`
    pub fn tp(&self, context: &str, msgid: &str, vars: Option<&Variables>) -> String {
        self.translate(Some(context), msgid, vars)
    }

    /// Translate a message with plural forms, keyed by `singular`
    ///
    /// `count` and `n` are made available to the template unless `vars`
    /// already sets them.
    pub fn tn(&self, singular: &str, plural: &str, count: i64, vars: Option<&Variables>) -> String {
        self.translate_plural(None, singular, plural, count, vars)
    }

    /// Plural translation within `context`
    pub fn tnp(
        &self,
        context: &str,
        singular: &str,
        plural: &str,
        count: i64,
        vars: Option<&Variables>,
    ) -> String {
        self.translate_plural(Some(context), singular, plural, count, vars)
    }

    fn translate(&self, context: Option<&str>, msgid: &str, vars: Option<&Variables>) -> String {
        let template = self
            .lookup(context, msgid, |_, entry| entry.singular().map(str::to_string))
            .unwrap_or_else(|| msgid.to_string());

        match vars {
            Some(vars) => render(&template, vars),
            None => template,
        }
    }

    fn translate_plural(
        &self,
        context: Option<&str>,
        singular: &str,
        plural: &str,
        count: i64,
        vars: Option<&Variables>,
    ) -> String {
        let template = self
            .lookup(context, singular, |catalog, entry| {
                entry.form(catalog.select_form(count)).map(str::to_string)
            })
            .unwrap_or_else(|| (if count == 1 { singular } else { plural }).to_string());

        let mut vars = vars.cloned().unwrap_or_default();
        for name in ["count", "n"] {
            if !vars.contains(name) {
                vars.set(name, count);
            }
        }
        render(&template, &vars)
    }

    /// Resolve against the active catalog, then the fallback locale's
    fn lookup<F>(&self, context: Option<&str>, msgid: &str, select: F) -> Option<String>
    where
        F: Fn(&Catalog, &MessageEntry) -> Option<String>,
    {
        let locale = self.inner.locale.get();
        let resolve = |locale: &Locale| {
            let catalog = self.inner.store.get(locale)?;
            let entry = catalog.get(context, msgid)?;
            select(&catalog, entry)
        };

        if let Some(found) = resolve(&*locale) {
            return Some(found);
        }

        let config = self.inner.config.get();
        let found = config
            .fallback
            .as_ref()
            .filter(|fallback| **fallback != *locale)
            .and_then(resolve);

        if found.is_none() {
            debug!(
                "No translation for '{}' (context {:?}) in {}, using source text",
                msgid, context, locale
            );
        }
        found
    }

    /// Load the active locale's catalog, superseding any load in flight
    fn start_load(&self) {
        let mut task = self.inner.task.lock();
        self.spawn_load(&mut task);
    }

    fn spawn_load(&self, task: &mut Option<LoadTask>) {
        let locale = self.inner.locale.get().as_ref().clone();
        let ticket = self.inner.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.status.begin();

        let inner = Arc::clone(&self.inner);
        let target = locale.clone();
        let handle = self
            .inner
            .runtime
            .spawn(async move { inner.finish_load(ticket, target).await });

        if let Some(previous) = task.replace(LoadTask { locale, handle }) {
            if !previous.handle.is_finished() {
                debug!("Superseding in-flight load for {}", previous.locale);
                previous.handle.abort();
            }
        }
    }
}

impl Inner {
    async fn finish_load(self: Arc<Self>, ticket: u64, locale: Locale) {
        let result = self.loader.load(&locale).await;

        let applied = self.status.settle_if(|| {
            if self.ticket.load(Ordering::SeqCst) != ticket || !self.locale.is_active(&locale) {
                return None;
            }
            Some(result.map(|catalog| {
                self.store.insert(catalog);
            }))
        });

        if applied {
            info!("Catalog for {} settled", locale);
        } else {
            debug!("Discarding stale load for {} (ticket {})", locale, ticket);
        }
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("locale", &self.inner.locale.get())
            .field("status", &self.status().phase)
            .field("loaded", &self.loaded_locales())
            .finish_non_exhaustive()
    }
}

fn invalid_locale(tag: &str, config: &Config) -> I18nError {
    let supported = config
        .locales
        .iter()
        .map(Locale::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    warn!("Rejected locale '{}' (supported: {})", tag, supported);
    I18nError::InvalidLocale {
        locale: tag.to_string(),
        supported,
    }
}
