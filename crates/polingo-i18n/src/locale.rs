//! Active locale state

use arc_swap::ArcSwap;
use polingo_common::Locale;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Owns the active locale and notifies subscribers when it changes.
///
/// Reads are lock-free; a change is published to every
/// [`watch::Receiver`] handed out by [`LocaleController::subscribe`].
#[derive(Debug)]
pub struct LocaleController {
    current: ArcSwap<Locale>,
    notify: watch::Sender<Locale>,
}

impl LocaleController {
    pub fn new(initial: Locale) -> Self {
        let (notify, _) = watch::channel(initial.clone());
        Self {
            current: ArcSwap::from_pointee(initial),
            notify,
        }
    }

    /// The active locale
    pub fn get(&self) -> Arc<Locale> {
        self.current.load_full()
    }

    pub fn is_active(&self, locale: &Locale) -> bool {
        **self.current.load() == *locale
    }

    /// Make `locale` active; returns `false` without notifying if it already was
    pub fn replace(&self, locale: Locale) -> bool {
        let previous = self.current.swap(Arc::new(locale.clone()));
        if *previous == locale {
            return false;
        }

        info!("Locale changed from {} to {}", previous, locale);
        self.notify.send_replace(locale);
        true
    }

    /// Receive every subsequent locale change
    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.notify.subscribe()
    }
}
