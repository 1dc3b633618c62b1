//! Loading and error status of the active locale's catalog

use crate::error::LoadError;
use std::sync::Arc;
use tokio::sync::watch;

/// Where the active locale's load currently stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last load failed; any previously stored catalog stays in use
    Error,
}

/// Snapshot of the status surface
#[derive(Debug, Clone, Default)]
pub struct LoadStatus {
    pub phase: LoadPhase,
    pub error: Option<Arc<LoadError>>,
}

impl LoadStatus {
    pub fn loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_deref()
    }
}

/// Outcome a finished load reports to [`StatusTracker::settle_if`]
pub(crate) type Settlement = Result<(), Arc<LoadError>>;

#[derive(Debug)]
pub(crate) struct StatusTracker {
    tx: watch::Sender<LoadStatus>,
}

impl StatusTracker {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(LoadStatus::default());
        Self { tx }
    }

    pub(crate) fn snapshot(&self) -> LoadStatus {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<LoadStatus> {
        self.tx.subscribe()
    }

    pub(crate) fn begin(&self) {
        self.tx.send_modify(|status| {
            status.phase = LoadPhase::Loading;
            status.error = None;
        });
    }

    /// Settle the current load unless `decide` returns `None`.
    ///
    /// `decide` runs while the status is locked, so a concurrent
    /// [`StatusTracker::begin`] is ordered entirely before or after it.
    pub(crate) fn settle_if<F>(&self, decide: F) -> bool
    where
        F: FnOnce() -> Option<Settlement>,
    {
        self.tx.send_if_modified(|status| match decide() {
            None => false,
            Some(Ok(())) => {
                status.phase = LoadPhase::Ready;
                status.error = None;
                true
            }
            Some(Err(e)) => {
                status.phase = LoadPhase::Error;
                status.error = Some(e);
                true
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let tracker = StatusTracker::new();
        assert_eq!(tracker.snapshot().phase, LoadPhase::Idle);

        tracker.begin();
        assert!(tracker.snapshot().loading());

        assert!(tracker.settle_if(|| Some(Ok(()))));
        assert!(tracker.snapshot().is_ready());

        tracker.begin();
        let failure = Arc::new(LoadError::NotFound {
            location: "i18n/es.json".to_string(),
        });
        assert!(tracker.settle_if(|| Some(Err(failure))));

        let status = tracker.snapshot();
        assert_eq!(status.phase, LoadPhase::Error);
        assert!(matches!(status.error(), Some(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_discarded_settlement_leaves_status() {
        let tracker = StatusTracker::new();
        tracker.begin();
        let rx = tracker.subscribe();

        assert!(!tracker.settle_if(|| None));
        assert!(tracker.snapshot().loading());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let tracker = StatusTracker::new();
        tracker.begin();
        tracker.settle_if(|| {
            Some(Err(Arc::new(LoadError::Http {
                location: "https://cdn/es.json".to_string(),
                status: 503,
            })))
        });

        tracker.begin();
        assert!(tracker.snapshot().error.is_none());
    }
}
