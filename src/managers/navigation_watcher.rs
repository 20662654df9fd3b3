//! Keeps the capture button on the page across client-side navigation.
//!
//! The host page signals navigation unreliably, so three signals are
//! watched and button insertion is an idempotent ensure-present operation
//! that a periodic task re-runs as well.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};

use crate::types::page::HostPage;
use crate::types::settings::CaptureSettings;

/// Navigation hints from the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSignal {
    /// The document tree changed; the location may or may not have.
    DocumentMutation,
    /// Back/forward navigation.
    HistoryPopState,
    /// The host's own "page finished loading" event.
    PageReady,
}

/// Whether re-injection is needed, and after how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Unchanged,
    Reinject { settle: Duration },
}

/// Owns the last observed location.
pub struct NavigationWatcher {
    last_location: String,
    mutation_settle: Duration,
    navigation_settle: Duration,
}

impl NavigationWatcher {
    pub fn new(initial_location: &str, settings: &CaptureSettings) -> Self {
        Self {
            last_location: initial_location.to_string(),
            mutation_settle: Duration::from_millis(settings.mutation_settle_ms),
            navigation_settle: Duration::from_millis(settings.navigation_settle_ms),
        }
    }

    pub fn last_location(&self) -> &str {
        &self.last_location
    }

    /// Records `location` and decides whether the button must be re-injected.
    ///
    /// Mutations only count when the location changed; popstate and
    /// page-ready always re-inject.
    pub fn observe(&mut self, signal: NavigationSignal, location: &str) -> NavigationOutcome {
        let changed = self.last_location != location;
        if changed {
            log::debug!("[NAV] {} -> {} ({:?})", self.last_location, location, signal);
            self.last_location = location.to_string();
        }

        match signal {
            NavigationSignal::DocumentMutation if !changed => NavigationOutcome::Unchanged,
            NavigationSignal::DocumentMutation => NavigationOutcome::Reinject {
                settle: self.mutation_settle,
            },
            NavigationSignal::HistoryPopState | NavigationSignal::PageReady => {
                NavigationOutcome::Reinject {
                    settle: self.navigation_settle,
                }
            }
        }
    }
}

/// Result of one ensure-present pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    AlreadyPresent,
    Inserted,
    /// The controls bar is not on the page yet.
    NotReady,
}

/// Inserts the capture button into the controls bar, at most once.
pub fn ensure_present(page: &mut dyn HostPage) -> InjectOutcome {
    if !page.has_controls() {
        return InjectOutcome::NotReady;
    }
    if page.has_capture_button() {
        return InjectOutcome::AlreadyPresent;
    }
    page.insert_capture_button();
    log::info!("[NAV] Capture button added to player");
    InjectOutcome::Inserted
}

/// Drops the current button and inserts a fresh one, for a new page.
pub fn reinject(page: &mut dyn HostPage) -> InjectOutcome {
    if page.has_capture_button() {
        page.remove_capture_button();
    }
    ensure_present(page)
}

/// Handles one navigation signal end to end, waiting out the settle delay.
pub async fn on_navigation<P: HostPage + Send>(
    page: &Mutex<P>,
    watcher: &mut NavigationWatcher,
    signal: NavigationSignal,
) -> Option<InjectOutcome> {
    let location = page.lock().await.location();
    match watcher.observe(signal, &location) {
        NavigationOutcome::Unchanged => None,
        NavigationOutcome::Reinject { settle } => {
            tokio::time::sleep(settle).await;
            let mut page = page.lock().await;
            Some(reinject(&mut *page))
        }
    }
}

/// Re-runs [`ensure_present`] every `every` until `shutdown` turns true.
pub async fn run_ensure_loop<P: HostPage + Send>(
    page: Arc<Mutex<P>>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut page = page.lock().await;
                ensure_present(&mut *page);
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}
