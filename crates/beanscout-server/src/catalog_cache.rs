//! TTL cache in front of the active [`CatalogSource`].
//!
//! Every refresh takes a sequence number before it starts fetching. A
//! completed fetch replaces the cached snapshot only if its sequence number is
//! newer than the stored one, so a slow refresh that finishes late cannot
//! overwrite a newer catalog.
//!
//! Once a snapshot has been cached, reads never wait on the feed: an expired
//! snapshot is served as-is while a single background task refreshes it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use beanscout_catalog::{CatalogError, CatalogSource};
use beanscout_core::CatalogSnapshot;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Default)]
struct CacheState {
    snapshot: Option<Arc<CatalogSnapshot>>,
    stored_seq: u64,
    stored_at: Option<Instant>,
}

impl CacheState {
    fn fresh(&self, ttl: Duration, now: Instant) -> Option<Arc<CatalogSnapshot>> {
        let stored_at = self.stored_at?;
        if now.saturating_duration_since(stored_at) < ttl {
            self.snapshot.clone()
        } else {
            None
        }
    }

    /// Stores `snapshot` if `seq` is newer than what is cached. Returns whether it was stored.
    fn apply(&mut self, seq: u64, snapshot: Arc<CatalogSnapshot>, now: Instant) -> bool {
        if seq <= self.stored_seq {
            return false;
        }
        self.snapshot = Some(snapshot);
        self.stored_seq = seq;
        self.stored_at = Some(now);
        true
    }
}

pub struct CatalogCache {
    source: CatalogSource,
    ttl: Duration,
    next_seq: AtomicU64,
    state: RwLock<CacheState>,
    /// Held for the duration of a fetch; at most one fetch hits the feed.
    fetching: Mutex<()>,
    background: AtomicBool,
}

impl CatalogCache {
    #[must_use]
    pub fn new(source: CatalogSource, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            next_seq: AtomicU64::new(0),
            state: RwLock::new(CacheState::default()),
            fetching: Mutex::new(()),
            background: AtomicBool::new(false),
        }
    }

    /// Returns the cached catalog.
    ///
    /// An expired catalog is returned immediately and refreshed in the
    /// background. Only an empty cache makes the caller wait for the feed, and
    /// concurrent callers share that one fetch.
    ///
    /// # Errors
    ///
    /// Returns the source's [`CatalogError`] when nothing is cached and the
    /// fetch fails.
    pub async fn get(self: &Arc<Self>) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        {
            let state = self.state.read().await;
            if let Some(snapshot) = state.fresh(self.ttl, Instant::now()) {
                return Ok(snapshot);
            }
            if let Some(stale) = state.snapshot.clone() {
                drop(state);
                self.refresh_in_background();
                return Ok(stale);
            }
        }

        let _fetching = self.fetching.lock().await;
        if let Some(snapshot) = self.state.read().await.snapshot.clone() {
            return Ok(snapshot);
        }
        self.fetch_and_store().await
    }

    /// Spawns a refresh unless one is already running in the background.
    fn refresh_in_background(self: &Arc<Self>) {
        if self.background.swap(true, Ordering::AcqRel) {
            return;
        }
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            // Failures are logged by `refresh`; the stale snapshot stays.
            let _ = cache.refresh().await;
            cache.background.store(false, Ordering::Release);
        });
    }

    /// Whether a background refresh is in flight.
    #[cfg(test)]
    fn refreshing(&self) -> bool {
        self.background.load(Ordering::Acquire)
    }

    /// Fetches a new catalog from the source, waiting for any fetch already
    /// in progress to finish first.
    ///
    /// When the fetch fails and a catalog was cached earlier, the stale catalog
    /// is returned instead of the error.
    ///
    /// # Errors
    ///
    /// Returns the source's [`CatalogError`] when the fetch fails and nothing
    /// has been cached yet.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let _fetching = self.fetching.lock().await;
        self.fetch_and_store().await
    }

    async fn fetch_and_store(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        match self.source.fetch_catalog().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let mut state = self.state.write().await;
                if state.apply(seq, Arc::clone(&snapshot), Instant::now()) {
                    tracing::info!(seq, count = snapshot.products.len(), "catalog cache refreshed");
                } else {
                    tracing::debug!(seq, stored = state.stored_seq, "discarding superseded catalog fetch");
                }
                Ok(state.snapshot.clone().unwrap_or(snapshot))
            }
            Err(e) => {
                let state = self.state.read().await;
                if let Some(stale) = state.snapshot.clone() {
                    tracing::warn!(seq, error = %e, "catalog refresh failed; serving stale catalog");
                    Ok(stale)
                } else {
                    tracing::error!(seq, error = %e, "catalog fetch failed with nothing cached");
                    Err(e)
                }
            }
        }
    }
}
