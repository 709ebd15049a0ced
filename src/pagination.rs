// src/pagination.rs
//! Incremental "load more" pagination over a post listing.
//!
//! The controller owns the listing snapshot and a phase flag. At most one
//! fetch is in flight; a second request while one is running returns the
//! current snapshot unchanged. Locks guard only short critical sections
//! and are never held across the awaited source call.

use crate::algebras::DocumentSource;
use crate::error::AppError;
use crate::model::ListingState;
use crate::normalizer::ContentNormalizer;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// No listing has been installed yet.
    Uninitialized,
    Idle,
    /// A page request is in flight.
    Fetching,
    /// The last request failed. Behaves like `Idle`; the next fetch retries.
    Failed,
}

/// Drives page-by-page loading of a listing from a [`DocumentSource`].
pub struct PaginationController {
    source: Arc<dyn DocumentSource>,
    normalizer: ContentNormalizer,
    phase: Mutex<FetchPhase>,
    state: RwLock<Option<Arc<ListingState>>>,
}

/// Restores the phase when a fetch ends, including when its future is dropped.
struct FetchGuard<'a> {
    phase: &'a Mutex<FetchPhase>,
    outcome: FetchPhase,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock() = self.outcome;
    }
}

impl PaginationController {
    pub fn new(source: Arc<dyn DocumentSource>, normalizer: ContentNormalizer) -> Self {
        Self {
            source,
            normalizer,
            phase: Mutex::new(FetchPhase::Uninitialized),
            state: RwLock::new(None),
        }
    }

    /// Installs the first page. May be called exactly once.
    pub fn initialize(&self, initial: ListingState) -> Result<(), AppError> {
        let mut phase = self.phase.lock();
        if *phase != FetchPhase::Uninitialized {
            return Err(AppError::AlreadyInitialized);
        }

        log::debug!(
            "Listing initialized with {} post(s), more pages: {}",
            initial.len(),
            initial.has_next_page()
        );
        *self.state.write() = Some(Arc::new(initial));
        *phase = FetchPhase::Idle;
        Ok(())
    }

    /// Whether another page can be requested.
    pub fn has_next_page(&self) -> bool {
        self.state
            .read()
            .as_ref()
            .is_some_and(|state| state.has_next_page())
    }

    /// The current listing, or `None` before initialization.
    pub fn snapshot(&self) -> Option<Arc<ListingState>> {
        self.state.read().clone()
    }

    pub fn phase(&self) -> FetchPhase {
        *self.phase.lock()
    }

    /// Fetches the page at the current cursor and appends it to the listing.
    ///
    /// Returns the current snapshot unchanged when a fetch is already in
    /// flight or no further page exists. On failure the listing is left as
    /// it was and the controller can be asked again.
    pub async fn fetch_next_page(&self) -> Result<Arc<ListingState>, AppError> {
        let (current, cursor, mut guard) = {
            let mut phase = self.phase.lock();
            let current = match *phase {
                FetchPhase::Uninitialized => return Err(AppError::NotInitialized),
                _ => self.snapshot().ok_or(AppError::NotInitialized)?,
            };

            if *phase == FetchPhase::Fetching {
                log::debug!("Fetch already in flight; ignoring request");
                return Ok(current);
            }
            let Some(cursor) = current.cursor().cloned() else {
                log::debug!("Listing exhausted; nothing to fetch");
                return Ok(current);
            };

            *phase = FetchPhase::Fetching;
            let guard = FetchGuard {
                phase: &self.phase,
                outcome: FetchPhase::Idle,
            };
            (current, cursor, guard)
        };

        let page = match self.source.fetch_page(&cursor).await {
            Ok(page) => page,
            Err(e) => {
                log::warn!(
                    "Failed to fetch page {}: {}",
                    current.current_page_number() + 1,
                    e
                );
                guard.outcome = FetchPhase::Failed;
                return Err(e);
            }
        };

        let normalized = self.normalizer.normalize_page(&page.results);
        if !normalized.skipped.is_empty() {
            log::warn!(
                "Page {} had {} malformed document(s)",
                page.page,
                normalized.skipped.len()
            );
        }

        let (next, added) = current.appended(normalized.posts, page.next_cursor(), page.page);
        let next = Arc::new(next);
        *self.state.write() = Some(Arc::clone(&next));

        log::info!(
            "Loaded page {}: {} new post(s), {} total",
            next.current_page_number(),
            added,
            next.len()
        );
        Ok(next)
    }
}

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("phase", &self.phase())
            .field("posts", &self.snapshot().map(|state| state.len()))
            .finish_non_exhaustive()
    }
}
