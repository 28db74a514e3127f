//! Session controller: owns the snapshot and issues list-replacing fetches.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, instrument, warn};

use imago_core::defaults::EVENT_BUS_CAPACITY;
use imago_core::error::Result;
use imago_core::events::{EventBus, EventEnvelope, SessionEvent};
use imago_core::models::{SortDirection, SortKey};
use imago_core::traits::CatalogClient;

use crate::composer::PromptComposer;
use crate::deletion::DeletionCoordinator;
use crate::navigator::DetailNavigator;
use crate::rating::RatingMutator;
use crate::state::{total_pages_for, QueryState, SessionSnapshot};

/// Shared internals behind every session handle.
pub(crate) struct SessionCore {
    pub(crate) client: Arc<dyn CatalogClient>,
    pub(crate) events: EventBus,
    pub(crate) state: RwLock<SessionSnapshot>,
    /// Monotonic tag for list-replacing fetches; only the newest applies.
    fetch_seq: AtomicU64,
    /// Outstanding list-affecting operations.
    in_flight: AtomicUsize,
}

/// RAII guard for the loading gauge; decremented on every exit path.
pub(crate) struct LoadingGuard<'a> {
    gauge: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn new(gauge: &'a AtomicUsize) -> Self {
        gauge.fetch_add(1, Ordering::SeqCst);
        Self { gauge }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.gauge.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SessionCore {
    pub(crate) fn begin_loading(&self) -> LoadingGuard<'_> {
        LoadingGuard::new(&self.in_flight)
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Claim the next fetch sequence number. A response is applied only
    /// while its number is still the latest claimed.
    pub(crate) fn next_fetch_seq(&self) -> u64 {
        self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn latest_fetch_seq(&self) -> u64 {
        self.fetch_seq.load(Ordering::SeqCst)
    }

    /// Fetch the page `query` describes and apply it, unless a newer
    /// fetch was issued while this one was outstanding.
    ///
    /// A page that comes back empty while matches still exist means the
    /// page number ran past the end (deletions shrank the result set, or
    /// a jump overshot); the last valid page is fetched instead. The page
    /// number strictly decreases on each retry, so the loop terminates.
    /// On error the previous snapshot stays visible.
    pub(crate) async fn fetch_and_apply(&self, query: QueryState) -> Result<()> {
        let _loading = self.begin_loading();
        let seq = self.next_fetch_seq();
        let mut query = query;

        loop {
            let response = match self.client.search(query.to_request()).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        subsystem = "session",
                        query = %query.query,
                        page = query.page,
                        fetch_seq = seq,
                        error = %e,
                        "Fetch failed, keeping last good page"
                    );
                    return Err(e);
                }
            };

            let last_page = total_pages_for(response.total_matches, query.page_size);
            if response.items.is_empty() && response.total_matches > 0 && query.page > last_page {
                debug!(
                    subsystem = "session",
                    page = query.page,
                    total_matches = response.total_matches,
                    fetch_seq = seq,
                    "Page past end, refetching last page"
                );
                query.page = last_page;
                continue;
            }

            let mut state = self.state.write().await;
            if self.latest_fetch_seq() != seq {
                debug!(
                    subsystem = "session",
                    fetch_seq = seq,
                    stale = true,
                    "Discarding stale fetch response"
                );
                return Ok(());
            }
            let next = state.with_results(
                query,
                response.items,
                response.total_matches,
                response.total_catalog,
            );
            *state = next;
            debug!(
                subsystem = "session",
                page = state.query.page,
                result_count = state.items.len(),
                total_matches = state.total_matches,
                fetch_seq = seq,
                "Applied page"
            );
            return Ok(());
        }
    }
}

/// Browsing session over a remote catalog.
///
/// Owns the query/pagination state and hands mutation flows to its
/// sub-controllers, all sharing one snapshot:
/// - `navigator`: detail-view focus and cross-page stepping
/// - `ratings`: rating writes
/// - `deletions`: deletes with page reconciliation
///
/// Cloning is cheap and every clone operates on the same session.
/// Construction performs no I/O; the first [`refresh`](Session::refresh)
/// or parameter change populates the list.
#[derive(Clone)]
pub struct Session {
    core: Arc<SessionCore>,
    /// Detail-view navigation.
    pub navigator: DetailNavigator,
    /// Rating writes.
    pub ratings: RatingMutator,
    /// Deletion with page reconciliation.
    pub deletions: DeletionCoordinator,
}

impl Session {
    /// Create a session over the given catalog client.
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        let core = Arc::new(SessionCore {
            client,
            events: EventBus::new(EVENT_BUS_CAPACITY),
            state: RwLock::new(SessionSnapshot::default()),
            fetch_seq: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        });
        Self {
            navigator: DetailNavigator::new(Arc::clone(&core)),
            ratings: RatingMutator::new(Arc::clone(&core)),
            deletions: DeletionCoordinator::new(Arc::clone(&core)),
            core,
        }
    }

    /// Current state snapshot.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.core.state.read().await.clone()
    }

    /// True while at least one list-affecting operation is outstanding.
    pub fn is_loading(&self) -> bool {
        self.core.is_loading()
    }

    /// Subscribe to mutation events.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.core.events.subscribe()
    }

    /// A prompt composer sharing this session's catalog client.
    /// Each composer caches the taxonomy for its own lifetime.
    pub fn composer(&self) -> PromptComposer {
        PromptComposer::new(Arc::clone(&self.core.client))
    }

    /// Refetch the current page with unchanged parameters.
    #[instrument(skip(self), fields(subsystem = "session", component = "session", op = "refresh"))]
    pub async fn refresh(&self) -> Result<()> {
        let query = self.core.state.read().await.query.clone();
        self.core.fetch_and_apply(query).await
    }

    /// Set the query text and fetch its first page.
    #[instrument(skip(self, query), fields(subsystem = "session", component = "session", op = "set_query"))]
    pub async fn set_query(&self, query: impl Into<String>) -> Result<()> {
        let next = self.core.state.read().await.query.with_query(query);
        self.core.fetch_and_apply(next).await
    }

    /// Set the sort order and fetch the first page.
    #[instrument(skip(self), fields(subsystem = "session", component = "session", op = "set_sort"))]
    pub async fn set_sort(&self, key: SortKey, direction: SortDirection) -> Result<()> {
        let next = self.core.state.read().await.query.with_sort(key, direction);
        self.core.fetch_and_apply(next).await
    }

    /// Set the page size and fetch the first page. Rejects sizes outside
    /// the fixed choice set without touching the current list.
    #[instrument(skip(self), fields(subsystem = "session", component = "session", op = "set_page_size"))]
    pub async fn set_page_size(&self, page_size: i64) -> Result<()> {
        let next = self
            .core
            .state
            .read()
            .await
            .query
            .with_page_size(page_size)?;
        self.core.fetch_and_apply(next).await
    }

    /// Jump to a 1-based page. A jump past the end lands on the last
    /// valid page; pages below 1 are rejected.
    #[instrument(skip(self), fields(subsystem = "session", component = "session", op = "go_to_page"))]
    pub async fn go_to_page(&self, page: i64) -> Result<()> {
        let next = self.core.state.read().await.query.with_page(page)?;
        self.core.fetch_and_apply(next).await
    }

    /// Ask the catalog service to re-index its store, then reload the
    /// first page. Returns the service's summary message.
    #[instrument(skip(self), fields(subsystem = "session", component = "session", op = "sync"))]
    pub async fn sync(&self) -> Result<String> {
        let _loading = self.core.begin_loading();
        let message = self.core.client.sync().await?;

        let first_page = self.core.state.read().await.query.to_first_page();
        self.core.fetch_and_apply(first_page).await?;

        self.core.events.emit(SessionEvent::CatalogSynced {
            message: message.clone(),
        });
        debug!(message = %message, "Catalog synced");
        Ok(message)
    }
}
