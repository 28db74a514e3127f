//! Mock catalog client for deterministic testing.
//!
//! Behaves like a small in-memory catalog service: case-insensitive
//! substring matching over each item's search text, sorting, pagination,
//! and mutating rate/delete operations. Failures are injected per
//! operation (at build time or mid-test), and per-query artificial latency
//! makes response-ordering races reproducible.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = MockCatalogClient::new()
//!     .with_items(seed_items())
//!     .with_rating_failure("rating write refused");
//!
//! let page = client.search(SearchRequest::default()).await.unwrap();
//! assert_eq!(page.total_catalog, 30);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use imago_core::defaults::is_valid_rating;
use imago_core::error::{Error, Result};
use imago_core::models::{CatalogItem, SortDirection, SortKey, TermGroup};
use imago_core::traits::{CatalogClient, SearchRequest, SearchResponse};

/// Mock catalog client for testing.
///
/// Clones share the same catalog, configuration, and call log.
#[derive(Clone)]
pub struct MockCatalogClient {
    config: Arc<Mutex<MockConfig>>,
    items: Arc<Mutex<Vec<CatalogItem>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone, Default)]
struct MockConfig {
    latency_ms: u64,
    query_delays_ms: HashMap<String, u64>,
    fail_search: Option<String>,
    fail_detail: Option<String>,
    fail_rating: Option<String>,
    fail_delete: Option<String>,
    fail_sync: Option<String>,
    fail_taxonomy: Option<String>,
    sync_message: Option<String>,
    taxonomy: Vec<TermGroup>,
}

/// One recorded client call, for assertions.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub timestamp: std::time::Instant,
}

impl MockCatalogClient {
    /// Create a mock client with an empty catalog.
    pub fn new() -> Self {
        Self {
            config: Arc::new(Mutex::new(MockConfig::default())),
            items: Arc::new(Mutex::new(Vec::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Seed the catalog. Item order is the catalog's creation order:
    /// `created_at` ascending equals the order given here.
    pub fn with_items(self, items: Vec<CatalogItem>) -> Self {
        *self.items.lock().unwrap() = items;
        self
    }

    /// Set simulated latency for all operations.
    pub fn with_latency_ms(self, latency_ms: u64) -> Self {
        self.config.lock().unwrap().latency_ms = latency_ms;
        self
    }

    /// Add extra latency for searches whose query equals `query`.
    /// Used to reproduce stale-response orderings.
    pub fn with_delay_for_query(self, query: impl Into<String>, delay_ms: u64) -> Self {
        self.config
            .lock()
            .unwrap()
            .query_delays_ms
            .insert(query.into(), delay_ms);
        self
    }

    /// Make every search fail with the given message.
    pub fn with_search_failure(self, msg: impl Into<String>) -> Self {
        self.set_search_failure(Some(msg.into()));
        self
    }

    /// Make every detail fetch fail with the given message.
    pub fn with_detail_failure(self, msg: impl Into<String>) -> Self {
        self.set_detail_failure(Some(msg.into()));
        self
    }

    /// Make every rating write fail with the given message.
    pub fn with_rating_failure(self, msg: impl Into<String>) -> Self {
        self.set_rating_failure(Some(msg.into()));
        self
    }

    /// Make every delete fail with the given message.
    pub fn with_delete_failure(self, msg: impl Into<String>) -> Self {
        self.set_delete_failure(Some(msg.into()));
        self
    }

    /// Make every sync fail with the given message.
    pub fn with_sync_failure(self, msg: impl Into<String>) -> Self {
        self.config.lock().unwrap().fail_sync = Some(msg.into());
        self
    }

    /// Make every taxonomy fetch fail with the given message.
    pub fn with_taxonomy_failure(self, msg: impl Into<String>) -> Self {
        self.config.lock().unwrap().fail_taxonomy = Some(msg.into());
        self
    }

    /// Set the message returned by sync.
    pub fn with_sync_message(self, msg: impl Into<String>) -> Self {
        self.config.lock().unwrap().sync_message = Some(msg.into());
        self
    }

    /// Set the taxonomy returned by taxonomy fetches.
    pub fn with_taxonomy(self, groups: Vec<TermGroup>) -> Self {
        self.config.lock().unwrap().taxonomy = groups;
        self
    }

    /// Toggle search failure mid-test. `None` restores success.
    pub fn set_search_failure(&self, msg: Option<String>) {
        self.config.lock().unwrap().fail_search = msg;
    }

    /// Toggle detail failure mid-test. `None` restores success.
    pub fn set_detail_failure(&self, msg: Option<String>) {
        self.config.lock().unwrap().fail_detail = msg;
    }

    /// Toggle rating failure mid-test. `None` restores success.
    pub fn set_rating_failure(&self, msg: Option<String>) {
        self.config.lock().unwrap().fail_rating = msg;
    }

    /// Toggle delete failure mid-test. `None` restores success.
    pub fn set_delete_failure(&self, msg: Option<String>) {
        self.config.lock().unwrap().fail_delete = msg;
    }

    /// Current catalog contents, in creation order.
    pub fn items(&self) -> Vec<CatalogItem> {
        self.items.lock().unwrap().clone()
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Number of logged calls for one operation name.
    pub fn call_count(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Get number of search calls.
    pub fn search_call_count(&self) -> usize {
        self.call_count("search")
    }

    /// Get number of detail calls.
    pub fn detail_call_count(&self) -> usize {
        self.call_count("detail")
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
            timestamp: std::time::Instant::now(),
        });
    }

    // Locks are never held across sleeps; each operation snapshots the
    // config values it needs first.
    fn config_snapshot(&self) -> MockConfig {
        self.config.lock().unwrap().clone()
    }

    async fn simulate_latency(&self, latency_ms: u64) {
        if latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(latency_ms)).await;
        }
    }
}

impl Default for MockCatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
        self.log_call(
            "search",
            &format!(
                "query={} page={} limit={}",
                req.query.as_deref().unwrap_or(""),
                req.page,
                req.page_size
            ),
        );
        let config = self.config_snapshot();
        self.simulate_latency(config.latency_ms).await;
        if let Some(q) = req.query.as_deref() {
            if let Some(delay) = config.query_delays_ms.get(q) {
                self.simulate_latency(*delay).await;
            }
        }
        if let Some(msg) = config.fail_search {
            return Err(Error::Request(msg));
        }

        let items = self.items.lock().unwrap().clone();
        let total_catalog = items.len() as i64;

        let needle = req.query.as_deref().unwrap_or("").to_lowercase();
        let mut matched: Vec<(usize, CatalogItem)> = items
            .into_iter()
            .enumerate()
            .filter(|(_, item)| {
                needle.is_empty() || item.search_text.to_lowercase().contains(&needle)
            })
            .collect();

        match req.sort_key {
            SortKey::CreatedAt => {
                if req.sort_direction == SortDirection::Desc {
                    matched.reverse();
                }
            }
            SortKey::Rating => {
                matched.sort_by(|(ia, a), (ib, b)| {
                    let ord = a.rating.cmp(&b.rating);
                    let ord = match req.sort_direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    };
                    // Ties keep creation order
                    ord.then(ia.cmp(ib))
                });
            }
        }

        let total_matches = matched.len() as i64;
        let start = ((req.page - 1).max(0) * req.page_size) as usize;
        let page: Vec<CatalogItem> = matched
            .into_iter()
            .skip(start)
            .take(req.page_size.max(0) as usize)
            .map(|(_, item)| item)
            .collect();

        Ok(SearchResponse {
            items: page,
            total_matches,
            total_catalog,
        })
    }

    async fn detail(&self, id: i64) -> Result<CatalogItem> {
        self.log_call("detail", &id.to_string());
        let config = self.config_snapshot();
        self.simulate_latency(config.latency_ms).await;
        if let Some(msg) = config.fail_detail {
            return Err(Error::Request(msg));
        }

        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(Error::ItemNotFound(id))
    }

    async fn set_rating(&self, id: i64, rating: i32) -> Result<()> {
        self.log_call("set_rating", &format!("{}={}", id, rating));
        let config = self.config_snapshot();
        self.simulate_latency(config.latency_ms).await;
        if let Some(msg) = config.fail_rating {
            return Err(Error::Request(msg));
        }
        if !is_valid_rating(rating) {
            return Err(Error::InvalidInput(format!(
                "Rating rejected: {} is outside 0-5",
                rating
            )));
        }

        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.rating = rating;
                Ok(())
            }
            None => Err(Error::ItemNotFound(id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.log_call("delete", &id.to_string());
        let config = self.config_snapshot();
        self.simulate_latency(config.latency_ms).await;
        if let Some(msg) = config.fail_delete {
            return Err(Error::Request(msg));
        }

        let mut items = self.items.lock().unwrap();
        match items.iter().position(|item| item.id == id) {
            Some(pos) => {
                items.remove(pos);
                Ok(())
            }
            None => Err(Error::ItemNotFound(id)),
        }
    }

    async fn sync(&self) -> Result<String> {
        self.log_call("sync", "");
        let config = self.config_snapshot();
        self.simulate_latency(config.latency_ms).await;
        if let Some(msg) = config.fail_sync {
            return Err(Error::Request(msg));
        }

        Ok(config
            .sync_message
            .unwrap_or_else(|| "Synced 0 new images.".to_string()))
    }

    async fn taxonomy(&self) -> Result<Vec<TermGroup>> {
        self.log_call("taxonomy", "");
        let config = self.config_snapshot();
        self.simulate_latency(config.latency_ms).await;
        if let Some(msg) = config.fail_taxonomy {
            return Err(Error::Request(msg));
        }

        Ok(config.taxonomy)
    }
}
