//! HTTP client for the catalog service REST API.
//!
//! Endpoints live under one base URL (default `http://localhost:8000/api`):
//! `GET /images` for paged search, `GET /images/{id}` for detail,
//! `PUT /images/{id}/rate` and `DELETE /images/{id}` for mutations,
//! `POST /images/sync` to trigger re-indexing, and `GET /prompt_elements`
//! for the flat prompt taxonomy.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use imago_core::defaults::{
    CATALOG_URL, ENV_CATALOG_URL, ENV_HTTP_TIMEOUT_SECS, HTTP_TIMEOUT_SECS, SLOW_REQUEST_MS,
};
use imago_core::error::{Error, Result};
use imago_core::models::{CatalogItem, Term, TermGroup, TermKind};
use imago_core::traits::{CatalogClient, SearchRequest, SearchResponse};

/// Catalog service client over HTTP.
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a client for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(HTTP_TIMEOUT_SECS))
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        info!("Initializing catalog client: url={}", base_url);

        Self { client, base_url }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var(ENV_CATALOG_URL).unwrap_or_else(|_| CATALOG_URL.to_string());
        let timeout_secs = match std::env::var(ENV_HTTP_TIMEOUT_SECS) {
            Ok(val) => match val.parse::<u64>() {
                Ok(secs) => secs,
                Err(_) => {
                    warn!(value = %val, "Invalid IMAGO_HTTP_TIMEOUT_SECS, using default");
                    HTTP_TIMEOUT_SECS
                }
            },
            Err(_) => HTTP_TIMEOUT_SECS,
        };

        Self::with_timeout(base_url, Duration::from_secs(timeout_secs))
    }

    /// The base URL requests are issued against (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpCatalogClient {
    fn default() -> Self {
        Self::new(CATALOG_URL)
    }
}

// ============================================================================
// Wire DTOs
// ============================================================================

#[derive(Deserialize)]
struct ItemDto {
    id: i64,
    filename: String,
    image_path: String,
    rating: i32,
    #[serde(default)]
    parameters: String,
    #[serde(default)]
    search_text: String,
}

impl From<ItemDto> for CatalogItem {
    fn from(dto: ItemDto) -> Self {
        CatalogItem {
            id: dto.id,
            filename: dto.filename,
            path: dto.image_path,
            parameters: dto.parameters,
            search_text: dto.search_text,
            rating: dto.rating,
        }
    }
}

#[derive(Deserialize)]
struct ListDto {
    images: Vec<ItemDto>,
    total_search_results_count: i64,
    total_database_count: i64,
}

#[derive(Serialize)]
struct RateRequest {
    rating: i32,
}

#[derive(Deserialize)]
struct SyncDto {
    message: String,
}

#[derive(Deserialize)]
struct TaxonomyElementDto {
    group_name: String,
    item_name: String,
    value: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Fold the service's flat element list into term groups, keyed by group
/// name in first-seen order.
///
/// A group's kind comes from its first element; later elements disagreeing
/// with it are kept but logged. Unknown kind strings fall back to
/// multi-select.
fn group_elements(elements: Vec<TaxonomyElementDto>) -> Vec<TermGroup> {
    let mut groups: Vec<TermGroup> = Vec::new();

    for element in elements {
        let kind = TermKind::from_str_loose(&element.kind).unwrap_or_else(|| {
            warn!(
                category = %element.group_name,
                value = %element.kind,
                "Unknown taxonomy element type, treating as multi-select"
            );
            TermKind::Multi
        });
        let term = Term {
            label: element.item_name,
            value: element.value,
        };

        match groups.iter_mut().find(|g| g.name == element.group_name) {
            Some(group) => {
                if group.kind != kind {
                    warn!(
                        category = %group.name,
                        "Taxonomy element kind disagrees with its category, keeping category kind"
                    );
                }
                group.terms.push(term);
            }
            None => groups.push(TermGroup {
                name: element.group_name,
                kind,
                terms: vec![term],
            }),
        }
    }

    groups
}

// ============================================================================
// CatalogClient implementation
// ============================================================================

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    #[instrument(skip(self, req), fields(subsystem = "client", component = "http", op = "search", page = req.page, page_size = req.page_size))]
    async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
        let start = Instant::now();

        let mut params: Vec<(&str, String)> = vec![
            ("page", req.page.to_string()),
            ("limit", req.page_size.to_string()),
            ("sort_by", req.sort_key.to_string()),
            ("sort_order", req.sort_direction.to_string()),
        ];
        // An empty query matches everything and is left off the wire.
        if let Some(q) = req.query.as_deref().filter(|q| !q.is_empty()) {
            params.push(("query", q.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/images", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!(
                "Catalog service returned {}: {}",
                status, body
            )));
        }

        let result: ListDto = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))?;

        let items: Vec<CatalogItem> = result.images.into_iter().map(CatalogItem::from).collect();
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            result_count = items.len(),
            total_matches = result.total_search_results_count,
            duration_ms = elapsed,
            "Search complete"
        );
        if elapsed > SLOW_REQUEST_MS {
            warn!(duration_ms = elapsed, slow = true, "Slow search operation");
        }

        Ok(SearchResponse {
            items,
            total_matches: result.total_search_results_count,
            total_catalog: result.total_database_count,
        })
    }

    #[instrument(skip(self, id), fields(subsystem = "client", component = "http", op = "detail", item_id = id))]
    async fn detail(&self, id: i64) -> Result<CatalogItem> {
        let response = self
            .client
            .get(format!("{}/images/{}", self.base_url, id))
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::ItemNotFound(id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!(
                "Catalog service returned {}: {}",
                status, body
            )));
        }

        let dto: ItemDto = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))?;

        Ok(dto.into())
    }

    #[instrument(skip(self, id, rating), fields(subsystem = "client", component = "http", op = "set_rating", item_id = id, rating))]
    async fn set_rating(&self, id: i64, rating: i32) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/images/{}/rate", self.base_url, id))
            .json(&RateRequest { rating })
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        match status {
            StatusCode::BAD_REQUEST => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::InvalidInput(format!("Rating rejected: {}", body)))
            }
            StatusCode::NOT_FOUND => Err(Error::ItemNotFound(id)),
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Request(format!(
                    "Catalog service returned {}: {}",
                    status, body
                )))
            }
            _ => {
                debug!("Rating applied");
                Ok(())
            }
        }
    }

    #[instrument(skip(self, id), fields(subsystem = "client", component = "http", op = "delete", item_id = id))]
    async fn delete(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/images/{}", self.base_url, id))
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::ItemNotFound(id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!(
                "Catalog service returned {}: {}",
                status, body
            )));
        }

        debug!("Item deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "sync"))]
    async fn sync(&self) -> Result<String> {
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/images/sync", self.base_url))
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!(
                "Catalog service returned {}: {}",
                status, body
            )));
        }

        let result: SyncDto = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))?;

        let elapsed = start.elapsed().as_millis() as u64;
        info!(duration_ms = elapsed, message = %result.message, "Sync complete");

        Ok(result.message)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "taxonomy"))]
    async fn taxonomy(&self) -> Result<Vec<TermGroup>> {
        let response = self
            .client
            .get(format!("{}/prompt_elements", self.base_url))
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!(
                "Catalog service returned {}: {}",
                status, body
            )));
        }

        let elements: Vec<TaxonomyElementDto> = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))?;

        let groups = group_elements(elements);
        debug!(result_count = groups.len(), "Taxonomy loaded");

        Ok(groups)
    }
}
