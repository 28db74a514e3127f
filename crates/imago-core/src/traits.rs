//! Core traits for the imago catalog browser.
//!
//! These traits define the boundary to the remote catalog service,
//! enabling pluggable transports and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{CatalogItem, SortDirection, SortKey, TermGroup};

// =============================================================================
// CATALOG CLIENT
// =============================================================================

/// Request for one page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query. `None` matches everything.
    pub query: Option<String>,
    /// 1-based page number.
    pub page: i64,
    /// Items per page.
    pub page_size: i64,
    /// Field the service orders by.
    pub sort_key: SortKey,
    /// Order direction.
    pub sort_direction: SortDirection,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            page: crate::defaults::FIRST_PAGE,
            page_size: crate::defaults::PAGE_SIZE,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

/// Response for one page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Items for the requested page, in service sort order.
    pub items: Vec<CatalogItem>,
    /// Count of items matching the query.
    pub total_matches: i64,
    /// Count of all items in the catalog, regardless of query.
    pub total_catalog: i64,
}

/// Client for the remote catalog service.
///
/// All operations are request/response; none stream. Failures surface as
/// `Err` and never as partial success.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of catalog results.
    async fn search(&self, req: SearchRequest) -> Result<SearchResponse>;

    /// Fetch one item with its parameter texts populated.
    async fn detail(&self, id: i64) -> Result<CatalogItem>;

    /// Set an item's rating.
    async fn set_rating(&self, id: i64, rating: i32) -> Result<()>;

    /// Remove an item from the catalog.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Trigger a server-side re-index of the catalog.
    /// Returns the service's human-readable summary message.
    async fn sync(&self) -> Result<String>;

    /// Fetch the prompt taxonomy as ordered term groups.
    async fn taxonomy(&self) -> Result<Vec<TermGroup>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Term, TermKind};

    // =============================================================================
    // Request/Response Tests
    // =============================================================================

    #[test]
    fn test_search_request_default() {
        let req = SearchRequest::default();
        assert!(req.query.is_none());
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 25);
        assert_eq!(req.sort_key, SortKey::CreatedAt);
        assert_eq!(req.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_search_request_clone() {
        let req = SearchRequest {
            query: Some("forest".to_string()),
            page: 3,
            page_size: 50,
            sort_key: SortKey::Rating,
            sort_direction: SortDirection::Asc,
        };
        let cloned = req.clone();
        assert_eq!(cloned.query.as_deref(), Some("forest"));
        assert_eq!(cloned.page, 3);
        assert_eq!(cloned.page_size, 50);
    }

    #[test]
    fn test_search_request_serialization() {
        let req = SearchRequest {
            query: Some("castle".to_string()),
            page: 2,
            page_size: 100,
            sort_key: SortKey::Rating,
            sort_direction: SortDirection::Desc,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""query":"castle""#));
        assert!(json.contains(r#""sort_key":"rating""#));
        assert!(json.contains(r#""sort_direction":"desc""#));
    }

    #[test]
    fn test_search_response_serialization() {
        let resp = SearchResponse {
            items: vec![],
            total_matches: 0,
            total_catalog: 120,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""total_matches":0"#));
        assert!(json.contains(r#""total_catalog":120"#));
    }

    #[test]
    fn test_search_request_debug() {
        let req = SearchRequest::default();
        let debug = format!("{:?}", req);
        assert!(debug.contains("SearchRequest"));
        assert!(debug.contains("page"));
    }

    // =============================================================================
    // Trait Object Tests
    // =============================================================================

    struct StubClient;

    #[async_trait]
    impl CatalogClient for StubClient {
        async fn search(&self, _req: SearchRequest) -> Result<SearchResponse> {
            Ok(SearchResponse {
                items: vec![],
                total_matches: 0,
                total_catalog: 0,
            })
        }

        async fn detail(&self, id: i64) -> Result<CatalogItem> {
            Ok(CatalogItem {
                id,
                filename: "stub.png".to_string(),
                path: "img/stub.png".to_string(),
                parameters: String::new(),
                search_text: String::new(),
                rating: 0,
            })
        }

        async fn set_rating(&self, _id: i64, _rating: i32) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _id: i64) -> Result<()> {
            Ok(())
        }

        async fn sync(&self) -> Result<String> {
            Ok("Synced 0 new images.".to_string())
        }

        async fn taxonomy(&self) -> Result<Vec<TermGroup>> {
            Ok(vec![TermGroup {
                name: "Style".to_string(),
                kind: TermKind::Single,
                terms: vec![Term {
                    label: "Oil".to_string(),
                    value: "oil painting".to_string(),
                }],
            }])
        }
    }

    #[tokio::test]
    async fn test_catalog_client_is_object_safe() {
        let client: Box<dyn CatalogClient> = Box::new(StubClient);
        let resp = client.search(SearchRequest::default()).await.unwrap();
        assert_eq!(resp.total_matches, 0);

        let item = client.detail(7).await.unwrap();
        assert_eq!(item.id, 7);

        let groups = client.taxonomy().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, TermKind::Single);
    }
}
