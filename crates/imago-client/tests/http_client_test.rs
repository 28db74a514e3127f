//! Integration tests for the HTTP catalog client.
//!
//! These tests verify the wire contract: request shapes (paths, query
//! parameters, JSON bodies) and response/status mapping.

use std::time::Duration;

use imago_client::HttpCatalogClient;
use imago_core::{
    CatalogClient, Error, SearchRequest, SortDirection, SortKey, TermKind,
};
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn list_body() -> serde_json::Value {
    serde_json::json!({
        "images": [
            {"id": 1, "filename": "00001.png", "image_path": "images/00001.png", "rating": 3},
            {"id": 2, "filename": "00002.png", "image_path": "images/00002.png", "rating": 0}
        ],
        "total_search_results_count": 30,
        "total_database_count": 120
    })
}

#[tokio::test]
async fn test_search_sends_pagination_and_sort_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .and(query_param("query", "forest"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "50"))
        .and(query_param("sort_by", "rating"))
        .and(query_param("sort_order", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let result = client
        .search(SearchRequest {
            query: Some("forest".to_string()),
            page: 2,
            page_size: 50,
            sort_key: SortKey::Rating,
            sort_direction: SortDirection::Asc,
        })
        .await;

    assert!(result.is_ok(), "Request should succeed: {:?}", result.err());
    let page = result.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_matches, 30);
    assert_eq!(page.total_catalog, 120);
    // image_path maps to the model's path field
    assert_eq!(page.items[0].path, "images/00001.png");
    // List responses omit parameter texts
    assert!(page.items[0].parameters.is_empty());
}

#[tokio::test]
async fn test_search_omits_empty_query_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .and(query_param_is_missing("query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());

    // None and Some("") both mean "match everything"
    let result = client.search(SearchRequest::default()).await;
    assert!(result.is_ok(), "Request should succeed: {:?}", result.err());

    let result = client
        .search(SearchRequest {
            query: Some(String::new()),
            ..Default::default()
        })
        .await;
    assert!(result.is_ok(), "Request should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_search_server_error_maps_to_request_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index corrupt"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let err = client.search(SearchRequest::default()).await.unwrap_err();

    match err {
        Error::Request(msg) => {
            assert!(msg.contains("500"), "Expected status in message: {}", msg);
            assert!(msg.contains("index corrupt"));
        }
        other => panic!("Expected Request error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_detail_returns_populated_item() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "filename": "00007.png",
            "image_path": "images/00007.png",
            "rating": 5,
            "parameters": "prompt: misty forest\nsteps: 20",
            "search_text": "prompt: misty forest steps: 20"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let item = client.detail(7).await.unwrap();

    assert_eq!(item.id, 7);
    assert_eq!(item.rating, 5);
    assert!(item.parameters.contains("misty forest"));
}

#[tokio::test]
async fn test_detail_not_found_maps_to_item_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/42"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"detail": "Image not found"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let err = client.detail(42).await.unwrap_err();

    assert!(matches!(err, Error::ItemNotFound(42)), "got {:?}", err);
}

#[tokio::test]
async fn test_set_rating_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/images/3/rate"))
        .and(body_json(serde_json::json!({"rating": 4})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"message": "Rating updated"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let result = client.set_rating(3, 4).await;

    assert!(result.is_ok(), "Request should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_set_rating_rejected_maps_to_invalid_input() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/images/3/rate"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("Rating must be between 0 and 5"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let err = client.set_rating(3, 9).await.unwrap_err();

    match err {
        Error::InvalidInput(msg) => assert!(msg.contains("between 0 and 5")),
        other => panic!("Expected InvalidInput error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_item() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/images/9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"message": "Image deleted"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let result = client.delete(9).await;

    assert!(result.is_ok(), "Request should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_delete_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/images/9"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let err = client.delete(9).await.unwrap_err();

    assert!(matches!(err, Error::ItemNotFound(9)), "got {:?}", err);
}

#[tokio::test]
async fn test_sync_returns_service_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/images/sync"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"message": "Synced 3 new images."})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let message = client.sync().await.unwrap();

    assert_eq!(message, "Synced 3 new images.");
}

#[tokio::test]
async fn test_taxonomy_grouped_in_first_seen_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/prompt_elements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "group_name": "Style", "item_name": "Oil", "value": "oil painting", "type": "radio"},
            {"id": 2, "group_name": "Mood", "item_name": "Calm", "value": "calm", "type": "checkbox"},
            {"id": 3, "group_name": "Style", "item_name": "Ink", "value": "ink sketch", "type": "radio"},
            {"id": 4, "group_name": "Mood", "item_name": "Tense", "value": "tense", "type": "checkbox"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::new(mock_server.uri());
    let groups = client.taxonomy().await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "Style");
    assert_eq!(groups[0].kind, TermKind::Single);
    assert_eq!(groups[0].terms.len(), 2);
    assert_eq!(groups[0].terms[0].label, "Oil");
    assert_eq!(groups[0].terms[0].value, "oil painting");
    assert_eq!(groups[1].name, "Mood");
    assert_eq!(groups[1].kind, TermKind::Multi);
}

#[tokio::test]
async fn test_request_timeout_maps_to_request_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = HttpCatalogClient::with_timeout(mock_server.uri(), Duration::from_millis(50));
    let err = client.search(SearchRequest::default()).await.unwrap_err();

    assert!(matches!(err, Error::Request(_)), "got {:?}", err);
}
