//! # imago-client
//!
//! Catalog service clients for the imago catalog browser.
//!
//! This crate provides:
//! - [`HttpCatalogClient`]: production client over the catalog REST API
//! - [`MockCatalogClient`]: deterministic in-memory catalog, used by the
//!   session-layer tests
//!
//! # Example
//!
//! ```rust,no_run
//! use imago_client::HttpCatalogClient;
//! use imago_core::{CatalogClient, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = HttpCatalogClient::from_env();
//!     let page = client.search(SearchRequest::default()).await.unwrap();
//!     println!("{} of {} items", page.items.len(), page.total_catalog);
//! }
//! ```

pub mod http;
pub mod mock;

// Re-export core types
pub use imago_core::*;

pub use http::HttpCatalogClient;
pub use mock::{MockCall, MockCatalogClient};
