//! # imago-session
//!
//! Browsing-session controller for the imago catalog browser: query and
//! pagination state, detail-view navigation across page boundaries,
//! rating and deletion flows, and prompt composition from the term
//! taxonomy.
//!
//! The session talks to the catalog through the [`CatalogClient`] trait
//! and emits a [`SessionEvent`] after each successful mutation.
//! Rendering and notification display live outside this crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use imago_client::HttpCatalogClient;
//! use imago_session::Session;
//!
//! #[tokio::main]
//! async fn main() -> imago_session::Result<()> {
//!     let session = Session::new(Arc::new(HttpCatalogClient::from_env()));
//!     session.set_query("misty forest").await?;
//!
//!     let snapshot = session.snapshot().await;
//!     println!(
//!         "page {} of {}, {} matches",
//!         snapshot.query.page,
//!         snapshot.total_pages(),
//!         snapshot.total_matches
//!     );
//!     Ok(())
//! }
//! ```

pub mod composer;
pub mod deletion;
pub mod navigator;
pub mod rating;
pub mod session;
pub mod state;

// Re-export core types
pub use imago_core::*;

pub use composer::PromptComposer;
pub use deletion::DeletionCoordinator;
pub use navigator::{DetailNavigator, Direction};
pub use rating::RatingMutator;
pub use session::Session;
pub use state::{total_pages_for, QueryState, SessionSnapshot};
