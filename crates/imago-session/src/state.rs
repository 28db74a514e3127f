//! Immutable session state: query parameters and the visible result page.
//!
//! Both structs here are plain values. Every mutation is expressed as a
//! transition method that returns a new value, and the session replaces
//! its snapshot wholesale under a write lock. A reader never observes a
//! list that disagrees with its counts or page number.

use serde::{Deserialize, Serialize};

use imago_core::defaults::{self, FIRST_PAGE, PAGE_SIZE};
use imago_core::error::{Error, Result};
use imago_core::models::{CatalogItem, SortDirection, SortKey};
use imago_core::traits::SearchRequest;

/// Ceil-divide matches into pages; 1 when nothing matches.
pub fn total_pages_for(total_matches: i64, page_size: i64) -> i64 {
    if total_matches <= 0 || page_size <= 0 {
        return FIRST_PAGE;
    }
    (total_matches + page_size - 1) / page_size
}

/// Query parameters for the current browsing session.
///
/// Changing the query text, sort, or page size returns to the first
/// page; only explicit page navigation keeps the rest of the state
/// fixed while the page number moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryState {
    /// Free-text query; empty means "match everything".
    pub query: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub page_size: i64,
    /// 1-based page number.
    pub page: i64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            page_size: PAGE_SIZE,
            page: FIRST_PAGE,
        }
    }
}

impl QueryState {
    /// New query text, back to the first page.
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: FIRST_PAGE,
            ..self.clone()
        }
    }

    /// New sort order, back to the first page.
    pub fn with_sort(&self, key: SortKey, direction: SortDirection) -> Self {
        Self {
            sort_key: key,
            sort_direction: direction,
            page: FIRST_PAGE,
            ..self.clone()
        }
    }

    /// New page size, back to the first page.
    ///
    /// Sizes outside the fixed choice set are rejected.
    pub fn with_page_size(&self, page_size: i64) -> Result<Self> {
        if !defaults::is_valid_page_size(page_size) {
            return Err(Error::InvalidInput(format!(
                "page size {} is not one of {:?}",
                page_size,
                defaults::PAGE_SIZE_CHOICES
            )));
        }
        Ok(Self {
            page_size,
            page: FIRST_PAGE,
            ..self.clone()
        })
    }

    /// Jump to a page, every other parameter fixed. Rejects pages below 1.
    pub fn with_page(&self, page: i64) -> Result<Self> {
        if page < FIRST_PAGE {
            return Err(Error::InvalidInput(format!(
                "page {} is below {}",
                page, FIRST_PAGE
            )));
        }
        Ok(Self {
            page,
            ..self.clone()
        })
    }

    /// Back to the first page, every other parameter fixed.
    pub fn to_first_page(&self) -> Self {
        Self {
            page: FIRST_PAGE,
            ..self.clone()
        }
    }

    /// The request this state asks the catalog service for.
    /// An empty query string is sent as no query at all.
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            query: if self.query.is_empty() {
                None
            } else {
                Some(self.query.clone())
            },
            page: self.page,
            page_size: self.page_size,
            sort_key: self.sort_key,
            sort_direction: self.sort_direction,
        }
    }
}

/// One immutable snapshot of the browsing session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub query: QueryState,
    /// The visible page, at most `query.page_size` items.
    pub items: Vec<CatalogItem>,
    /// Items matching the current query across all pages.
    pub total_matches: i64,
    /// Items in the whole catalog, ignoring the query.
    pub total_catalog: i64,
    /// Item shown in the detail view, if any.
    pub focus: Option<CatalogItem>,
}

impl SessionSnapshot {
    /// Page count for the current match total; 1 when nothing matches.
    pub fn total_pages(&self) -> i64 {
        total_pages_for(self.total_matches, self.query.page_size)
    }

    /// Id of the focused item, if any.
    pub fn focused_id(&self) -> Option<i64> {
        self.focus.as_ref().map(|item| item.id)
    }

    /// Apply a fetched page: parameters, list, and counts move as one unit.
    ///
    /// Zero matches pins the page number back to 1. Focus is carried
    /// unchanged; a focused item that no longer resolves is caught at
    /// the next navigation step instead.
    pub fn with_results(
        &self,
        query: QueryState,
        items: Vec<CatalogItem>,
        total_matches: i64,
        total_catalog: i64,
    ) -> Self {
        let mut query = query;
        if total_matches == 0 {
            query.page = FIRST_PAGE;
        }
        Self {
            query,
            items,
            total_matches,
            total_catalog,
            focus: self.focus.clone(),
        }
    }

    /// Replace one item's rating in the visible list.
    ///
    /// The focused copy is left alone; the list is the source of truth
    /// for ratings.
    pub fn with_rating(&self, id: i64, rating: i32) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    let mut updated = item.clone();
                    updated.rating = rating;
                    updated
                } else {
                    item.clone()
                }
            })
            .collect();
        Self {
            items,
            ..self.clone()
        }
    }

    /// Focus an item for the detail view.
    pub fn with_focus(&self, item: CatalogItem) -> Self {
        Self {
            focus: Some(item),
            ..self.clone()
        }
    }

    /// Clear the detail-view focus.
    pub fn without_focus(&self) -> Self {
        Self {
            focus: None,
            ..self.clone()
        }
    }
}
