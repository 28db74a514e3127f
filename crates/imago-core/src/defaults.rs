//! Centralized default constants for the imago catalog browser.
//!
//! **This module is the single source of truth** for all shared default values.
//! The session layer and the catalog clients reference these constants instead
//! of defining their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for catalog browsing.
pub const PAGE_SIZE: i64 = 25;

/// The fixed set of selectable page sizes, ascending.
pub const PAGE_SIZE_CHOICES: [i64; 4] = [25, 50, 100, 200];

/// First page number. Pages are 1-based throughout.
pub const FIRST_PAGE: i64 = 1;

/// Returns true if `n` is one of the selectable page sizes.
pub fn is_valid_page_size(n: i64) -> bool {
    PAGE_SIZE_CHOICES.contains(&n)
}

// =============================================================================
// RATING
// =============================================================================

/// Minimum item rating. Zero means unrated.
pub const RATING_MIN: i32 = 0;

/// Maximum item rating.
pub const RATING_MAX: i32 = 5;

/// Returns true if `rating` is within the accepted range.
pub fn is_valid_rating(rating: i32) -> bool {
    (RATING_MIN..=RATING_MAX).contains(&rating)
}

// =============================================================================
// CATALOG SERVICE
// =============================================================================

/// Default catalog service base URL (trailing path segment is the API root).
pub const CATALOG_URL: &str = "http://localhost:8000/api";

/// Environment variable to override the catalog service base URL.
pub const ENV_CATALOG_URL: &str = "IMAGO_CATALOG_URL";

/// Timeout for catalog service requests in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Environment variable to override the catalog request timeout.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "IMAGO_HTTP_TIMEOUT_SECS";

/// Requests slower than this are logged at WARN with `slow = true`.
pub const SLOW_REQUEST_MS: u64 = 1_000;

// =============================================================================
// EVENTS
// =============================================================================

/// Default event bus broadcast channel capacity.
pub const EVENT_BUS_CAPACITY: usize = 256;
