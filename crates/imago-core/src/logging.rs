//! Structured logging schema and field name constants for imago.
//!
//! All crates use these constants for consistent structured logging fields.
//! This ensures log aggregation tools (Loki, Elasticsearch) can query by
//! standardized field names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue (failed fetch, slow request), last-good state kept |
//! | INFO  | Lifecycle events (client init, sync completions) |
//! | DEBUG | Decision points (applied snapshots, discarded stale responses) |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "session", "client"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "http", "mock", "navigator", "composer", "ratings", "deletions"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "detail", "set_rating", "delete", "sync", "taxonomy"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Catalog item id being operated on.
pub const ITEM_ID: &str = "item_id";

/// Search query text.
pub const QUERY: &str = "query";

/// 1-based page number.
pub const PAGE: &str = "page";

/// Page size in effect.
pub const PAGE_SIZE: &str = "page_size";

/// Sequence number of a list-replacing fetch.
pub const FETCH_SEQ: &str = "fetch_seq";

/// Taxonomy category name (composer operations).
pub const CATEGORY: &str = "category";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of items returned by a fetch.
pub const RESULT_COUNT: &str = "result_count";

/// Total items matching the current query.
pub const TOTAL_MATCHES: &str = "total_matches";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure of an operation.
pub const SUCCESS: &str = "success";

/// Error message text (short form).
pub const ERROR_MSG: &str = "error";

/// Marks an operation that exceeded its latency threshold.
pub const SLOW: &str = "slow";

/// Marks a fetch response discarded because a newer fetch was issued.
pub const STALE: &str = "stale";
