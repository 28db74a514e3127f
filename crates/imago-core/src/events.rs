//! Session event types, envelope schema, and event bus for notifications.
//!
//! The session layer emits an event after every successful mutation
//! (rating applied, item deleted, catalog synced). Downstream consumers
//! (toast/notification display, telemetry) subscribe independently; the
//! session never renders notifications itself.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

// ============================================================================
// Event Envelope
// ============================================================================

/// Self-describing wrapper around a session event.
///
/// The `event_type` field uses dot-namespaced names (e.g. `"item.rated"`).
/// The `payload` field contains the domain-specific [`SessionEvent`] data.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Namespaced event type (e.g. `"item.deleted"`).
    pub event_type: String,
    /// When the event occurred (UTC).
    pub occurred_at: DateTime<Utc>,
    /// Domain-specific event data.
    pub payload: SessionEvent,
}

impl EventEnvelope {
    /// Wrap a session event, stamping the current time.
    pub fn new(event: SessionEvent) -> Self {
        Self {
            event_type: event.namespaced_event_type().to_string(),
            occurred_at: Utc::now(),
            payload: event,
        }
    }
}

// ============================================================================
// Session Event (domain payloads)
// ============================================================================

/// Notification-worthy outcomes of session mutations.
///
/// Serialized as JSON with a `type` tag field, e.g.
/// `{"type":"ItemDeleted","id":42}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// An item's rating was written and applied.
    ItemRated { id: i64, rating: i32 },
    /// An item was removed from the catalog.
    ItemDeleted { id: i64 },
    /// A catalog re-index completed; `message` is the service's summary.
    CatalogSynced { message: String },
}

impl SessionEvent {
    /// Returns the plain event type name (the serialized `type` tag).
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::ItemRated { .. } => "ItemRated",
            SessionEvent::ItemDeleted { .. } => "ItemDeleted",
            SessionEvent::CatalogSynced { .. } => "CatalogSynced",
        }
    }

    /// Returns the namespaced event type for the envelope (e.g. `"item.rated"`).
    pub fn namespaced_event_type(&self) -> &'static str {
        match self {
            SessionEvent::ItemRated { .. } => "item.rated",
            SessionEvent::ItemDeleted { .. } => "item.deleted",
            SessionEvent::CatalogSynced { .. } => "catalog.synced",
        }
    }

    /// Returns the item id this event relates to, if any.
    pub fn item_id(&self) -> Option<i64> {
        match self {
            SessionEvent::ItemRated { id, .. } | SessionEvent::ItemDeleted { id } => Some(*id),
            SessionEvent::CatalogSynced { .. } => None,
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast-based event bus for distributing session events to consumers.
///
/// Uses `tokio::sync::broadcast` with a configurable buffer size. Events are
/// wrapped in [`EventEnvelope`] before broadcast. Slow receivers that fall
/// behind receive a `Lagged` error and miss events; freshness matters more
/// than completeness for notification streams.
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    ///
    /// Recommended: 256 for production, 32 for tests.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers.
    ///
    /// The event is wrapped in an [`EventEnvelope`] stamped with the current
    /// time. If there are no active subscribers, the event is silently
    /// dropped.
    pub fn emit(&self, event: SessionEvent) {
        let envelope = EventEnvelope::new(event);
        let subscriber_count = self.tx.receiver_count();
        tracing::debug!(
            event_type = %envelope.event_type,
            subscriber_count,
            "EventBus emit"
        );
        let _ = self.tx.send(envelope);
    }

    /// Subscribe to receive enveloped events. Each subscriber gets its own
    /// independent stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::defaults::EVENT_BUS_CAPACITY)
    }
}

// ============================================================================
// Tests
// ============================================================================
