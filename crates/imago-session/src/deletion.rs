//! Deletion with focus clearing and page reconciliation.

use std::sync::Arc;

use tracing::{debug, instrument};

use imago_core::error::Result;
use imago_core::events::SessionEvent;

use crate::session::SessionCore;

/// Deletes items and reconciles the visible page afterward.
#[derive(Clone)]
pub struct DeletionCoordinator {
    core: Arc<SessionCore>,
}

impl DeletionCoordinator {
    pub(crate) fn new(core: Arc<SessionCore>) -> Self {
        Self { core }
    }

    /// Delete an item, then refetch the current page.
    ///
    /// The item is never removed from the list optimistically. Once the
    /// remote delete succeeds, focus is cleared if it pointed at the
    /// deleted item, subscribers are notified, and the current page is
    /// refetched at the current parameters. A page emptied by the
    /// deletion falls back to the new last page.
    #[instrument(skip(self, id), fields(subsystem = "session", component = "deletions", op = "delete", item_id = id))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let _loading = self.core.begin_loading();

        self.core.client.delete(id).await?;

        let query = {
            let mut state = self.core.state.write().await;
            if state.focused_id() == Some(id) {
                let next = state.without_focus();
                *state = next;
            }
            state.query.clone()
        };

        self.core.events.emit(SessionEvent::ItemDeleted { id });
        debug!("Item deleted, reconciling current page");

        self.core.fetch_and_apply(query).await
    }
}
