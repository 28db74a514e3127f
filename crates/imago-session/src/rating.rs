//! Rating writes with remote-first semantics.

use std::sync::Arc;

use tracing::{debug, instrument};

use imago_core::defaults::{is_valid_rating, RATING_MAX, RATING_MIN};
use imago_core::error::{Error, Result};
use imago_core::events::SessionEvent;

use crate::session::SessionCore;

/// Applies rating changes: remote write first, local list patch second.
#[derive(Clone)]
pub struct RatingMutator {
    core: Arc<SessionCore>,
}

impl RatingMutator {
    pub(crate) fn new(core: Arc<SessionCore>) -> Self {
        Self { core }
    }

    /// Set an item's rating.
    ///
    /// `None` is a no-op; callers pass through whatever their input
    /// surface produced without checking it first. Out-of-range values
    /// are rejected before any remote call. The visible list is patched
    /// only after the remote write succeeds, so there is never an
    /// optimistic value to roll back.
    #[instrument(skip(self, id, rating), fields(subsystem = "session", component = "ratings", op = "set_rating", item_id = id))]
    pub async fn set(&self, id: i64, rating: Option<i32>) -> Result<()> {
        let Some(rating) = rating else {
            debug!("No rating given, skipping");
            return Ok(());
        };
        if !is_valid_rating(rating) {
            return Err(Error::InvalidInput(format!(
                "rating {} is outside {}-{}",
                rating, RATING_MIN, RATING_MAX
            )));
        }

        self.core.client.set_rating(id, rating).await?;

        {
            let mut state = self.core.state.write().await;
            let next = state.with_rating(id, rating);
            *state = next;
        }
        self.core.events.emit(SessionEvent::ItemRated { id, rating });
        debug!(rating, "Rating applied");
        Ok(())
    }
}
