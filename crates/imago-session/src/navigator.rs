//! Detail-view navigation, including stepping across page boundaries.

use std::sync::Arc;

use tracing::{debug, instrument};

use imago_core::defaults::FIRST_PAGE;
use imago_core::error::{Error, Result};
use imago_core::models::CatalogItem;

use crate::session::SessionCore;
use crate::state::QueryState;

/// Direction of a focus step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Previous => "previous",
            Direction::Next => "next",
        }
    }
}

/// Where a step lands, decided before any fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StepPlan {
    /// Already at the global first/last item.
    Stay,
    /// An adjacent item on the current page.
    Within { target_id: i64 },
    /// The edge item of an adjacent page.
    CrossPage { page: i64 },
}

/// Compute the step target from the visible list and the focused id.
///
/// Fails with `FocusNotFound` when the focused item is no longer in the
/// list, which is how a focus orphaned by outside changes surfaces.
pub(crate) fn plan_step(
    items: &[CatalogItem],
    focused_id: i64,
    direction: Direction,
    current_page: i64,
    total_pages: i64,
) -> Result<StepPlan> {
    let index = items
        .iter()
        .position(|item| item.id == focused_id)
        .ok_or(Error::FocusNotFound(focused_id))?;

    let plan = match direction {
        Direction::Previous => {
            if index > 0 {
                StepPlan::Within {
                    target_id: items[index - 1].id,
                }
            } else if current_page > FIRST_PAGE {
                StepPlan::CrossPage {
                    page: current_page - 1,
                }
            } else {
                StepPlan::Stay
            }
        }
        Direction::Next => {
            if index + 1 < items.len() {
                StepPlan::Within {
                    target_id: items[index + 1].id,
                }
            } else if current_page < total_pages {
                StepPlan::CrossPage {
                    page: current_page + 1,
                }
            } else {
                StepPlan::Stay
            }
        }
    };
    Ok(plan)
}

/// Opens and closes the detail view and steps focus through the result
/// set, crossing page boundaries where needed.
#[derive(Clone)]
pub struct DetailNavigator {
    core: Arc<SessionCore>,
}

impl DetailNavigator {
    pub(crate) fn new(core: Arc<SessionCore>) -> Self {
        Self { core }
    }

    /// Fetch an item's full record and focus it.
    #[instrument(skip(self, id), fields(subsystem = "session", component = "navigator", op = "open", item_id = id))]
    pub async fn open(&self, id: i64) -> Result<()> {
        let item = self.core.client.detail(id).await?;
        let mut state = self.core.state.write().await;
        let next = state.with_focus(item);
        *state = next;
        debug!("Detail opened");
        Ok(())
    }

    /// Clear the detail-view focus.
    pub async fn close(&self) {
        let mut state = self.core.state.write().await;
        let next = state.without_focus();
        *state = next;
    }

    /// Step focus to the previous item, crossing to the previous page's
    /// last item when focus sits at the top of the current page.
    pub async fn previous(&self) -> Result<()> {
        self.step(Direction::Previous).await
    }

    /// Step focus to the next item, crossing to the next page's first
    /// item when focus sits at the bottom of the current page.
    pub async fn next(&self) -> Result<()> {
        self.step(Direction::Next).await
    }

    #[instrument(skip(self, direction), fields(subsystem = "session", component = "navigator", op = "step", direction = direction.label()))]
    async fn step(&self, direction: Direction) -> Result<()> {
        // Plan from a read snapshot; no lock is held across a fetch.
        let (plan, query) = {
            let state = self.core.state.read().await;
            let Some(focused_id) = state.focused_id() else {
                debug!("No focus, nothing to step from");
                return Ok(());
            };
            let plan = plan_step(
                &state.items,
                focused_id,
                direction,
                state.query.page,
                state.total_pages(),
            );
            (plan, state.query.clone())
        };

        let plan = match plan {
            Ok(plan) => plan,
            Err(e) => {
                if matches!(e, Error::FocusNotFound(_)) {
                    // The focused item vanished from the list; drop the
                    // stale focus along with the error.
                    let mut state = self.core.state.write().await;
                    let next = state.without_focus();
                    *state = next;
                }
                return Err(e);
            }
        };

        match plan {
            StepPlan::Stay => {
                debug!("Already at the end of the result set");
                Ok(())
            }
            StepPlan::Within { target_id } => {
                let item = self.core.client.detail(target_id).await?;
                let mut state = self.core.state.write().await;
                let next = state.with_focus(item);
                *state = next;
                debug!(item_id = target_id, "Stepped within page");
                Ok(())
            }
            StepPlan::CrossPage { page } => self.cross_page(query, page, direction).await,
        }
    }

    /// Fetch an adjacent page and land focus on its edge item.
    ///
    /// The new list, page number, counts, and focus are applied in one
    /// snapshot replacement. An empty adjacent page or a failed detail
    /// fetch leaves every piece of state exactly as it was.
    async fn cross_page(&self, query: QueryState, page: i64, direction: Direction) -> Result<()> {
        let _loading = self.core.begin_loading();
        let seq = self.core.next_fetch_seq();

        let query = query.with_page(page)?;
        let response = self.core.client.search(query.to_request()).await?;

        let target_id = match direction {
            Direction::Previous => response.items.last().map(|item| item.id),
            Direction::Next => response.items.first().map(|item| item.id),
        };
        let Some(target_id) = target_id else {
            return Err(Error::NoAdjacentItem(format!(
                "{} page is empty",
                direction.label()
            )));
        };
        let item = self.core.client.detail(target_id).await?;

        let mut state = self.core.state.write().await;
        if self.core.latest_fetch_seq() != seq {
            debug!(fetch_seq = seq, stale = true, "Discarding stale page step");
            return Ok(());
        }
        let next = state
            .with_results(
                query,
                response.items,
                response.total_matches,
                response.total_catalog,
            )
            .with_focus(item);
        *state = next;
        debug!(page, item_id = target_id, "Crossed page boundary");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64) -> CatalogItem {
        CatalogItem {
            id,
            filename: format!("{:05}.png", id),
            path: format!("images/{:05}.png", id),
            parameters: String::new(),
            search_text: String::new(),
            rating: 0,
        }
    }

    fn page(ids: &[i64]) -> Vec<CatalogItem> {
        ids.iter().copied().map(item).collect()
    }

    #[test]
    fn test_plan_next_within_page() {
        let items = page(&[10, 11, 12]);
        let plan = plan_step(&items, 11, Direction::Next, 1, 1).unwrap();
        assert_eq!(plan, StepPlan::Within { target_id: 12 });
    }

    #[test]
    fn test_plan_previous_within_page() {
        let items = page(&[10, 11, 12]);
        let plan = plan_step(&items, 11, Direction::Previous, 1, 1).unwrap();
        assert_eq!(plan, StepPlan::Within { target_id: 10 });
    }

    #[test]
    fn test_plan_next_crosses_at_page_bottom() {
        let items = page(&[10, 11, 12]);
        let plan = plan_step(&items, 12, Direction::Next, 1, 2).unwrap();
        assert_eq!(plan, StepPlan::CrossPage { page: 2 });
    }

    #[test]
    fn test_plan_previous_crosses_at_page_top() {
        let items = page(&[10, 11, 12]);
        let plan = plan_step(&items, 10, Direction::Previous, 2, 2).unwrap();
        assert_eq!(plan, StepPlan::CrossPage { page: 1 });
    }

    #[test]
    fn test_plan_stays_at_global_first() {
        let items = page(&[10, 11, 12]);
        let plan = plan_step(&items, 10, Direction::Previous, 1, 2).unwrap();
        assert_eq!(plan, StepPlan::Stay);
    }

    #[test]
    fn test_plan_stays_at_global_last() {
        let items = page(&[10, 11, 12]);
        let plan = plan_step(&items, 12, Direction::Next, 2, 2).unwrap();
        assert_eq!(plan, StepPlan::Stay);
    }

    #[test]
    fn test_plan_single_item_page_crosses_both_ways() {
        let items = page(&[10]);
        assert_eq!(
            plan_step(&items, 10, Direction::Previous, 2, 3).unwrap(),
            StepPlan::CrossPage { page: 1 }
        );
        assert_eq!(
            plan_step(&items, 10, Direction::Next, 2, 3).unwrap(),
            StepPlan::CrossPage { page: 3 }
        );
    }

    #[test]
    fn test_plan_missing_focus_is_an_error() {
        let items = page(&[10, 11, 12]);
        let err = plan_step(&items, 99, Direction::Next, 1, 1).unwrap_err();
        assert!(matches!(err, Error::FocusNotFound(99)));
    }

    #[test]
    fn test_plan_empty_list_is_an_error() {
        let err = plan_step(&[], 10, Direction::Next, 1, 1).unwrap_err();
        assert!(matches!(err, Error::FocusNotFound(10)));
    }
}
