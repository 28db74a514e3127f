//! Prompt composition from the term taxonomy.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, instrument};

use imago_core::error::{Error, Result};
use imago_core::models::{TermGroup, TermKind};
use imago_core::traits::CatalogClient;

/// Builds a query string from taxonomy term selections.
///
/// The taxonomy is fetched lazily on the first open and cached for the
/// composer's lifetime; closing and reopening never refetches it.
/// Selections are scoped to one open: they start empty and are discarded
/// on [`close`](PromptComposer::close) or [`consume`](PromptComposer::consume).
pub struct PromptComposer {
    client: Arc<dyn CatalogClient>,
    groups: Option<Vec<TermGroup>>,
    selections: HashMap<String, HashSet<String>>,
    open: bool,
}

impl PromptComposer {
    pub(crate) fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self {
            client,
            groups: None,
            selections: HashMap::new(),
            open: false,
        }
    }

    /// Open the composer, fetching the taxonomy on first use.
    ///
    /// Starts with no selections. If the taxonomy fetch fails the
    /// composer stays closed and a later open retries.
    #[instrument(skip(self), fields(subsystem = "session", component = "composer", op = "open"))]
    pub async fn open(&mut self) -> Result<()> {
        if self.groups.is_none() {
            let groups = self.client.taxonomy().await?;
            debug!(result_count = groups.len(), "Taxonomy loaded");
            self.groups = Some(groups);
        }
        self.selections.clear();
        self.open = true;
        Ok(())
    }

    /// Close the composer, discarding all selections. The cached
    /// taxonomy survives for the next open.
    pub fn close(&mut self) {
        self.selections.clear();
        self.open = false;
    }

    /// Whether the composer is currently open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The loaded taxonomy; empty before the first successful open.
    pub fn groups(&self) -> &[TermGroup] {
        self.groups.as_deref().unwrap_or_default()
    }

    /// Select a term value within a category.
    ///
    /// Single-select categories replace their previous selection;
    /// multi-select categories toggle the value in and out. Unknown
    /// categories and values are rejected.
    pub fn select(&mut self, category: &str, value: &str) -> Result<()> {
        if !self.open {
            return Err(Error::InvalidInput("composer is not open".to_string()));
        }
        let group = self
            .groups()
            .iter()
            .find(|g| g.name == category)
            .ok_or_else(|| Error::InvalidInput(format!("unknown category: {}", category)))?;
        if !group.contains_value(value) {
            return Err(Error::InvalidInput(format!(
                "unknown term {:?} in category {}",
                value, category
            )));
        }
        let kind = group.kind;

        let selected = self.selections.entry(category.to_string()).or_default();
        match kind {
            TermKind::Single => {
                selected.clear();
                selected.insert(value.to_string());
            }
            TermKind::Multi => {
                if !selected.remove(value) {
                    selected.insert(value.to_string());
                }
            }
        }
        Ok(())
    }

    /// Whether a term value is currently selected in a category.
    pub fn is_selected(&self, category: &str, value: &str) -> bool {
        self.selections
            .get(category)
            .map(|set| set.contains(value))
            .unwrap_or(false)
    }

    /// The composed query: every selected term value in taxonomy order
    /// (categories as listed, then terms within each), joined by ", ".
    /// Selection order never shows through.
    pub fn compose(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for group in self.groups() {
            let Some(selected) = self.selections.get(&group.name) else {
                continue;
            };
            for term in &group.terms {
                if selected.contains(&term.value) {
                    parts.push(term.value.as_str());
                }
            }
        }
        parts.join(", ")
    }

    /// Compose the query and clear all selections, leaving the composer
    /// open with a clean slate.
    pub fn consume(&mut self) -> String {
        let composed = self.compose();
        self.selections.clear();
        composed
    }
}
