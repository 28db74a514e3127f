//! Domain models for the imago catalog browser.
//!
//! These types cross the client/session boundary: list and detail responses
//! produce [`CatalogItem`]s, sort parameters travel as [`SortKey`] and
//! [`SortDirection`], and the prompt taxonomy arrives as [`TermGroup`]s.

use serde::{Deserialize, Serialize};

/// One media record in the catalog.
///
/// List responses may omit the parameter texts (they default to empty);
/// the detail operation returns them populated. Mutable only through the
/// rating path; everything else is owned by the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Service-issued identity.
    pub id: i64,
    /// Display filename.
    pub filename: String,
    /// Storage-relative path to the media file.
    pub path: String,
    /// Full multi-line generation parameter text, for display.
    #[serde(default)]
    pub parameters: String,
    /// Normalized single-line text the service matches queries against.
    #[serde(default)]
    pub search_text: String,
    /// Rating 0-5, 0 meaning unrated.
    pub rating: i32,
}

/// Sort key for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CreatedAt,
    Rating,
}

impl SortKey {
    /// Parse a sort key from string (case-insensitive, accepts hyphens/underscores).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "created_at" | "created" | "date" => Some(Self::CreatedAt),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::CreatedAt
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreatedAt => write!(f, "created_at"),
            Self::Rating => write!(f, "rating"),
        }
    }
}

/// Sort direction for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Desc
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Selection behavior of a taxonomy category, fixed at taxonomy load time.
///
/// - `Single`: selecting a term replaces the category's selection.
/// - `Multi`: selecting a term toggles its membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Single,
    Multi,
}

impl TermKind {
    /// Parse a term kind from string (case-insensitive, accepts the wire
    /// names "radio" and "checkbox").
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "single" | "single_select" | "radio" => Some(Self::Single),
            "multi" | "multi_select" | "checkbox" => Some(Self::Multi),
            _ => None,
        }
    }
}

impl std::fmt::Display for TermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

/// One selectable term within a taxonomy category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    /// Display label shown to the user.
    pub label: String,
    /// Underlying value concatenated into composed queries.
    pub value: String,
}

/// One taxonomy category with its member terms, in service order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermGroup {
    pub name: String,
    pub kind: TermKind,
    pub terms: Vec<Term>,
}

impl TermGroup {
    /// Returns true if `value` is one of this group's term values.
    pub fn contains_value(&self, value: &str) -> bool {
        self.terms.iter().any(|t| t.value == value)
    }
}
