//! Search request and response models.

use serde::{Deserialize, Serialize};

use super::Listing;

/// Sort order for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Sort field for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Publication date; unpublished listings always sort last
    #[default]
    Date,
    Price,
    Title,
}

/// Search query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Raw query string as typed by the user
    pub query: String,

    /// Fields to search; the configured defaults are used when empty
    #[serde(default)]
    pub fields: Vec<String>,

    /// Sort by field
    pub sort_by: Option<SortBy>,

    /// Sort order
    pub sort_order: Option<SortOrder>,

    /// Maximum number of results to return
    pub max_results: Option<usize>,
}

impl SearchRequest {
    /// Create a new search request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fields: Vec::new(),
            sort_by: None,
            sort_order: None,
            max_results: None,
        }
    }

    /// Add a field to search in
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Set sort by
    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by = Some(sort);
        self
    }

    /// Set sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }
}

/// Response from a search operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query string as received
    pub query_string: String,

    /// Matching listings; `None` when the query had nothing to search for
    pub found_entries: Option<Vec<Listing>>,
}

impl SearchResponse {
    /// Response for a blank query
    pub fn empty(query_string: impl Into<String>) -> Self {
        Self {
            query_string: query_string.into(),
            found_entries: None,
        }
    }

    /// Number of matching listings
    pub fn total(&self) -> usize {
        self.found_entries.as_ref().map_or(0, Vec::len)
    }
}
