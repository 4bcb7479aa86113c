//! Keyword search queries.
//!
//! - [`normalize_query`]: split a raw query string into terms, keeping
//!   double-quoted phrases together
//! - [`build_predicate`] / [`get_query`]: turn terms and searchable field names
//!   into a [`Predicate`]
//! - [`Predicate::matches`]: evaluate a predicate against a [`Searchable`] record
//! - [`Predicate::to_sql`]: compile a predicate into a [`SqlFragment`]
//!
//! # Example
//!
//! ```rust
//! use listing_search::query::{get_query, normalize_query};
//! use std::collections::HashMap;
//!
//! assert_eq!(normalize_query(r#"a "b c" d"#), vec!["a", "b c", "d"]);
//!
//! let predicate = get_query("bike", &["title", "text"]).unwrap().unwrap();
//! let record = HashMap::from([("title".to_string(), "Road BIKE".to_string())]);
//! assert!(predicate.matches(&record));
//! ```

mod eval;
mod normalize;
mod predicate;
mod sql;

pub use eval::{filter_records, Searchable};
pub use normalize::normalize_query;
pub use predicate::{build_predicate, get_query, Predicate};
pub use sql::SqlFragment;

use crate::utils::ValidationError;

/// Errors raised while building or compiling a search predicate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Search terms were given without any field to search in.
    #[error("no search fields given for {terms} search term(s)")]
    NoSearchFields { terms: usize },

    /// A field name cannot be used in the target query language.
    #[error("Invalid search field: {0}")]
    InvalidField(#[from] ValidationError),
}
