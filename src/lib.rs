//! # Listing Search
//!
//! Keyword search for classified listings.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`query`]: Query normalization, search predicates, in-memory evaluation and SQL compilation
//! - [`models`]: Core data structures (Listing, SearchRequest, etc.)
//! - [`search`]: Search and browse service over listings
//! - [`config`]: Configuration management
//! - [`utils`]: Field name validation and display helpers

pub mod config;
pub mod models;
pub mod query;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use models::Listing;
pub use query::{build_predicate, get_query, normalize_query, Predicate, QueryError};
pub use search::ListingSearch;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
