//! Core data models for listings and search operations.

mod listing;
mod search;

pub use listing::{Listing, ListingBuilder, LISTING_FIELDS};
pub use search::{SearchRequest, SearchResponse, SortBy, SortOrder};
