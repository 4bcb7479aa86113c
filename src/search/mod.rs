//! Keyword search and browsing over listings.
//!
//! [`ListingSearch`] ties a [`SearchConfig`] to the query layer: it normalizes
//! the raw query, builds the predicate over the configured fields, filters the
//! listings and orders the hits.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::models::{Listing, SearchRequest, SearchResponse, SortBy, SortOrder, LISTING_FIELDS};
use crate::query::{get_query, QueryError};

/// Search service over a set of listings
#[derive(Debug, Clone, Default)]
pub struct ListingSearch {
    config: SearchConfig,
}

impl ListingSearch {
    /// Create a search service with the given defaults
    pub fn new(config: SearchConfig) -> Self {
        for field in unknown_fields(&config.fields) {
            warn!(field = %field, "configured search field is not a listing field and will never match");
        }
        Self { config }
    }

    /// The defaults this service was created with
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search `listings` with a raw query string using the configured defaults.
    ///
    /// A query that is empty or only whitespace performs no search and yields
    /// `found_entries: None`.
    pub fn search(&self, query: &str, listings: &[Listing]) -> Result<SearchResponse, QueryError> {
        self.execute(&SearchRequest::new(query), listings)
    }

    /// Run a search request; unset request options fall back to the configured defaults.
    pub fn execute(
        &self,
        request: &SearchRequest,
        listings: &[Listing],
    ) -> Result<SearchResponse, QueryError> {
        if request.query.trim().is_empty() {
            return Ok(SearchResponse::empty(request.query.as_str()));
        }

        let fields = if request.fields.is_empty() {
            &self.config.fields
        } else {
            for field in unknown_fields(&request.fields) {
                warn!(field = %field, "requested search field is not a listing field and will never match");
            }
            &request.fields
        };

        let Some(predicate) = get_query(&request.query, fields)? else {
            return Ok(SearchResponse::empty(request.query.as_str()));
        };
        debug!(predicate = %predicate, "searching {} listings", listings.len());

        let mut found: Vec<Listing> = listings
            .iter()
            .filter(|listing| predicate.matches(*listing))
            .cloned()
            .collect();

        sort_listings(
            &mut found,
            request.sort_by.unwrap_or(self.config.sort_by),
            request.sort_order.unwrap_or(self.config.sort_order),
        );

        if let Some(max) = request.max_results.or(self.config.max_results) {
            found.truncate(max);
        }

        debug!(hits = found.len(), "search finished");

        Ok(SearchResponse {
            query_string: request.query.clone(),
            found_entries: Some(found),
        })
    }

    /// Listings published at or before `now`, oldest first
    pub fn browse(&self, listings: &[Listing], now: DateTime<Utc>) -> Vec<Listing> {
        let mut published: Vec<Listing> = listings
            .iter()
            .filter(|listing| listing.is_published_at(now))
            .cloned()
            .collect();
        sort_listings(&mut published, SortBy::Date, SortOrder::Ascending);
        published
    }
}

/// Field names in `fields` that no [`Listing`] exposes.
fn unknown_fields(fields: &[String]) -> impl Iterator<Item = &str> {
    fields
        .iter()
        .map(String::as_str)
        .filter(|field| !LISTING_FIELDS.contains(field))
}

/// Stable sort of `listings`. Unpublished listings go last for date sorts in
/// either direction.
pub fn sort_listings(listings: &mut [Listing], sort_by: SortBy, order: SortOrder) {
    listings.sort_by(|a, b| match sort_by {
        SortBy::Date => match (a.published_date, b.published_date) {
            (Some(x), Some(y)) => directed(x.cmp(&y), order),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortBy::Price => directed(a.price.total_cmp(&b.price), order),
        SortBy::Title => directed(
            a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            order,
        ),
    });
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingBuilder;
    use chrono::{Duration, TimeZone};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 11, d, 12, 0, 0).unwrap()
    }

    fn listings() -> Vec<Listing> {
        vec![
            ListingBuilder::new(1, "alice", "Oak desk")
                .text("Solid wood, some scratches")
                .price(80.0)
                .published_date(day(1))
                .build(),
            ListingBuilder::new(2, "bob", "Pine bookshelf")
                .text("Fits an oak desk nicely")
                .price(30.0)
                .published_date(day(3))
                .build(),
            ListingBuilder::new(3, "carol", "Desk lamp")
                .price(15.0)
                .published_date(day(2))
                .build(),
            ListingBuilder::new(4, "dave", "Oak wardrobe draft").price(200.0).build(),
        ]
    }

    fn ids(response: &SearchResponse) -> Vec<u64> {
        response
            .found_entries
            .as_ref()
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect()
    }

    #[test]
    fn test_blank_query_searches_nothing() {
        let search = ListingSearch::default();
        for query in ["", "   ", "\t\n"] {
            let response = search.search(query, &listings()).unwrap();
            assert!(response.found_entries.is_none());
            assert_eq!(response.query_string, query);
        }
    }

    #[test]
    fn test_newest_first_by_default() {
        let search = ListingSearch::default();
        let response = search.search("desk", &listings()).unwrap();
        assert_eq!(ids(&response), vec![2, 3, 1]);
    }

    #[test]
    fn test_all_terms_required() {
        let search = ListingSearch::default();
        let response = search.search("oak desk", &listings()).unwrap();
        assert_eq!(ids(&response), vec![2, 1]);
    }

    #[test]
    fn test_unpublished_sorts_last() {
        let search = ListingSearch::default();
        let response = search.search("oak", &listings()).unwrap();
        assert_eq!(ids(&response), vec![2, 1, 4]);
    }

    #[test]
    fn test_no_hits_is_empty_not_none() {
        let search = ListingSearch::default();
        let response = search.search("sofa", &listings()).unwrap();
        assert_eq!(response.found_entries, Some(vec![]));
    }

    #[test]
    fn test_request_overrides() {
        let search = ListingSearch::default();
        let request = SearchRequest::new("o")
            .field("author")
            .sort_by(SortBy::Price)
            .sort_order(SortOrder::Ascending)
            .max_results(1);
        let response = search.execute(&request, &listings()).unwrap();
        // "bob" (30.0) and "carol" (15.0) contain an "o"
        assert_eq!(ids(&response), vec![3]);
    }

    #[test]
    fn test_unknown_fields() {
        let fields: Vec<String> = ["title", "titel", "price", "body"]
            .iter()
            .map(|f| f.to_string())
            .collect();
        assert_eq!(unknown_fields(&fields).collect::<Vec<_>>(), vec!["titel", "body"]);
        assert_eq!(unknown_fields(&SearchConfig::default().fields).count(), 0);
    }

    #[test]
    fn test_misspelled_request_field_matches_nothing() {
        let search = ListingSearch::default();
        let request = SearchRequest::new("desk").field("titel");
        let response = search.execute(&request, &listings()).unwrap();
        assert_eq!(response.found_entries, Some(vec![]));
    }

    #[test]
    fn test_configured_limit() {
        let search = ListingSearch::new(SearchConfig {
            max_results: Some(2),
            ..SearchConfig::default()
        });
        let response = search.search("desk", &listings()).unwrap();
        assert_eq!(ids(&response), vec![2, 3]);
    }

    #[test]
    fn test_empty_fields_is_an_error() {
        let search = ListingSearch::new(SearchConfig {
            fields: Vec::new(),
            ..SearchConfig::default()
        });
        let err = search.search("desk", &listings()).unwrap_err();
        assert_eq!(err, QueryError::NoSearchFields { terms: 1 });
    }

    #[test]
    fn test_browse_published_oldest_first() {
        let search = ListingSearch::default();
        let browsed = search.browse(&listings(), day(2) + Duration::hours(1));
        let ids: Vec<u64> = browsed.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_sort_by_title_ignores_case() {
        let mut items = vec![
            Listing::new(1, "a", "banana"),
            Listing::new(2, "a", "Apple"),
            Listing::new(3, "a", "cherry"),
        ];
        sort_listings(&mut items, SortBy::Title, SortOrder::Ascending);
        let titles: Vec<&str> = items.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }
}
