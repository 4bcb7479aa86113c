//! Listing model representing a classified post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::query::Searchable;

/// Field names a [`Listing`] can be searched on.
pub const LISTING_FIELDS: [&str; 4] = ["title", "text", "author", "price"];

/// A classified post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Unique identifier
    pub id: u64,

    /// Username of the poster
    pub author: String,

    /// Listing title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub text: String,

    /// Asking price
    #[serde(default)]
    pub price: f64,

    /// When the listing was created
    #[serde(default = "Utc::now")]
    pub created_date: DateTime<Utc>,

    /// When the listing went public; `None` while it is a draft
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
}

impl Listing {
    /// Create an unpublished listing
    pub fn new(id: u64, author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            author: author.into(),
            title: title.into(),
            text: String::new(),
            price: 0.0,
            created_date: Utc::now(),
            published_date: None,
        }
    }

    /// Make the listing public as of now
    pub fn publish(&mut self) {
        self.published_date = Some(Utc::now());
    }

    /// Whether the listing is visible at `now`
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.published_date.is_some_and(|date| date <= now)
    }
}

impl Searchable for Listing {
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "title" => Some(Cow::Borrowed(&self.title)),
            "text" => Some(Cow::Borrowed(&self.text)),
            "author" => Some(Cow::Borrowed(&self.author)),
            "price" => Some(Cow::Owned(self.price.to_string())),
            _ => None,
        }
    }
}

/// Builder for creating Listing instances
#[derive(Debug, Clone)]
pub struct ListingBuilder {
    listing: Listing,
}

impl ListingBuilder {
    /// Create a new builder with required fields
    pub fn new(id: u64, author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            listing: Listing::new(id, author, title),
        }
    }

    /// Set description
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.listing.text = text.into();
        self
    }

    /// Set price
    pub fn price(mut self, price: f64) -> Self {
        self.listing.price = price;
        self
    }

    /// Set creation date
    pub fn created_date(mut self, date: DateTime<Utc>) -> Self {
        self.listing.created_date = date;
        self
    }

    /// Set publication date
    pub fn published_date(mut self, date: DateTime<Utc>) -> Self {
        self.listing.published_date = Some(date);
        self
    }

    /// Build the Listing
    pub fn build(self) -> Listing {
        self.listing
    }
}
