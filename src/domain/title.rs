//! Scraped title data: listing references and parsed detail records

use std::fmt;
use url::Url;

/// Relative link to one title's detail page, as found on the listing.
///
/// Only the listing parser creates these; only the detail fetcher consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingReference(String);

impl ListingReference {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the reference against the site base URL
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&self.0)
    }
}

impl AsRef<str> for ListingReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields extracted from one title detail page.
///
/// Optional fields stay `None` when the page does not carry them; nothing is
/// ever filled in with a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailRecord {
    pub title: String,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    /// Comma-joined, deduplicated. Falls back to writer credits when no
    /// director credit exists (director-or-writer-fallback).
    pub directors: Option<String>,
    /// Comma-joined in page order, empty when no cast is listed
    pub cast: String,
    pub summary: Option<String>,
}

impl fmt::Display for DetailRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.release_year {
            Some(year) => write!(f, "{} ({})", self.title, year),
            None => f.write_str(&self.title),
        }
    }
}
