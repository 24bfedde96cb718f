//! Parsing context for HTML extraction
//!
//! Carries the information a parser needs besides the markup itself.

use crate::domain::SearchMode;

/// Context for parsing an expanded listing page
#[derive(Debug, Clone)]
pub struct ListingParseContext {
    /// Decides which anchor selector identifies an item's link
    pub mode: SearchMode,

    /// Listing URL, for log and error messages
    pub url: String,
}

impl ListingParseContext {
    pub fn new(mode: SearchMode, url: impl Into<String>) -> Self {
        Self {
            mode,
            url: url.into(),
        }
    }
}

/// Context for parsing a title detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Detail page URL being parsed
    pub url: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
