//! HTML parsing infrastructure
//!
//! Trait-based parsers for the two page types the scraper reads: the expanded
//! search listing and the per-title detail page.

pub mod config;
pub mod context;
pub mod error;
pub mod listing_parser;
pub mod title_detail_parser;

// Re-export public types
pub use config::{DetailSelectors, ListingSelectors, ParsingConfig};
pub use context::{DetailParseContext, ListingParseContext};
pub use error::{ParsingError, ParsingResult};
pub use listing_parser::ListingParser;
pub use title_detail_parser::TitleDetailParser;

use scraper::{ElementRef, Html, Selector};

/// Parser that needs contextual information alongside the document
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}

/// Compiles one CSS selector, mapping failures to [`ParsingError::InvalidSelector`]
pub(crate) fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

/// Concatenated, trimmed text of an element
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
