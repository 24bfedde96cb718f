//! Listing parser
//!
//! Turns the fully expanded listing markup into the ordered list of detail
//! page references. A listing item without the expected link is a layout
//! mismatch and fails the whole listing rather than being skipped.

#![allow(clippy::uninlined_format_args)]

use super::{
    ContextualParser, ListingParseContext, ListingSelectors, ParsingError, ParsingResult,
    compile_selector,
};
use crate::domain::{ListingReference, SearchMode};
use scraper::{Html, Selector};
use tracing::{debug, error};

/// Parser for extracting detail references from listing pages
pub struct ListingParser {
    item_selector: Selector,
    category_anchor_selector: Selector,
    keyword_anchor_selector: Selector,
    /// Kept for error messages
    selectors: ListingSelectors,
}

impl ListingParser {
    /// Create a new listing parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            item_selector: compile_selector(&selectors.item)?,
            category_anchor_selector: compile_selector(&selectors.category_anchor)?,
            keyword_anchor_selector: compile_selector(&selectors.keyword_anchor)?,
            selectors: selectors.clone(),
        })
    }

    /// Parses raw listing markup
    pub fn parse(&self, markup: &str, context: &ListingParseContext) -> ParsingResult<Vec<ListingReference>> {
        let html = Html::parse_document(markup);
        self.parse_with_context(&html, context)
    }

    fn anchor_for(&self, mode: SearchMode) -> (&Selector, &str) {
        match mode {
            SearchMode::ByCategory => (&self.category_anchor_selector, &self.selectors.category_anchor),
            SearchMode::ByKeyword => (&self.keyword_anchor_selector, &self.selectors.keyword_anchor),
        }
    }
}

impl ContextualParser for ListingParser {
    type Output = Vec<ListingReference>;
    type Context = ListingParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        debug!("Parsing listing ({} mode) from {}", context.mode, context.url);

        let (anchor_selector, anchor_str) = self.anchor_for(context.mode);
        let mut references = Vec::new();

        for (index, item) in html.select(&self.item_selector).enumerate() {
            let Some(anchor) = item.select(anchor_selector).next() else {
                error!(
                    "Listing item {} on {} has no element matching '{}'",
                    index, context.url, anchor_str
                );
                return Err(ParsingError::ItemAnchorMissing {
                    index,
                    selector: anchor_str.to_string(),
                });
            };

            let href = anchor
                .value()
                .attr("href")
                .ok_or(ParsingError::ItemHrefMissing { index })?;

            references.push(ListingReference::new(href));
        }

        debug!("Extracted {} references from {}", references.len(), context.url);
        Ok(references)
    }
}
