//! Parsing error types for listing and detail markup
//!
//! Listing errors are structural (the page layout no longer matches the
//! selectors) and abort the run. Detail errors only ever cost one record.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in {url}")]
    RequiredFieldMissing { field: String, url: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Listing item {index} has no element matching '{selector}'")]
    ItemAnchorMissing { index: usize, selector: String },

    #[error("Listing item {index} link has no href attribute")]
    ItemHrefMissing { index: usize },
}

impl ParsingError {
    pub fn required_field_missing(field: &str, url: &str) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            url: url.to_string(),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
