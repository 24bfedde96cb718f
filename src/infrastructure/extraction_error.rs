//! Per-title extraction errors
//!
//! Every detail task resolves to `Result<DetailRecord, ExtractionError>`. These
//! errors are logged and the record is skipped; they never abort the batch.

use thiserror::Error;

use crate::domain::DetailRecord;
use crate::infrastructure::parsing_error::ParsingError;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Invalid detail reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("HTTP request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParsingError,
    },
}

impl ExtractionError {
    /// Short label for log aggregation
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidReference { .. } => "invalid_reference",
            Self::Request { .. } => "request",
            Self::HttpStatus { .. } => "http_status",
            Self::Body { .. } => "body",
            Self::Parse { .. } => "parse",
        }
    }
}

pub type ExtractionResult = Result<DetailRecord, ExtractionError>;
