//! Service traits for the two scraping stages
//!
//! The pipeline only talks to these seams. The rendering browser and the HTTP
//! client implement them in the infrastructure layer; tests substitute stubs.

use async_trait::async_trait;

use crate::domain::ListingReference;
use crate::infrastructure::browser::ExpansionError;
use crate::infrastructure::extraction_error::ExtractionError;

/// Produces the fully expanded markup of a listing page
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Loads `url`, drives pagination to the end and returns the page markup
    async fn expand(&self, url: &str) -> Result<String, ExpansionError>;
}

/// Fetches the raw markup of one detail page
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch(&self, reference: &ListingReference) -> Result<String, ExtractionError>;
}
