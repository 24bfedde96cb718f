//! IMDb Scraper - two-stage catalog extraction
//!
//! Expands a JavaScript-paginated search listing in a headless browser, then
//! fetches and parses every title page concurrently and writes the results
//! to a CSV file.

// Module declarations
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

pub use cli::run;
