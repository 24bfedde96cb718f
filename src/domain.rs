//! Domain module - search requests, scraped titles and the result table
//!
//! Everything in here is pure data plus the small amount of logic that belongs
//! to it (URL shaping, column alignment), plus the service traits the
//! scraping stages are reached through.

pub mod result_table;
pub mod search;
pub mod services;
pub mod title;

// Re-export commonly used items for convenience
pub use result_table::{COLUMN_HEADERS, ResultTable};
pub use search::{SearchMode, SearchRequest};
pub use services::{DetailSource, ListingSource};
pub use title::{DetailRecord, ListingReference};
