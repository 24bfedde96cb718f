//! Application layer - the scrape use case and its user-facing edges
//!
//! Coordinates the domain types and infrastructure services: listing
//! expansion, the detail fan-out, aggregation, and the terminal presentation.

pub mod aggregator;
pub mod input;
pub mod listing_expander;
pub mod pipeline;
pub mod presentation;

// Re-export commonly used items
pub use aggregator::{AggregationReport, Aggregator};
pub use input::{InputError, prompt_search_request};
pub use listing_expander::{ExpandedListing, ExpansionSettings, ExpansionState, ListingExpander, ListingPage};
pub use pipeline::{PipelineError, PipelineReport, PipelineSettings, ScrapePipeline};
pub use presentation::{StatusTicker, TickerSettings, load_status_messages};
