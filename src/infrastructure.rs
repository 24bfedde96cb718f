//! Infrastructure layer: configuration, logging, rendering, HTTP and parsing
//!
//! Everything that touches the outside world lives here. The application layer
//! only sees it through the domain service traits and a few plain functions.

pub mod browser; // Chromium rendering session for the listing stage
pub mod config; // Layered configuration
pub mod extraction_error;
pub mod http_client; // Detail page fetcher
pub mod logging;
pub mod parsing; // Listing and title detail parsers
pub mod parsing_error;
pub mod paths; // Working directories and CSV output

// Re-export commonly used items
pub use browser::{BrowserListingSource, BrowserSettings, ExpansionError, RenderingSession};
pub use config::{AppConfig, ConfigError};
pub use extraction_error::{ExtractionError, ExtractionResult};
pub use http_client::{DetailFetcher, HttpClientConfig};
pub use logging::{init_logging_with_config, log_system_info};
pub use parsing::{ListingParser, ParsingConfig, ParsingError, ParsingResult, TitleDetailParser};
pub use paths::{OutputError, ensure_directories, output_path, sanitize_file_stem, write_table};
