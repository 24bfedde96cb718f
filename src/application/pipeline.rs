//! Two-stage scrape: expand the listing, then fan out over the detail pages
//!
//! The listing stage runs to completion before any detail request is issued.
//! Detail extraction runs up to `max_concurrent` titles at a time on the
//! current task; each title resolves to its own `Result`, so a broken page only
//! costs its own row.

#![allow(clippy::uninlined_format_args)]

use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::aggregator::{AggregationReport, Aggregator};
use crate::domain::{DetailSource, ListingReference, ListingSource, SearchMode, SearchRequest};
use crate::infrastructure::browser::{BrowserListingSource, ExpansionError};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::extraction_error::{ExtractionError, ExtractionResult};
use crate::infrastructure::http_client::{DetailFetcher, HttpClientConfig};
use crate::infrastructure::parsing::{
    DetailParseContext, ListingParseContext, ListingParser, ParsingConfig, ParsingError, TitleDetailParser,
};
use crate::infrastructure::paths::OutputError;

/// Shown for anything that is not the listing being unreachable
pub const GENERIC_FAILURE_MESSAGE: &str = "sorry we run into some error please try again";

/// Failures that end the run with a non-zero status
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Listing could not be expanded: {0}")]
    ListingUnavailable(#[from] ExpansionError),

    #[error("Listing layout did not match: {0}")]
    ListingLayout(#[from] ParsingError),

    #[error("Failed to write results: {0}")]
    Output(#[from] OutputError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

impl PipelineError {
    pub const fn exit_code(&self) -> u8 {
        1
    }

    /// Plain-language message for the end user
    pub fn user_message(&self, mode: SearchMode) -> String {
        match self {
            Self::ListingUnavailable(_) => format!(
                "Sorry, seems like we broke the imdb server or you have entered wrong {}, Please Try again after 5 minute",
                mode.label()
            ),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub path: PathBuf,
    pub listed: usize,
    pub aggregation: AggregationReport,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub base_url: String,
    pub out_dir: PathBuf,
    pub max_concurrent: usize,
    pub parsing: ParsingConfig,
}

impl PipelineSettings {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.site.base_url.clone(),
            out_dir: config.paths.out_dir.clone(),
            max_concurrent: config.details.max_concurrent,
            parsing: config.parsing.clone(),
        }
    }
}

pub struct ScrapePipeline<L, D> {
    listing: L,
    details: D,
    listing_parser: ListingParser,
    detail_parser: TitleDetailParser,
    settings: PipelineSettings,
}

impl ScrapePipeline<BrowserListingSource, DetailFetcher> {
    /// Chromium for the listing, reqwest for the details
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let listing = BrowserListingSource::from_app_config(config);
        let details = DetailFetcher::with_config(HttpClientConfig::from_app_config(config)?)?;
        Self::new(listing, details, PipelineSettings::from_app_config(config))
    }
}

impl<L, D> ScrapePipeline<L, D>
where
    L: ListingSource,
    D: DetailSource,
{
    pub fn new(listing: L, details: D, settings: PipelineSettings) -> Result<Self, PipelineError> {
        Ok(Self {
            listing,
            details,
            listing_parser: ListingParser::with_config(&settings.parsing.listing)?,
            detail_parser: TitleDetailParser::with_config(&settings.parsing.detail)?,
            settings,
        })
    }

    pub async fn run(&self, request: &SearchRequest) -> Result<PipelineReport, PipelineError> {
        let url = request.listing_url(&self.settings.base_url);
        info!("🔍 Scraping '{}' ({}) from {}", request.term(), request.mode(), url);

        let markup = self.listing.expand(&url).await.map_err(|e| {
            error!("Listing stage failed: {}", e);
            PipelineError::from(e)
        })?;

        let references = self
            .listing_parser
            .parse(&markup, &ListingParseContext::new(request.mode(), url.as_str()))
            .map_err(|e| {
                error!("Listing layout mismatch: {}", e);
                PipelineError::from(e)
            })?;
        let listed = references.len();
        if listed == 0 {
            warn!("Listing {} has no items", url);
        }
        info!("📋 {} titles listed, fetching with concurrency {}", listed, self.settings.max_concurrent);

        let mut aggregator = Aggregator::new();
        let mut outcomes = stream::iter(references)
            .map(move |reference| async move {
                let outcome = self.extract_one(&reference).await;
                (reference, outcome)
            })
            .buffer_unordered(self.settings.max_concurrent.max(1));

        while let Some((reference, outcome)) = outcomes.next().await {
            aggregator.accept(&reference, outcome);
        }

        let path = aggregator.persist(&self.settings.out_dir, request.term())?;
        let aggregation = aggregator.report();
        info!(
            "🎉 Done: {} rows, {} failed, written to {:?}",
            aggregation.succeeded, aggregation.failed, path
        );

        Ok(PipelineReport {
            path,
            listed,
            aggregation,
        })
    }

    /// Fetch and parse one title; every failure stays inside the returned result
    async fn extract_one(&self, reference: &ListingReference) -> ExtractionResult {
        let markup = self.details.fetch(reference).await?;

        let context = DetailParseContext::new(reference.as_str());
        self.detail_parser
            .parse(&markup, &context)
            .map_err(|source| ExtractionError::Parse {
                url: reference.to_string(),
                source,
            })
    }
}
