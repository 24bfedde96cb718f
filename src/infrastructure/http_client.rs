//! HTTP client for detail pages
//!
//! Plain GET requests, no script execution. One client (and so one cookie
//! jar) is built per batch. Only a 200 response counts as success; there are
//! no retries, the first failure is final for that title.

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{DetailSource, ListingReference};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::extraction_error::ExtractionError;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL detail references are resolved against
    pub base_url: Url,
    /// User agent string
    pub user_agent: String,
    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

impl HttpClientConfig {
    /// Create HttpClientConfig from the application configuration
    pub fn from_app_config(config: &AppConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(&config.site.base_url)?,
            user_agent: config.site.user_agent.clone(),
            timeout: config.details.request_timeout(),
        })
    }
}

/// Fetches detail pages for one batch
#[derive(Clone)]
pub struct DetailFetcher {
    client: Client,
    config: HttpClientConfig,
}

impl DetailFetcher {
    /// Create a new fetcher with its own cookie store
    pub fn with_config(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = ClientBuilder::new()
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .brotli(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;
        info!("🌐 Detail fetcher ready (base: {})", config.base_url);

        Ok(Self { client, config })
    }


    /// Resolves a listing reference to the absolute detail URL
    pub fn resolve(&self, reference: &ListingReference) -> Result<Url, ExtractionError> {
        reference
            .resolve(&self.config.base_url)
            .map_err(|e| ExtractionError::InvalidReference {
                reference: reference.to_string(),
                reason: e.to_string(),
            })
    }

    /// Single GET of an absolute URL; returns the body on status 200
    pub async fn fetch_html_string(&self, url: &Url) -> Result<String, ExtractionError> {
        debug!("HTTP GET: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ExtractionError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Not able to get data for url: {}, status code: {}", url, status);
            return Err(ExtractionError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|source| ExtractionError::Body {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DetailSource for DetailFetcher {
    async fn fetch(&self, reference: &ListingReference) -> Result<String, ExtractionError> {
        let url = self.resolve(reference)?;
        self.fetch_html_string(&url).await
    }
}
