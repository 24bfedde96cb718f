//! Rendering session for the listing stage
//!
//! The search listing only reveals all of its items after client-side script
//! runs, so it is loaded in a headless Chromium driven over CDP. Every session
//! is torn down on every exit path: `BrowserListingSource::expand` always calls
//! [`RenderingSession::shutdown`], and dropping a session aborts its CDP
//! handler task. The handler rides out isolated protocol errors and only
//! stops after a run of consecutive failures.

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::{Stream, StreamExt};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

use crate::application::listing_expander::{ExpansionSettings, ListingExpander, ListingPage};
use crate::domain::ListingSource;
use crate::infrastructure::config::AppConfig;

/// Returns true when the element can receive a click right now
const CLICKABLE_JS: &str = r"function() {
    if (!this.isConnected || this.disabled) { return false; }
    const style = window.getComputedStyle(this);
    if (style.display === 'none' || style.visibility === 'hidden') { return false; }
    const rect = this.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}";

/// Script click, which is not intercepted by overlays the way a mouse click is
const CLICK_JS: &str = "function() { this.click(); }";

#[derive(Error, Debug)]
pub enum ExpansionError {
    #[error("Failed to launch rendering session: {0}")]
    Launch(String),

    #[error("Failed to open {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("'{selector}' did not become clickable within {timeout_secs}s")]
    ControlTimeout { selector: String, timeout_secs: u64 },

    #[error("'{selector}' is no longer on the page")]
    ControlMissing { selector: String },

    #[error("Load-more control went stale: {0}")]
    StaleControl(String),

    #[error("Rendering session error: {0}")]
    Protocol(String),
}

/// Launch options for the rendering browser
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub window_width: u32,
    pub window_height: u32,
    pub headless: bool,
    pub user_agent: String,
    pub chrome_executable: Option<PathBuf>,
}

impl BrowserSettings {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            window_width: config.listing.window_width,
            window_height: config.listing.window_height,
            headless: config.listing.headless,
            user_agent: config.site.user_agent.clone(),
            chrome_executable: config.listing.chrome_executable.clone(),
        }
    }

    fn build_browser_config(&self) -> Result<BrowserConfig, ExpansionError> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.window_width, self.window_height)
            .arg("--start-maximized")
            .arg(format!("--user-agent={}", self.user_agent));

        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.chrome_executable {
            info!("Configuring browser with Chromium at {:?}", path);
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(ExpansionError::Launch)
    }
}

/// Consecutive handler errors after which the browser is treated as gone
const MAX_CONSECUTIVE_HANDLER_ERRORS: usize = 10;

/// Pumps CDP events until the stream ends or errors keep coming.
///
/// Isolated errors (unknown events the client cannot deserialize) are logged
/// and skipped; any successful event resets the count. Returns the number of
/// consecutive errors seen when the loop stopped.
async fn drive_handler<S, T, E>(mut events: S) -> usize
where
    S: Stream<Item = Result<T, E>> + Unpin,
    E: fmt::Display,
{
    let mut consecutive_errors = 0;
    while let Some(event) = events.next().await {
        match event {
            Ok(_) => consecutive_errors = 0,
            Err(e) => {
                consecutive_errors += 1;
                warn!(
                    "Browser handler error ({}/{}): {}",
                    consecutive_errors, MAX_CONSECUTIVE_HANDLER_ERRORS, e
                );
                if consecutive_errors >= MAX_CONSECUTIVE_HANDLER_ERRORS {
                    error!("Browser handler gave up after {} consecutive errors", consecutive_errors);
                    break;
                }
            }
        }
    }
    consecutive_errors
}

/// Background task pumping the CDP connection; aborted on drop unless joined
struct HandlerTask(Option<JoinHandle<()>>);

impl HandlerTask {
    fn spawn<S, T, E>(events: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + Unpin + Send + 'static,
        T: Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        Self(Some(tokio::spawn(async move {
            drive_handler(events).await;
            debug!("Browser handler stopped");
        })))
    }

    async fn join(&mut self, timeout: Duration) {
        if let Some(handle) = self.0.take() {
            if tokio::time::timeout(timeout, handle).await.is_err() {
                debug!("Browser handler did not finish in time");
            }
        }
    }
}

impl Drop for HandlerTask {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

/// A running browser plus the task pumping its CDP connection
pub struct RenderingSession {
    browser: Browser,
    handler: HandlerTask,
}

impl RenderingSession {
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, ExpansionError> {
        let config = settings.build_browser_config()?;

        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|e| ExpansionError::Launch(e.to_string()))?;

        info!("🚀 Rendering session launched");
        Ok(Self {
            browser,
            handler: HandlerTask::spawn(handler),
        })
    }

    pub const fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Closes the browser, reaps the process and stops the handler task
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser process: {}", e);
        }
        self.handler.join(Duration::from_secs(2)).await;
        info!("Rendering session closed");
    }
}

/// Listing page loaded in Chromium, with the "load more" control it drives
pub struct ChromiumListingPage {
    page: Page,
    selector: String,
    poll_interval: Duration,
    control: Option<Element>,
}

impl ChromiumListingPage {
    pub fn new(page: Page, selector: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            page,
            selector: selector.into(),
            poll_interval,
            control: None,
        }
    }

    async fn is_clickable(element: &Element) -> bool {
        match element.call_js_fn(CLICKABLE_JS, false).await {
            Ok(returns) => returns
                .result
                .value
                .and_then(|value| value.as_bool())
                .unwrap_or(false),
            Err(e) => {
                debug!("Clickability check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl ListingPage for ChromiumListingPage {
    async fn wait_for_control(&mut self, timeout: Duration) -> Result<(), ExpansionError> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Ok(element) = self.page.find_element(self.selector.as_str()).await {
                if Self::is_clickable(&element).await {
                    self.control = Some(element);
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                self.control = None;
                return Err(ExpansionError::ControlTimeout {
                    selector: self.selector.clone(),
                    timeout_secs: timeout.as_secs(),
                });
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn click_control(&mut self) -> Result<(), ExpansionError> {
        let element = self
            .control
            .as_ref()
            .ok_or_else(|| ExpansionError::StaleControl("control has not been located".to_string()))?;

        element
            .call_js_fn(CLICK_JS, false)
            .await
            .map_err(|e| ExpansionError::StaleControl(e.to_string()))?;
        Ok(())
    }

    async fn relocate_control(&mut self) -> Result<(), ExpansionError> {
        match self.page.find_element(self.selector.as_str()).await {
            Ok(element) => {
                self.control = Some(element);
                Ok(())
            }
            Err(e) => {
                debug!("Re-locating '{}' failed: {}", self.selector, e);
                self.control = None;
                Err(ExpansionError::ControlMissing {
                    selector: self.selector.clone(),
                })
            }
        }
    }

    async fn markup(&mut self) -> Result<String, ExpansionError> {
        self.page
            .content()
            .await
            .map_err(|e| ExpansionError::Protocol(e.to_string()))
    }
}

/// Listing source backed by a fresh rendering session per listing
pub struct BrowserListingSource {
    settings: BrowserSettings,
    load_more_selector: String,
    poll_interval: Duration,
    expander: ListingExpander,
}

impl BrowserListingSource {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            settings: BrowserSettings::from_app_config(config),
            load_more_selector: config.parsing.listing.load_more.clone(),
            poll_interval: config.listing.poll_interval(),
            expander: ListingExpander::new(ExpansionSettings::from(&config.listing)),
        }
    }

    async fn expand_in_session(&self, session: &RenderingSession, url: &str) -> Result<String, ExpansionError> {
        let page = session
            .browser()
            .new_page(url)
            .await
            .map_err(|e| ExpansionError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let mut listing_page =
            ChromiumListingPage::new(page.clone(), self.load_more_selector.as_str(), self.poll_interval);
        let result = self.expander.expand(&mut listing_page).await;

        if let Err(e) = page.close().await {
            warn!("Failed to close page: {}", e);
        }

        result.map(|expanded| {
            info!(
                "Listing expanded: {} clicks, {} recoveries, {} bytes",
                expanded.clicks,
                expanded.recoveries,
                expanded.markup.len()
            );
            expanded.markup
        })
    }
}

#[async_trait]
impl ListingSource for BrowserListingSource {
    async fn expand(&self, url: &str) -> Result<String, ExpansionError> {
        info!("Expanding listing: {}", url);

        let mut session = RenderingSession::launch(&self.settings).await?;
        let result = self.expand_in_session(&session, url).await;
        session.shutdown().await;

        result
    }
}
