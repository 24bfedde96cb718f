//! "Load more" expansion of a search listing
//!
//! The listing page only shows a first slice of its items; a control at the
//! bottom appends the next slice when clicked. [`ListingExpander`] drives that
//! control through a small state machine:
//!
//! - `AwaitingControl`: wait for the control to become clickable. Failing here
//!   is fatal for the run: the listing is unreachable or the term is wrong.
//! - `Clicking`: while the click budget lasts, click by script, wait for the
//!   control again, then pause so the new items can settle. A failure moves to
//!   `Stuck` instead of aborting.
//! - `Stuck`: spends one iteration and looks the control up once more without
//!   waiting. Found resumes `Clicking`, gone means the listing is exhausted.
//! - `Exhausted`: the current markup is the result.

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::infrastructure::browser::ExpansionError;
use crate::infrastructure::config::ListingConfig;

/// A rendered listing page with a "load more" control
#[async_trait]
pub trait ListingPage: Send {
    /// Waits until the control is clickable and remembers it
    async fn wait_for_control(&mut self, timeout: Duration) -> Result<(), ExpansionError>;

    /// Clicks the remembered control
    async fn click_control(&mut self) -> Result<(), ExpansionError>;

    /// Looks the control up again, without waiting
    async fn relocate_control(&mut self) -> Result<(), ExpansionError>;

    /// Current document markup
    async fn markup(&mut self) -> Result<String, ExpansionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    AwaitingControl,
    Clicking,
    Stuck,
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct ExpansionSettings {
    pub control_timeout: Duration,
    pub max_clicks: u32,
    pub click_pause: Duration,
}

impl From<&ListingConfig> for ExpansionSettings {
    fn from(config: &ListingConfig) -> Self {
        Self {
            control_timeout: config.control_timeout(),
            max_clicks: config.max_load_more_clicks,
            click_pause: config.click_pause(),
        }
    }
}

/// Final markup plus what it took to get there
#[derive(Debug, Clone)]
pub struct ExpandedListing {
    pub markup: String,
    /// Successful click iterations
    pub clicks: u32,
    /// Times the control was re-located after a failed iteration
    pub recoveries: u32,
}

#[derive(Debug, Clone)]
pub struct ListingExpander {
    settings: ExpansionSettings,
}

impl ListingExpander {
    pub const fn new(settings: ExpansionSettings) -> Self {
        Self { settings }
    }

    pub async fn expand<P>(&self, page: &mut P) -> Result<ExpandedListing, ExpansionError>
    where
        P: ListingPage + ?Sized,
    {
        let mut state = ExpansionState::AwaitingControl;
        let mut iterations = 0u32;
        let mut clicks = 0u32;
        let mut recoveries = 0u32;

        loop {
            state = match state {
                ExpansionState::AwaitingControl => {
                    if let Err(e) = page.wait_for_control(self.settings.control_timeout).await {
                        error!("Load-more control never became clickable: {}", e);
                        return Err(e);
                    }
                    ExpansionState::Clicking
                }
                ExpansionState::Clicking if iterations >= self.settings.max_clicks => {
                    debug!("Click budget of {} spent", self.settings.max_clicks);
                    ExpansionState::Exhausted
                }
                ExpansionState::Clicking => match self.click_once(page).await {
                    Ok(()) => {
                        iterations += 1;
                        clicks += 1;
                        debug!("Load-more click {}/{}", iterations, self.settings.max_clicks);
                        tokio::time::sleep(self.settings.click_pause).await;
                        ExpansionState::Clicking
                    }
                    Err(e) => {
                        warn!("Unable to get load-more control: {}", e);
                        ExpansionState::Stuck
                    }
                },
                ExpansionState::Stuck => {
                    iterations += 1;
                    match page.relocate_control().await {
                        Ok(()) => {
                            recoveries += 1;
                            ExpansionState::Clicking
                        }
                        Err(e) => {
                            info!("Load-more control is gone, listing exhausted: {}", e);
                            ExpansionState::Exhausted
                        }
                    }
                }
                ExpansionState::Exhausted => break,
            };
        }

        let markup = page.markup().await?;
        Ok(ExpandedListing {
            markup,
            clicks,
            recoveries,
        })
    }

    async fn click_once<P>(&self, page: &mut P) -> Result<(), ExpansionError>
    where
        P: ListingPage + ?Sized,
    {
        page.click_control().await?;
        page.wait_for_control(self.settings.control_timeout).await
    }
}
