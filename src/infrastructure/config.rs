//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate:
//! 1. Built-in defaults (`AppConfig::default()`, constants in [`defaults`])
//! 2. Optional TOML file (`imdb-scraper.toml` unless overridden)
//! 3. `IMDB_SCRAPER__*` environment variables

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::infrastructure::parsing::config::ParsingConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub listing: ListingConfig,
    pub details: DetailConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
    pub presentation: PresentationConfig,
    pub parsing: ParsingConfig,
}

/// Target site settings shared by both stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL that listing URLs and detail references are built on
    pub base_url: String,

    /// User agent sent by the rendering session and the detail fetcher
    pub user_agent: String,
}

/// Listing expansion (rendering session) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// How long to wait for the "load more" control to become clickable
    pub control_timeout_secs: u64,

    /// Upper bound on "load more" iterations
    pub max_load_more_clicks: u32,

    /// Pause after each successful click so new items can be injected
    pub click_pause_secs: u64,

    /// Polling interval while waiting for the control
    pub poll_interval_ms: u64,

    pub window_width: u32,
    pub window_height: u32,
    pub headless: bool,

    /// Explicit Chrome/Chromium binary; auto-detected when unset
    pub chrome_executable: Option<PathBuf>,
}

/// Detail page fetching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailConfig {
    /// Maximum number of detail pages in flight at once
    pub max_concurrent: usize,

    /// Per-request timeout; the transport default applies when unset
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub out_dir: PathBuf,
    pub logs_dir: PathBuf,
    /// Status phrases shown while scraping, one per line
    pub messages_file: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stdout is shared with the status ticker)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log file name inside the logs directory
    pub file_name: String,
}

/// Status ticker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub enabled: bool,
    pub typing_delay_ms: u64,
    pub hold_ms: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            control_timeout_secs: defaults::CONTROL_TIMEOUT_SECONDS,
            max_load_more_clicks: defaults::MAX_LOAD_MORE_CLICKS,
            click_pause_secs: defaults::CLICK_PAUSE_SECONDS,
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            window_width: defaults::WINDOW_WIDTH,
            window_height: defaults::WINDOW_HEIGHT,
            headless: true,
            chrome_executable: None,
        }
    }
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::DETAIL_MAX_CONCURRENT,
            request_timeout_secs: None,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(defaults::OUT_DIR),
            logs_dir: PathBuf::from(defaults::LOGS_DIR),
            messages_file: PathBuf::from(defaults::MESSAGES_FILE),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: false,
            file_output: true,
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            typing_delay_ms: defaults::TYPING_DELAY_MS,
            hold_ms: defaults::MESSAGE_HOLD_MS,
        }
    }
}

impl ListingConfig {
    pub const fn control_timeout(&self) -> Duration {
        Duration::from_secs(self.control_timeout_secs)
    }

    pub const fn click_pause(&self) -> Duration {
        Duration::from_secs(self.click_pause_secs)
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl DetailConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl PresentationConfig {
    pub const fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    pub const fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}

impl AppConfig {
    /// Loads defaults, then the optional file, then the environment.
    ///
    /// An explicitly given `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(defaults::CONFIG_FILE), false),
        };
        debug!("Loading configuration (file: {:?}, required: {})", file, required);

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::from(file.as_path()).required(required))
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;

        info!("✅ Configuration loaded (base_url={})", config.site.base_url);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = Url::parse(&self.site.base_url).map_err(|e| ConfigError::Validation {
            message: format!("site.base_url '{}' is not a valid URL: {}", self.site.base_url, e),
        })?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::Validation {
                message: format!("site.base_url '{}' cannot be used as a base", self.site.base_url),
            });
        }

        if self.details.max_concurrent == 0 {
            return Err(ConfigError::Validation {
                message: "details.max_concurrent must be greater than 0".to_string(),
            });
        }

        if self.listing.control_timeout_secs == 0 {
            return Err(ConfigError::Validation {
                message: "listing.control_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.listing.poll_interval_ms == 0 {
            return Err(ConfigError::Validation {
                message: "listing.poll_interval_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Default values for configuration
pub mod defaults {
    /// Site the scraper targets
    pub const BASE_URL: &str = "https://www.imdb.com";

    /// Desktop browser user agent; the site answers 403 to unknown clients
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

    /// Wait budget for the "load more" control, in seconds
    pub const CONTROL_TIMEOUT_SECONDS: u64 = 15;

    /// "Load more" iterations per listing
    pub const MAX_LOAD_MORE_CLICKS: u32 = 5;

    /// Pause after each click, in seconds
    pub const CLICK_PAUSE_SECONDS: u64 = 5;

    pub const POLL_INTERVAL_MS: u64 = 250;

    pub const WINDOW_WIDTH: u32 = 1920;
    pub const WINDOW_HEIGHT: u32 = 1080;

    /// Default maximum concurrent requests for the detail fetcher
    pub const DETAIL_MAX_CONCURRENT: usize = 10;

    pub const OUT_DIR: &str = "out";
    pub const LOGS_DIR: &str = "logs";
    pub const MESSAGES_FILE: &str = "messages.txt";
    pub const LOG_FILE_NAME: &str = "imdb-scraper.log";
    pub const CONFIG_FILE: &str = "imdb-scraper.toml";
    pub const ENV_PREFIX: &str = "IMDB_SCRAPER";

    pub const TYPING_DELAY_MS: u64 = 50;
    pub const MESSAGE_HOLD_MS: u64 = 2000;
}
