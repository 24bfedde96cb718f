//! Command line entry point

#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::application::pipeline::{GENERIC_FAILURE_MESSAGE, PipelineError, PipelineReport, ScrapePipeline};
use crate::application::presentation::{StatusTicker, TickerSettings, load_status_messages};
use crate::application::prompt_search_request;
use crate::domain::{SearchMode, SearchRequest};
use crate::infrastructure::{AppConfig, ensure_directories, init_logging_with_config, log_system_info};

#[derive(Parser, Debug)]
#[command(name = "imdb-scraper", version)]
#[command(about = "Expands an IMDb search listing and writes the title details to CSV", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./imdb-scraper.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Search mode: genres or keyword. Skips the interactive menu.
    #[arg(short, long, requires = "term")]
    pub mode: Option<SearchMode>,

    /// Search term, used together with --mode
    #[arg(short, long, requires = "mode")]
    pub term: Option<String>,
}

impl Cli {
    /// The request given on the command line, if any
    pub fn search_request(&self) -> Option<SearchRequest> {
        match (self.mode, &self.term) {
            (Some(mode), Some(term)) => Some(SearchRequest::new(term.as_str(), mode)),
            _ => None,
        }
    }
}

pub fn success_message(path: &std::path::Path) -> String {
    format!("Congrats!!! your file is ready {}", path.display())
}

pub async fn run() -> ExitCode {
    run_with(Cli::parse()).await
}

pub async fn run_with(cli: Cli) -> ExitCode {
    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = ensure_directories(&config.paths) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = init_logging_with_config(&config.logging, &config.paths.logs_dir) {
        eprintln!("Logging disabled: {}", e);
    }
    log_system_info();

    let request = match cli.search_request() {
        Some(request) => request,
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            match prompt_search_request(&mut stdin.lock(), &mut stdout, config.presentation.typing_delay()) {
                Ok(request) => request,
                Err(e) => {
                    error!("No search request: {}", e);
                    println!("{}", GENERIC_FAILURE_MESSAGE);
                    return ExitCode::FAILURE;
                }
            }
        }
    };
    info!("Search request: {:?}", request);

    let pipeline = match ScrapePipeline::from_app_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to set up pipeline: {}", e);
            println!("{}", e.user_message(request.mode()));
            return ExitCode::from(e.exit_code());
        }
    };

    let ticker = if config.presentation.enabled {
        let messages = load_status_messages(&config.paths.messages_file);
        StatusTicker::start(messages, TickerSettings::from(&config.presentation), io::stdout())
            .map_err(|e| warn!("Status ticker unavailable: {}", e))
            .ok()
    } else {
        None
    };

    let result = pipeline.run(&request).await;

    if let Some(ticker) = ticker {
        ticker.stop();
    }

    ExitCode::from(report_outcome(&result, request.mode(), &mut io::stdout()))
}

/// Prints the final user message for a run and returns its exit status
pub fn report_outcome<W: Write>(
    result: &Result<PipelineReport, PipelineError>,
    mode: SearchMode,
    out: &mut W,
) -> u8 {
    let (message, code) = match result {
        Ok(report) => (success_message(&report.path), 0),
        Err(e) => {
            error!("Scrape failed: {}", e);
            (e.user_message(mode), e.exit_code())
        }
    };
    if let Err(e) = writeln!(out, "{}", message) {
        warn!("Failed to print final message: {}", e);
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::aggregator::AggregationReport;
    use crate::infrastructure::browser::ExpansionError;
    use crate::infrastructure::parsing::ParsingError;
    use std::path::Path;

    #[test]
    fn test_mode_and_term_flags() {
        let cli = Cli::try_parse_from(["imdb-scraper", "--mode", "genres", "--term", "drama"]).unwrap();
        let request = cli.search_request().unwrap();
        assert_eq!(request.mode(), SearchMode::ByCategory);
        assert_eq!(request.term(), "drama");
    }

    #[test]
    fn test_mode_requires_term() {
        assert!(Cli::try_parse_from(["imdb-scraper", "--mode", "keyword"]).is_err());
        assert!(Cli::try_parse_from(["imdb-scraper", "--term", "batman"]).is_err());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["imdb-scraper", "--mode", "actor", "--term", "x"]).is_err());
    }

    #[test]
    fn test_no_flags_means_interactive() {
        let cli = Cli::try_parse_from(["imdb-scraper"]).unwrap();
        assert!(cli.search_request().is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_successful_run_exits_zero() {
        let result = Ok(PipelineReport {
            path: PathBuf::from("out/drama.csv"),
            listed: 2,
            aggregation: AggregationReport {
                succeeded: 2,
                failed: 0,
            },
        });
        let mut out = Vec::new();

        assert_eq!(report_outcome(&result, SearchMode::ByCategory, &mut out), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "Congrats!!! your file is ready out/drama.csv\n");
    }

    #[test]
    fn test_unreachable_listing_exits_one() {
        let result = Err(PipelineError::ListingUnavailable(ExpansionError::ControlTimeout {
            selector: "button.ipc-see-more__button".to_string(),
            timeout_secs: 15,
        }));
        let mut out = Vec::new();

        assert_eq!(report_outcome(&result, SearchMode::ByKeyword, &mut out), 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Sorry, seems like we broke the imdb server or you have entered wrong keyword, Please Try again after 5 minute\n"
        );
    }

    #[test]
    fn test_layout_failure_exits_one() {
        let result = Err(PipelineError::ListingLayout(ParsingError::ItemHrefMissing { index: 0 }));
        let mut out = Vec::new();

        assert_eq!(report_outcome(&result, SearchMode::ByCategory, &mut out), 1);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", GENERIC_FAILURE_MESSAGE));
    }

    #[test]
    fn test_success_message() {
        assert_eq!(
            success_message(Path::new("out/drama.csv")),
            "Congrats!!! your file is ready out/drama.csv"
        );
    }
}
