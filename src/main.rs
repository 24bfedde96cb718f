#![allow(missing_docs)]

use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    imdb_scraper_lib::run().await
}
