//! End-to-end pipeline tests with a stubbed listing stage and a mock detail server
use async_trait::async_trait;
use imdb_scraper_lib::application::pipeline::{PipelineError, PipelineSettings, ScrapePipeline};
use imdb_scraper_lib::domain::{ListingSource, SearchMode, SearchRequest};
use imdb_scraper_lib::infrastructure::browser::ExpansionError;
use imdb_scraper_lib::infrastructure::config::AppConfig;
use imdb_scraper_lib::infrastructure::http_client::{DetailFetcher, HttpClientConfig};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Listing stage stand-in: hands back fixed markup, or fails like a listing
/// whose "load more" control never shows up
struct StubListing {
    markup: Option<String>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl StubListing {
    fn with_markup(markup: String) -> Self {
        Self {
            markup: Some(markup),
            requested: Arc::default(),
        }
    }

    fn unreachable() -> Self {
        Self {
            markup: None,
            requested: Arc::default(),
        }
    }
}

#[async_trait]
impl ListingSource for StubListing {
    async fn expand(&self, url: &str) -> Result<String, ExpansionError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.markup.clone().ok_or_else(|| ExpansionError::ControlTimeout {
            selector: "button.ipc-see-more__button".to_string(),
            timeout_secs: 15,
        })
    }
}

fn category_listing(ids: &[&str]) -> String {
    let items: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li class="ipc-metadata-list-summary-item"><a class="ipc-title-link-wrapper" href="/title/{id}/"><h3>{id}</h3></a></li>"#
            )
        })
        .collect();
    format!(r#"<html><body><ul class="ipc-metadata-list">{items}</ul></body></html>"#)
}

fn detail_page(title: &str, year: &str) -> String {
    format!(
        r#"<html><body>
        <h1><span class="hero__primary-text">{title}</span></h1>
        <a href="/title/tt/releaseinfo?ref_=tt_ov_rdat">{year}</a>
        <div data-testid="hero-rating-bar__aggregate-rating__score"><span>7.9</span><span>/10</span></div>
        <span data-testid="plot-xl">A plot about {title}.</span>
        <a href="/name/nm1/?ref_=tt_ov_dr">Some Director</a>
        <a data-testid="title-cast-item__actor" href="/name/nm2/">Lead Actor</a>
        <a data-testid="title-cast-item__actor" href="/name/nm3/">Second Actor</a>
        </body></html>"#
    )
}

async fn mount_detail(server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/title/{id}/")))
        .respond_with(response)
        .mount(server)
        .await;
}

fn pipeline_for<L: ListingSource>(listing: L, base_url: &str, out_dir: &Path) -> ScrapePipeline<L, DetailFetcher> {
    let fetcher = DetailFetcher::with_config(HttpClientConfig {
        base_url: Url::parse(base_url).unwrap(),
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
        timeout: Some(Duration::from_secs(5)),
    })
    .unwrap();

    let config = AppConfig::default();
    let settings = PipelineSettings {
        base_url: base_url.to_string(),
        out_dir: out_dir.to_path_buf(),
        max_concurrent: 3,
        parsing: config.parsing,
    };
    ScrapePipeline::new(listing, fetcher, settings).unwrap()
}

#[tokio::test]
async fn drama_listing_of_three_titles_yields_three_rows() {
    let server = MockServer::start().await;
    let ids = ["tt0000001", "tt0000002", "tt0000003"];
    for (i, id) in ids.iter().enumerate() {
        let body = detail_page(&format!("Drama {}", i + 1), &format!("200{i}"));
        mount_detail(&server, id, ResponseTemplate::new(200).set_body_string(body)).await;
    }

    let root = tempfile::tempdir().unwrap();
    let out_dir = root.path().join("out");
    let pipeline = pipeline_for(StubListing::with_markup(category_listing(&ids)), &server.uri(), &out_dir);

    let request = SearchRequest::new("drama", SearchMode::ByCategory);
    let report = pipeline.run(&request).await.unwrap();

    assert!(report.path.ends_with("out/drama.csv"));
    assert_eq!(report.listed, 3);
    assert_eq!(report.aggregation.succeeded, 3);
    assert_eq!(report.aggregation.failed, 0);
    assert_eq!(
        imdb_scraper_lib::cli::success_message(&report.path),
        format!("Congrats!!! your file is ready {}", out_dir.join("drama.csv").display())
    );

    let mut reader = csv::Reader::from_path(&report.path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(
        headers,
        ["Title", "Release Year", "IMDB Rating", "Directors", "Cast", "Plot Summary"]
    );

    let mut rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    rows.sort();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        [
            "Drama 1",
            "2000",
            "7.9",
            "Some Director",
            "Lead Actor,Second Actor",
            "A plot about Drama 1."
        ]
    );
}

#[tokio::test]
async fn listing_url_is_built_from_the_request() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();
    let listing = StubListing::with_markup(category_listing(&[]));
    let requested = Arc::clone(&listing.requested);
    let pipeline = pipeline_for(listing, &server.uri(), root.path());

    let report = pipeline
        .run(&SearchRequest::new("action", SearchMode::ByCategory))
        .await
        .unwrap();

    assert_eq!(
        *requested.lock().unwrap(),
        vec![format!("{}/search/title/?genres=action", server.uri())]
    );
    // an empty listing still produces a header-only file
    assert_eq!(report.listed, 0);
    let written = std::fs::read_to_string(root.path().join("action.csv")).unwrap();
    assert_eq!(written.lines().count(), 1);
}

#[tokio::test]
async fn failed_detail_page_is_skipped() {
    let server = MockServer::start().await;
    let ids = ["tt0000001", "tt0000002", "tt0000003", "tt0000004", "tt0000005"];
    for (i, id) in ids.iter().enumerate() {
        let response = if i == 2 {
            ResponseTemplate::new(503)
        } else {
            ResponseTemplate::new(200).set_body_string(detail_page(&format!("Title {}", i + 1), "1999"))
        };
        mount_detail(&server, id, response).await;
    }

    let root = tempfile::tempdir().unwrap();
    let pipeline = pipeline_for(StubListing::with_markup(category_listing(&ids)), &server.uri(), root.path());

    let report = pipeline
        .run(&SearchRequest::new("thriller", SearchMode::ByCategory))
        .await
        .unwrap();

    assert_eq!(report.listed, 5);
    assert_eq!(report.aggregation.succeeded, 4);
    assert_eq!(report.aggregation.failed, 1);

    let mut reader = csv::Reader::from_path(&report.path).unwrap();
    let titles: Vec<String> = reader.records().map(|r| r.unwrap()[0].to_string()).collect();
    assert_eq!(titles.len(), 4);
    assert!(!titles.contains(&"Title 3".to_string()));
    for record in csv::Reader::from_path(&report.path).unwrap().records() {
        assert_eq!(record.unwrap().len(), 6);
    }
}

#[tokio::test]
async fn page_without_title_is_skipped() {
    let server = MockServer::start().await;
    mount_detail(
        &server,
        "tt0000001",
        ResponseTemplate::new(200).set_body_string(detail_page("Kept", "2010")),
    )
    .await;
    mount_detail(
        &server,
        "tt0000002",
        ResponseTemplate::new(200).set_body_string("<html><body><p>Not a title page</p></body></html>"),
    )
    .await;

    let root = tempfile::tempdir().unwrap();
    let listing = StubListing::with_markup(category_listing(&["tt0000001", "tt0000002"]));
    let pipeline = pipeline_for(listing, &server.uri(), root.path());

    let report = pipeline
        .run(&SearchRequest::new("western", SearchMode::ByCategory))
        .await
        .unwrap();

    assert_eq!(report.aggregation.succeeded, 1);
    assert_eq!(report.aggregation.failed, 1);
}

#[tokio::test]
async fn unreachable_listing_is_fatal_and_writes_nothing() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();
    let out_dir = root.path().join("out");
    let pipeline = pipeline_for(StubListing::unreachable(), &server.uri(), &out_dir);

    let request = SearchRequest::new("drama", SearchMode::ByCategory);
    let err = pipeline.run(&request).await.unwrap_err();

    assert!(matches!(err, PipelineError::ListingUnavailable(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(err.user_message(request.mode()).contains("wrong genres"));
    assert!(!out_dir.join("drama.csv").exists());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn listing_item_without_anchor_is_fatal() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();
    let markup = r#"<ul>
        <li class="ipc-metadata-list-summary-item"><a class="ipc-title-link-wrapper" href="/title/tt1/">One</a></li>
        <li class="ipc-metadata-list-summary-item"><span>layout changed</span></li>
    </ul>"#;
    let pipeline = pipeline_for(StubListing::with_markup(markup.to_string()), &server.uri(), root.path());

    let err = pipeline
        .run(&SearchRequest::new("drama", SearchMode::ByCategory))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ListingLayout(_)));
    assert_eq!(err.user_message(SearchMode::ByCategory), "sorry we run into some error please try again");
    assert!(!root.path().join("drama.csv").exists());
}
