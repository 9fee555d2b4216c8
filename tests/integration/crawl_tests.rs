//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and run explore and
//! download end-to-end through the real HTTP fetcher.

use doc_harvester::config::Config;
use doc_harvester::crawler::{self, FetchError, HttpFetcher, PageFetcher};
use doc_harvester::HarvestError;
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing its document into `dir`
fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.fetcher.user_agent = "TestHarvester/1.0".to_string();
    config.fetcher.timeout_secs = 5;
    config.output.document_path = dir
        .path()
        .join("out/docs.json")
        .to_string_lossy()
        .into_owned();
    config
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body><main>{}</main></body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn read_document(config: &Config) -> Value {
    let json = std::fs::read_to_string(&config.output.document_path)
        .expect("Document should have been written");
    serde_json::from_str(&json).expect("Document should be valid JSON")
}

#[tokio::test]
async fn test_download_harvests_root_and_parent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let root = format!("{}/docs/guide/page", base_url);

    mount_page(
        &mock_server,
        "/docs/guide/page",
        html_page(
            "Page",
            r#"<h1>Page</h1><p>Details about the page.</p>
            <a href="/docs/guide">Back to guide</a>
            <a href="/docs/guide/page/sub">Deeper</a>
            <a href="https://other.test/docs/guide">Elsewhere</a>"#,
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/docs/guide",
        html_page("Guide", "<h1>Guide</h1><p>Overview.</p>"),
    )
    .await;

    // Out-of-scope pages must never be requested
    Mock::given(method("GET"))
        .and(path("/docs/guide/page/sub"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let report = crawler::download(&config, &root)
        .await
        .expect("Download should succeed");

    assert_eq!(report.root_title, "Page");
    assert_eq!(report.accepted, vec![format!("{}/docs/guide", base_url)]);
    assert_eq!(report.harvested.len(), 2);
    assert!(report.failed.is_empty());

    let document = read_document(&config);
    assert_eq!(document["rootUrl"], root.as_str());
    assert!(document["createdAt"].is_string());
    assert!(document["purpose"].is_string());

    let pages = document["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);

    assert_eq!(pages[0]["url"], root.as_str());
    assert_eq!(pages[0]["title"], "Page");
    assert_eq!(pages[0]["path"], "/docs/guide/page");
    assert!(pages[0]["content"]
        .as_str()
        .unwrap()
        .starts_with("Page\nDetails about the page."));
    assert_eq!(
        pages[0]["links"],
        serde_json::json!([format!("{}/docs/guide", base_url)])
    );

    assert_eq!(pages[1]["url"], format!("{}/docs/guide", base_url).as_str());
    assert_eq!(pages[1]["title"], "Guide");
    assert_eq!(pages[1]["content"], "Guide\nOverview.");
    assert!(pages[1]["lastFetched"].is_string());
}

#[tokio::test]
async fn test_explore_lists_links_without_writing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let root = format!("{}/docs/prompt-engineering/intro", base_url);

    mount_page(
        &mock_server,
        "/docs/prompt-engineering/intro",
        html_page(
            "Intro",
            r#"<a href="/docs/prompt-engineering">Overview</a>
            <a href="/docs/prompt-engineering/#start">Overview again</a>
            <a href="/docs/prompt-engineering/techniques">Techniques</a>
            <a href="/pricing">Pricing</a>
            <a href="mailto:docs@x.test">Mail</a>"#,
        ),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let report = crawler::explore(&config, &root)
        .await
        .expect("Explore should succeed");

    assert_eq!(report.links_found, 4);
    assert_eq!(
        report.accepted,
        vec![
            format!("{}/docs/prompt-engineering", base_url),
            format!("{}/docs/prompt-engineering/techniques", base_url),
        ]
    );

    // only the root was fetched
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    assert!(!std::path::Path::new(&config.output.document_path).exists());
}

#[tokio::test]
async fn test_missing_link_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let root = format!("{}/docs/prompt-engineering/intro", base_url);

    mount_page(
        &mock_server,
        "/docs/prompt-engineering/intro",
        html_page(
            "Intro",
            r#"<p>Intro text</p>
            <a href="/docs/prompt-engineering/gone">Gone</a>
            <a href="/docs/prompt-engineering">Overview</a>"#,
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/docs/prompt-engineering",
        html_page("Overview", "<p>Overview text</p>"),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/docs/prompt-engineering/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let report = crawler::download(&config, &root)
        .await
        .expect("A missing link should not abort the harvest");

    assert_eq!(report.harvested.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(
        report.failed[0].0,
        format!("{}/docs/prompt-engineering/gone", base_url)
    );

    let document = read_document(&config);
    let urls: Vec<&str> = document["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|page| page["url"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        vec![root.clone(), format!("{}/docs/prompt-engineering", base_url)]
    );
}

#[tokio::test]
async fn test_root_server_error_is_fatal() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/docs/guide/page", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/docs/guide/page"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let result = crawler::download(&config, &root).await;
    assert!(matches!(
        result,
        Err(HarvestError::Transport(FetchError::Status { status: 500, .. }))
    ));

    // a failed harvest writes nothing
    assert!(!std::path::Path::new(&config.output.document_path).exists());
}

#[tokio::test]
async fn test_root_failure_keeps_previous_document() {
    let mock_server = MockServer::start().await;
    let root = format!("{}/docs/guide/page", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/docs/guide/page"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let document_path = std::path::Path::new(&config.output.document_path);
    std::fs::create_dir_all(document_path.parent().unwrap()).unwrap();
    std::fs::write(document_path, "previous harvest").unwrap();

    let result = crawler::download(&config, &root).await;
    assert!(result.is_err());

    assert_eq!(
        std::fs::read_to_string(document_path).unwrap(),
        "previous harvest"
    );
}

#[tokio::test]
async fn test_invalid_root_url() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let result = crawler::download(&config, "not a url").await;
    assert!(matches!(result, Err(HarvestError::InvalidUrl(_))));
    assert!(!std::path::Path::new(&config.output.document_path).exists());
}

#[tokio::test]
async fn test_fetcher_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", "TestHarvester/1.0"))
        .respond_with(html_page("Page", "<p>hello</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let fetcher = HttpFetcher::new(&config.fetcher).unwrap();

    let page = fetcher
        .fetch(&format!("{}/page", mock_server.uri()))
        .await
        .expect("Fetch should succeed");

    assert_eq!(
        page.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
    assert!(page.body.contains("<p>hello</p>"));
}

#[tokio::test]
async fn test_fetcher_follows_redirects() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/new", html_page("New", "<p>moved</p>")).await;

    let dir = TempDir::new().unwrap();
    let fetcher = HttpFetcher::new(&create_test_config(&dir).fetcher).unwrap();

    let page = fetcher.fetch(&format!("{}/old", base_url)).await.unwrap();
    assert_eq!(page.final_url, format!("{}/new", base_url));
}
