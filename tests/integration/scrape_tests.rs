//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for both the target website and the
//! chat-completions endpoint, and check the files written end-to-end.

use page_scribe::config::Config;
use page_scribe::crawler::ScrapeResult;
use page_scribe::{OutputFormat, Scraper, Strategy};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME_PAGE: &str = r#"<html lang="en">
<head>
  <title>Widget Co</title>
  <meta name="description" content="We make widgets">
  <style>body { color: red; }</style>
</head>
<body>
  <h1>Widgets for everyone</h1>
  <p>Our widgets are the <strong>best</strong> widgets.</p>
  <a href="/pricing">Pricing</a>
  <a href="https://partner.example.org/">Partner</a>
  <script>console.log("tracking")</script>
</body>
</html>"#;

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &TempDir, llm_base: Option<String>) -> Config {
    let mut config = Config::default();
    config.output.output_dir = dir.path().join("results").to_string_lossy().to_string();
    config.crawler.max_retries = 0;
    config.crawler.retry_delay_ms = 10;
    config.crawler.timeout_secs = 5;
    if let Some(base) = llm_base {
        config.llm.base_url = base;
        config.llm.api_key = Some("sk-test".to_string());
        config.llm.model = "test/model".to_string();
    }
    config
}

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(HOME_PAGE, "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "model": "test/model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn expect_success(result: ScrapeResult) -> Box<page_scribe::crawler::ScrapeSuccess> {
    match result {
        ScrapeResult::Success(success) => success,
        ScrapeResult::Failure(failure) => panic!("scrape failed: {:?}", failure.error),
    }
}

#[tokio::test]
async fn test_simple_scrape_writes_all_formats() {
    let site = MockServer::start().await;
    mount_site(&site).await;
    let dir = TempDir::new().unwrap();

    let scraper = Scraper::new(create_test_config(&dir, None)).unwrap();
    let url = format!("{}/", site.uri());

    let success = expect_success(
        scraper
            .scrape_website(&url, Strategy::Simple, &OutputFormat::ALL, None)
            .await,
    );

    assert_eq!(success.saved_files.len(), 4);
    assert_eq!(success.metadata.model_used, "none");
    assert_eq!(success.metadata.chunks_processed, 0);
    assert_eq!(success.metadata.links_found, 2);

    let domain = url::Url::parse(&url).unwrap();
    let expected_prefix = format!(
        "{}_{}_",
        domain.host_str().unwrap(),
        domain.port().unwrap()
    );
    for path in success.saved_files.values() {
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(&expected_prefix), "unexpected name {}", name);
        assert!(path.exists());
    }

    let markdown = std::fs::read_to_string(&success.saved_files[&OutputFormat::Markdown]).unwrap();
    assert!(markdown.contains("# Widgets for everyone"));
    assert!(!markdown.contains("tracking"));

    let html = std::fs::read_to_string(&success.saved_files[&OutputFormat::Html]).unwrap();
    assert_eq!(html, HOME_PAGE);

    let doc = read_json(&success.saved_files[&OutputFormat::Json]);
    assert_eq!(doc["scraping_method"], "simple");
    assert_eq!(doc["metadata"]["language"], "unknown");
    assert!(doc["metadata"]["title"]
        .as_str()
        .unwrap()
        .starts_with("Content from 127.0.0.1:"));
    assert_eq!(doc["links"].as_array().unwrap().len(), 2);

    let raw_path = &success.saved_files[&OutputFormat::Raw];
    assert!(raw_path.to_str().unwrap().ends_with("_raw.json"));
    let raw = read_json(raw_path);
    assert_eq!(raw["links"]["external"], json!(["https://partner.example.org/"]));
    assert_eq!(raw["metadata"]["title"], "Widget Co");
    assert_eq!(raw["metadata"]["description"], "We make widgets");
    assert_eq!(raw["metadata"]["language"], "en");
}

#[tokio::test]
async fn test_llm_scrape_parses_fenced_json() {
    let site = MockServer::start().await;
    mount_site(&site).await;

    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Return ONLY valid JSON"))
        .and(body_string_contains("Widgets for everyone"))
        .respond_with(completion(
            "```json\n{\"metadata\": {\"title\": \"Widget Co\"}, \"content\": {\"key_points\": [\"best widgets\"]}}\n```",
        ))
        .expect(1)
        .mount(&llm)
        .await;

    let dir = TempDir::new().unwrap();
    let scraper =
        Scraper::new(create_test_config(&dir, Some(format!("{}/v1", llm.uri())))).unwrap();

    let success = expect_success(
        scraper
            .scrape_website(
                &format!("{}/", site.uri()),
                Strategy::Comprehensive,
                &[OutputFormat::Json],
                None,
            )
            .await,
    );

    assert_eq!(success.metadata.model_used, "test/model");
    assert_eq!(success.metadata.chunks_processed, 1);
    assert_eq!(success.saved_files.len(), 1);

    let doc = read_json(&success.saved_files[&OutputFormat::Json]);
    assert_eq!(doc["metadata"]["title"], "Widget Co");
    assert_eq!(doc["content"]["key_points"], json!(["best widgets"]));
    assert!(doc["raw_markdown"]
        .as_str()
        .unwrap()
        .contains("Widgets for everyone"));
}

#[tokio::test]
async fn test_custom_prompt_is_sent() {
    let site = MockServer::start().await;
    mount_site(&site).await;

    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("product_name"))
        .respond_with(completion("{\"product_name\": \"Widget\"}"))
        .expect(1)
        .mount(&llm)
        .await;

    let dir = TempDir::new().unwrap();
    let scraper =
        Scraper::new(create_test_config(&dir, Some(format!("{}/v1", llm.uri())))).unwrap();

    let success = expect_success(
        scraper
            .scrape_website(
                &format!("{}/", site.uri()),
                Strategy::Llm,
                &[OutputFormat::Json],
                Some("Return {\"product_name\": \"...\"} as JSON."),
            )
            .await,
    );

    let value = serde_json::to_value(&success.data.json).unwrap();
    assert_eq!(value["product_name"], "Widget");
}

#[tokio::test]
async fn test_unparseable_reply_uses_fallback() {
    let site = MockServer::start().await;
    mount_site(&site).await;

    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion("Sorry, I cannot help with that."))
        .mount(&llm)
        .await;

    let dir = TempDir::new().unwrap();
    let scraper =
        Scraper::new(create_test_config(&dir, Some(format!("{}/v1", llm.uri())))).unwrap();

    let success = expect_success(
        scraper
            .scrape_website(&format!("{}/", site.uri()), Strategy::Llm, &[OutputFormat::Json], None)
            .await,
    );

    let doc = read_json(&success.saved_files[&OutputFormat::Json]);
    assert_eq!(doc["extraction_method"], "fallback");
    assert_eq!(doc["metadata"]["title"], "Extracted from markdown");
    let first_links = json!([format!("{}/pricing", site.uri()), "https://partner.example.org/"]);
    assert_eq!(doc["navigation"]["footer_links"], first_links);
    assert_eq!(doc["technical"]["external_links"], first_links);
}

#[tokio::test]
async fn test_llm_endpoint_error_still_succeeds_with_fallback() {
    let site = MockServer::start().await;
    mount_site(&site).await;

    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&llm)
        .await;

    let dir = TempDir::new().unwrap();
    let scraper =
        Scraper::new(create_test_config(&dir, Some(format!("{}/v1", llm.uri())))).unwrap();

    let success = expect_success(
        scraper
            .scrape_website(&format!("{}/", site.uri()), Strategy::Llm, &[OutputFormat::Json], None)
            .await,
    );

    assert_eq!(success.metadata.chunks_processed, 0);
    let value = serde_json::to_value(&success.data.json).unwrap();
    assert_eq!(value["extraction_method"], "fallback");
}

#[tokio::test]
async fn test_batch_scrape_summary() {
    let site = MockServer::start().await;
    mount_site(&site).await;
    let dir = TempDir::new().unwrap();

    let scraper = Scraper::new(create_test_config(&dir, None))
        .unwrap()
        .with_config_hash("abc123");

    let urls = vec![
        format!("{}/", site.uri()),
        format!("{}/missing", site.uri()),
        "ftp://example.com/".to_string(),
    ];

    let outcome = scraper
        .scrape_multiple_websites(
            &urls,
            Strategy::Simple,
            &[OutputFormat::Markdown, OutputFormat::Json],
            None,
            Duration::from_millis(10),
        )
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 3);
    assert!(outcome.results[0].is_success());
    assert!(!outcome.results[1].is_success());
    assert!(!outcome.results[2].is_success());

    let summary = read_json(&outcome.summary_path);
    assert_eq!(summary["summary"]["total_websites"], 3);
    assert_eq!(summary["summary"]["successful"], 1);
    assert_eq!(summary["summary"]["failed"], 2);
    assert_eq!(summary["summary"]["success_rate"], "33.3%");
    assert_eq!(summary["successful_urls"], json!([urls[0]]));
    assert_eq!(summary["failed_urls"], json!([urls[1], urls[2]]));
    assert!(summary["errors"][0].as_str().unwrap().contains("404"));
    assert_eq!(summary["config_hash"], "abc123");

    let summary_name = outcome
        .summary_path
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(summary_name.starts_with("scraping_summary_"));
    assert_eq!(outcome.summary_path.parent().unwrap(), scraper.output_dir());
}

#[tokio::test]
async fn test_failure_record_shape() {
    let site = MockServer::start().await;
    mount_site(&site).await;
    let dir = TempDir::new().unwrap();

    let scraper = Scraper::new(create_test_config(&dir, None)).unwrap();
    let url = format!("{}/missing", site.uri());

    let result = scraper
        .scrape_website(&url, Strategy::Simple, &[OutputFormat::Json], None)
        .await;

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["url"], url);
    assert_eq!(value["error"]["type"], "HttpStatusError");
    assert_eq!(value["error"]["url"], url);
    assert!(value["error"]["timestamp"].as_str().is_some());
}
