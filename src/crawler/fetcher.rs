//! HTTP fetcher implementation
//!
//! This module handles all page requests for the scraper, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests to fetch page content
//! - Retry logic for transient failures

use crate::config::CrawlerConfig;
use crate::ScribeError;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of redirects followed for a single page
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value (empty if absent)
    pub content_type: String,
    /// Page body
    pub body: String,
}

/// Outcome of a single request attempt
enum Attempt {
    Done(FetchedPage),
    Retry(ScribeError),
    Fail(ScribeError),
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use page_scribe::config::CrawlerConfig;
/// use page_scribe::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with retry logic
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | HTTP 5xx | Retry up to `max_retries` times |
/// | Timeout | Retry up to `max_retries` times |
/// | Other HTTP status | Immediate failure |
/// | Connection / TLS error | Immediate failure |
///
/// Retries are separated by `retry_delay_ms`.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    config: &CrawlerConfig,
) -> Result<FetchedPage, ScribeError> {
    let mut attempt = 0;

    loop {
        match fetch_once(client, url).await {
            Attempt::Done(page) => return Ok(page),
            Attempt::Fail(err) => return Err(err),
            Attempt::Retry(err) if attempt >= config.max_retries => {
                warn!("Giving up on {} after {} retries", url, attempt);
                return Err(err);
            }
            Attempt::Retry(err) => {
                attempt += 1;
                warn!(
                    "Transient failure for {} ({}), retry {}/{}",
                    url, err, attempt, config.max_retries
                );
                tokio::time::sleep(Duration::from_millis(config.retry_delay_ms)).await;
            }
        }
    }
}

async fn fetch_once(client: &Client, url: &str) -> Attempt {
    debug!("GET {}", url);

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            return Attempt::Retry(ScribeError::Timeout {
                url: url.to_string(),
            })
        }
        Err(e) => {
            return Attempt::Fail(ScribeError::Http {
                url: url.to_string(),
                source: e,
            })
        }
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if is_retryable_status(status) {
        return Attempt::Retry(ScribeError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if !status.is_success() {
        return Attempt::Fail(ScribeError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match response.text().await {
        Ok(body) => Attempt::Done(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        }),
        Err(e) if e.is_timeout() => Attempt::Retry(ScribeError::Timeout {
            url: url.to_string(),
        }),
        Err(e) => Attempt::Fail(ScribeError::Http {
            url: url.to_string(),
            source: e,
        }),
    }
}

/// Returns true for statuses worth retrying
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> CrawlerConfig {
        CrawlerConfig {
            user_agent: "TestScribe/1.0".to_string(),
            timeout_secs: 5,
            max_retries: 2,
            retry_delay_ms: 10,
            delay_secs: 0,
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body>Hello</body></html>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let config = create_test_config();
        let client = build_http_client(&config).unwrap();
        let page = fetch_page(&client, &format!("{}/", server.uri()), &config)
            .await
            .unwrap();

        assert_eq!(page.status_code, 200);
        assert!(page.content_type.starts_with("text/html"));
        assert!(page.body.contains("Hello"));
    }

    #[tokio::test]
    async fn test_fetch_404_fails_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let config = create_test_config();
        let client = build_http_client(&config).unwrap();
        let result = fetch_page(&client, &format!("{}/missing", server.uri()), &config).await;

        assert!(matches!(
            result,
            Err(ScribeError::HttpStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_5xx_retries_then_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let config = create_test_config();
        let client = build_http_client(&config).unwrap();
        let result = fetch_page(&client, &format!("{}/flaky", server.uri()), &config).await;

        assert!(matches!(
            result,
            Err(ScribeError::HttpStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_recovers_after_5xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recover"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/recover"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let config = create_test_config();
        let client = build_http_client(&config).unwrap();
        let page = fetch_page(&client, &format!("{}/recover", server.uri()), &config)
            .await
            .unwrap();

        assert_eq!(page.body, "ok");
    }
}
