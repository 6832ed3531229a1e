//! Crawler module for page fetching and scrape coordination
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing, link extraction and markdown conversion
//! - Single-page and batch scrape coordination

mod coordinator;
mod fetcher;
mod markdown;
mod parser;

pub use coordinator::{
    BatchOutcome, ErrorInfo, ScrapeFailure, ScrapeMetadata, ScrapeResult, ScrapeSuccess, Scraper,
};
pub use fetcher::{build_http_client, fetch_page, is_retryable_status, FetchedPage};
pub use markdown::html_to_markdown;
pub use parser::{parse_html, LinkSet, ParsedPage};

use crate::config::CrawlerConfig;
use crate::ScribeError;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// A fetched page with its markdown rendering and extracted metadata
#[derive(Debug, Clone)]
pub struct CrawledPage {
    /// The URL that was requested
    pub url: String,
    /// The URL after redirects
    pub final_url: String,
    pub status_code: u16,
    pub content_type: String,
    pub html: String,
    pub markdown: String,
    pub parsed: ParsedPage,
}

/// Returns true if a response body should be treated as HTML
fn is_html(content_type: &str, body: &str) -> bool {
    if content_type.is_empty() {
        let head = body.trim_start();
        return head.starts_with('<');
    }
    content_type.contains("html") || content_type.contains("xml")
}

/// Fetches a page and derives its markdown, links and metadata
///
/// Non-HTML bodies are used verbatim as the page markdown.
pub async fn crawl_page(
    client: &Client,
    url: &Url,
    config: &CrawlerConfig,
) -> Result<CrawledPage, ScribeError> {
    let fetched = fetch_page(client, url.as_str(), config).await?;
    let base_url = Url::parse(&fetched.final_url).unwrap_or_else(|_| url.clone());

    let (markdown, parsed) = if is_html(&fetched.content_type, &fetched.body) {
        (
            html_to_markdown(&fetched.body),
            parse_html(&fetched.body, &base_url),
        )
    } else {
        debug!(
            "Treating {} ({}) as plain text",
            url, fetched.content_type
        );
        (fetched.body.trim().to_string(), ParsedPage::default())
    };

    Ok(CrawledPage {
        url: url.to_string(),
        final_url: fetched.final_url,
        status_code: fetched.status_code,
        content_type: fetched.content_type,
        html: fetched.body,
        markdown,
        parsed,
    })
}
