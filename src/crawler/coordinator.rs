//! Scrape coordinator - single-page and batch orchestration
//!
//! This module ties the pieces together for each URL:
//! - Validating the URL and strategy
//! - Fetching the page and converting it to markdown
//! - Running LLM extraction when the strategy asks for it
//! - Reshaping and writing the outputs
//!
//! Batches run sequentially with a fixed delay between URLs and finish by
//! writing a summary report.

use crate::config::Config;
use crate::crawler::{build_http_client, crawl_page};
use crate::extraction::{build_extraction_prompt, extract, Extraction, LlmClient, LlmError, Strategy};
use crate::output::{
    generate_summary_report, now_iso, process_results, save_outputs, write_summary, OutputFormat,
    ProcessedData, SummaryReport,
};
use crate::url::parse_target_url;
use crate::ScribeError;
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Metadata recorded for a successful scrape
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeMetadata {
    pub scraped_at: String,
    pub crawler_version: String,
    /// Model used for extraction, `"none"` for the simple strategy
    pub model_used: String,
    pub raw_content_length: usize,
    pub links_found: usize,
    pub chunks_processed: usize,
}

/// A successful scrape
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeSuccess {
    pub success: bool,
    pub url: String,
    pub strategy: Strategy,
    pub output_formats: Vec<OutputFormat>,
    pub data: ProcessedData,
    pub saved_files: BTreeMap<OutputFormat, PathBuf>,
    pub metadata: ScrapeMetadata,
}

/// Error details for a failed scrape
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub timestamp: String,
}

/// A failed scrape
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeFailure {
    pub success: bool,
    pub url: String,
    pub error: ErrorInfo,
}

/// Outcome of scraping one URL
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScrapeResult {
    Success(Box<ScrapeSuccess>),
    Failure(ScrapeFailure),
}

impl ScrapeResult {
    /// Builds a failure record for `url`
    pub fn failure(url: &str, err: &ScribeError) -> Self {
        Self::Failure(ScrapeFailure {
            success: false,
            url: url.to_string(),
            error: ErrorInfo {
                message: err.to_string(),
                kind: err.kind().to_string(),
                url: url.to_string(),
                timestamp: now_iso(),
            },
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Success(s) => &s.url,
            Self::Failure(f) => &f.url,
        }
    }

    /// Error message for failures, `None` for successes
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(&f.error.message),
        }
    }
}

/// Results of a batch run
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<ScrapeResult>,
    pub summary: SummaryReport,
    pub summary_path: PathBuf,
}

/// Main scraper structure
pub struct Scraper {
    config: Config,
    client: Client,
    llm: Option<LlmClient>,
    output_dir: PathBuf,
    config_hash: Option<String>,
}

impl Scraper {
    /// Creates a new scraper and its output directory
    ///
    /// The LLM client is only built when an API key is configured; LLM
    /// strategies fail per URL without one.
    pub fn new(config: Config) -> Result<Self, ScribeError> {
        let client = build_http_client(&config.crawler)?;

        let llm = match LlmClient::new(&config.llm) {
            Ok(llm) => Some(llm),
            Err(LlmError::MissingApiKey) => {
                warn!("No API key configured; only the simple strategy is available");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let output_dir = PathBuf::from(&config.output.output_dir);
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            config,
            client,
            llm,
            output_dir,
            config_hash: None,
        })
    }

    /// Records the config file hash in batch summaries
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scrapes one URL
    ///
    /// Never fails: errors are captured in [`ScrapeResult::Failure`]. An empty
    /// `formats` slice selects every format.
    pub async fn scrape_website(
        &self,
        url: &str,
        strategy: Strategy,
        formats: &[OutputFormat],
        custom_prompt: Option<&str>,
    ) -> ScrapeResult {
        let formats = if formats.is_empty() {
            warn!("No output formats requested, defaulting to all formats");
            OutputFormat::ALL.to_vec()
        } else {
            formats.to_vec()
        };

        info!("Starting {} scrape of: {}", strategy, url);

        match self.try_scrape(url, strategy, &formats, custom_prompt).await {
            Ok(success) => ScrapeResult::Success(Box::new(success)),
            Err(e) => {
                error!("Error scraping {}: {}", url, e);
                ScrapeResult::failure(url, &e)
            }
        }
    }

    async fn try_scrape(
        &self,
        url: &str,
        strategy: Strategy,
        formats: &[OutputFormat],
        custom_prompt: Option<&str>,
    ) -> Result<ScrapeSuccess, ScribeError> {
        let target = parse_target_url(url)?;

        let llm = if strategy.uses_llm() {
            Some(self.llm.as_ref().ok_or_else(|| ScribeError::MissingApiKey {
                strategy: strategy.to_string(),
            })?)
        } else {
            None
        };

        let page = crawl_page(&self.client, &target, &self.config.crawler).await?;
        info!(
            "Fetched {}: {} characters of markdown, {} links",
            page.final_url,
            page.markdown.chars().count(),
            page.parsed.links.len()
        );

        let extraction = match llm {
            Some(llm) => {
                let prompt = match custom_prompt {
                    Some(prompt) => prompt.to_string(),
                    None => build_extraction_prompt(&target),
                };
                extract(llm, &page, strategy, &prompt, self.config.llm.max_input_chars).await
            }
            None => Extraction::default(),
        };

        let data = process_results(&page, url, &target, strategy, formats, &extraction);
        let saved_files = save_outputs(&data, &target, formats, &self.output_dir);

        let metadata = ScrapeMetadata {
            scraped_at: now_iso(),
            crawler_version: format!("page-scribe/{}", env!("CARGO_PKG_VERSION")),
            model_used: llm
                .map(|l| l.model().to_string())
                .unwrap_or_else(|| "none".to_string()),
            raw_content_length: data.basic_info.content_length,
            links_found: data.basic_info.links_count,
            chunks_processed: extraction.chunks_processed,
        };

        Ok(ScrapeSuccess {
            success: true,
            url: url.to_string(),
            strategy,
            output_formats: formats.to_vec(),
            data,
            saved_files,
            metadata,
        })
    }

    /// Scrapes several URLs one after another
    ///
    /// Waits `delay` between URLs (not after the last one), then writes the
    /// summary report to the output directory.
    pub async fn scrape_multiple_websites(
        &self,
        urls: &[String],
        strategy: Strategy,
        formats: &[OutputFormat],
        custom_prompt: Option<&str>,
        delay: Duration,
    ) -> Result<BatchOutcome, ScribeError> {
        info!(
            "Starting batch scrape of {} websites (strategy: {}, formats: {})",
            urls.len(),
            strategy,
            formats
                .iter()
                .map(OutputFormat::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut results = Vec::with_capacity(urls.len());

        for (i, url) in urls.iter().enumerate() {
            info!("Progress: {}/{} - {}", i + 1, urls.len(), url);

            results.push(
                self.scrape_website(url, strategy, formats, custom_prompt)
                    .await,
            );

            if i + 1 < urls.len() && !delay.is_zero() {
                info!("Waiting {:?} before next request", delay);
                tokio::time::sleep(delay).await;
            }
        }

        let summary = generate_summary_report(&results, self.config_hash.as_deref());
        let summary_path = write_summary(&summary, &self.output_dir)?;

        info!(
            "Batch scraping completed: {}/{} succeeded; summary saved to {}",
            summary.summary.successful,
            summary.summary.total_websites,
            summary_path.display()
        );

        Ok(BatchOutcome {
            results,
            summary,
            summary_path,
        })
    }
}
