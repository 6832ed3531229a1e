//! Page-Scribe: website scraping into markdown, JSON and raw formats
//!
//! This crate fetches web pages, converts them to markdown, optionally asks an
//! OpenAI-compatible LLM endpoint to extract a structured JSON description of
//! each page, and writes the results to timestamped files.

pub mod config;
pub mod crawler;
pub mod extraction;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Page-Scribe operations
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("LLM error: {0}")]
    Llm(#[from] extraction::LlmError),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("OPENROUTER_API_KEY is not set; required for the {strategy} strategy")]
    MissingApiKey { strategy: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScribeError {
    /// Short name of the error variant, recorded in failure reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Http { .. } => "HttpError",
            Self::HttpStatus { .. } => "HttpStatusError",
            Self::Timeout { .. } => "TimeoutError",
            Self::UrlError(_) => "UrlError",
            Self::Reqwest(_) => "HttpClientError",
            Self::Llm(_) => "LlmError",
            Self::UnknownStrategy(_) => "ValueError",
            Self::MissingApiKey { .. } => "MissingApiKey",
            Self::Json(_) => "JsonError",
            Self::Output(_) => "OutputError",
            Self::Io(_) => "IoError",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Page-Scribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use extraction::Strategy;
pub use output::OutputFormat;
pub use crawler::{BatchOutcome, ScrapeResult, Scraper};
pub use crate::url::{extract_domain, netloc, parse_target_url};
