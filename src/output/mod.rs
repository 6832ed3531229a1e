//! Output module for scraped pages and batch summaries
//!
//! This module handles:
//! - Selecting output formats
//! - Reshaping crawled pages into the fixed JSON shapes
//! - Writing per-page files with timestamped names
//! - Generating batch summary reports

mod formats;
mod shapes;
mod summary;
mod writer;

pub use formats::{select_formats, OutputFormat};
pub use shapes::{
    fallback_document, parse_extracted_content, preview, process_results, raw_data,
    simple_document, strip_json_fence, truncate_chars, word_count, BasicInfo, FallbackDocument,
    JsonDocument, PageMetadata, ProcessedData, RawData, SimpleDocument,
};
pub use summary::{
    format_success_rate, generate_summary_report, print_summary, write_summary, SummaryCounts,
    SummaryReport,
};
pub use writer::{file_timestamp, output_path, sanitize_filename, save_outputs, save_outputs_at};

use chrono::{Local, SecondsFormat};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Current local time as an RFC 3339 string
pub fn now_iso() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
