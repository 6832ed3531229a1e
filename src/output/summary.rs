//! Batch summary reports

use crate::crawler::ScrapeResult;
use crate::output::writer::file_timestamp;
use crate::output::{now_iso, OutputResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Headline counts for a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    pub total_websites: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage with one decimal, e.g. `"66.7%"`; `"0%"` for an empty batch
    pub success_rate: String,
}

/// Summary written after a batch run
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub summary: SummaryCounts,
    pub successful_urls: Vec<String>,
    pub failed_urls: Vec<String>,
    pub errors: Vec<String>,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
}

/// Formats a success rate as a percentage string
///
/// # Examples
///
/// ```
/// use page_scribe::output::format_success_rate;
///
/// assert_eq!(format_success_rate(2, 3), "66.7%");
/// assert_eq!(format_success_rate(0, 0), "0%");
/// ```
pub fn format_success_rate(successful: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", successful as f64 / total as f64 * 100.0)
}

/// Builds a summary report from batch results
pub fn generate_summary_report(results: &[ScrapeResult], config_hash: Option<&str>) -> SummaryReport {
    let (successful, failed): (Vec<&ScrapeResult>, Vec<&ScrapeResult>) =
        results.iter().partition(|r| r.is_success());

    SummaryReport {
        summary: SummaryCounts {
            total_websites: results.len(),
            successful: successful.len(),
            failed: failed.len(),
            success_rate: format_success_rate(successful.len(), results.len()),
        },
        successful_urls: successful.iter().map(|r| r.url().to_string()).collect(),
        failed_urls: failed.iter().map(|r| r.url().to_string()).collect(),
        errors: failed
            .iter()
            .map(|r| r.error_message().unwrap_or("Unknown error").to_string())
            .collect(),
        generated_at: now_iso(),
        config_hash: config_hash.map(str::to_string),
    }
}

/// Writes the report as `scraping_summary_<timestamp>.json` in `output_dir`
pub fn write_summary(report: &SummaryReport, output_dir: &Path) -> OutputResult<PathBuf> {
    let path = output_dir.join(format!("scraping_summary_{}.json", file_timestamp()));
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    Ok(path)
}

/// Prints a report to stdout
pub fn print_summary(report: &SummaryReport) {
    println!("=== Batch Scraping Summary ===\n");
    println!(
        "  Successful: {}/{}",
        report.summary.successful, report.summary.total_websites
    );
    println!("  Failed: {}", report.summary.failed);
    println!("  Success rate: {}", report.summary.success_rate);

    if !report.failed_urls.is_empty() {
        println!("\nFailed URLs:");
        for (url, error) in report.failed_urls.iter().zip(&report.errors) {
            println!("  - {}: {}", url, error);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScribeError;
    use tempfile::TempDir;

    fn failure(url: &str) -> ScrapeResult {
        ScrapeResult::failure(
            url,
            &ScribeError::HttpStatus {
                url: url.to_string(),
                status: 404,
            },
        )
    }

    #[test]
    fn test_success_rate_rounding() {
        assert_eq!(format_success_rate(1, 1), "100.0%");
        assert_eq!(format_success_rate(1, 3), "33.3%");
        assert_eq!(format_success_rate(0, 4), "0.0%");
    }

    #[test]
    fn test_empty_batch_report() {
        let report = generate_summary_report(&[], None);
        assert_eq!(report.summary.total_websites, 0);
        assert_eq!(report.summary.success_rate, "0%");
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_failures_are_reported_with_urls() {
        let results = vec![failure("https://a.example/"), failure("https://b.example/")];
        let report = generate_summary_report(&results, Some("abc123"));

        assert_eq!(report.summary.failed, 2);
        assert_eq!(report.summary.successful, 0);
        assert_eq!(report.failed_urls, vec!["https://a.example/", "https://b.example/"]);
        assert_eq!(report.errors[0], "HTTP status 404 for https://a.example/");
        assert_eq!(report.config_hash.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_write_summary() {
        let dir = TempDir::new().unwrap();
        let report = generate_summary_report(&[failure("https://a.example/")], None);

        let path = write_summary(&report, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("scraping_summary_"));
        assert!(name.ends_with(".json"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["summary"]["total_websites"], 1);
        assert_eq!(written["summary"]["success_rate"], "0.0%");
        assert!(written.get("config_hash").is_none());
    }
}
