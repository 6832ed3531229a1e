//! Writing processed page data to disk
//!
//! Files are named `<domain>_<timestamp><suffix>` inside the output directory,
//! where the domain has been sanitized for use in a filename.

use crate::output::shapes::ProcessedData;
use crate::output::{OutputFormat, OutputResult};
use crate::url::netloc;
use chrono::Local;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use url::Url;

/// Replaces every character that is not a word character, `-` or `.` with `_`
///
/// # Examples
///
/// ```
/// use page_scribe::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename("localhost:8080"), "localhost_8080");
/// assert_eq!(sanitize_filename("../etc/passwd"), ".._etc_passwd");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Local-time timestamp used in output filenames (`%Y%m%d_%H%M%S`)
pub fn file_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the file written for `format`
pub fn output_path(output_dir: &Path, domain: &str, timestamp: &str, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}_{}{}", domain, timestamp, format.file_suffix()))
}

/// Saves the processed data for every requested format
///
/// Returns the files written, keyed by format. A write failure is logged and
/// stops further writes; files written before it are still returned.
pub fn save_outputs(
    data: &ProcessedData,
    url: &Url,
    formats: &[OutputFormat],
    output_dir: &Path,
) -> BTreeMap<OutputFormat, PathBuf> {
    save_outputs_at(data, url, formats, output_dir, &file_timestamp())
}

/// [`save_outputs`] with an explicit timestamp
pub fn save_outputs_at(
    data: &ProcessedData,
    url: &Url,
    formats: &[OutputFormat],
    output_dir: &Path,
    timestamp: &str,
) -> BTreeMap<OutputFormat, PathBuf> {
    let domain = sanitize_filename(&netloc(url));
    let mut saved = BTreeMap::new();

    for format in OutputFormat::ALL.into_iter().filter(|f| formats.contains(f)) {
        let path = output_path(output_dir, &domain, timestamp, format);

        match write_format(data, format, &path) {
            Ok(true) => {
                info!("{} saved to: {}", format, path.display());
                saved.insert(format, path);
            }
            Ok(false) => {}
            Err(e) => {
                error!("Error saving {} output to {}: {}", format, path.display(), e);
                break;
            }
        }
    }

    saved
}

/// Writes one format; returns false if the data has nothing for it
fn write_format(data: &ProcessedData, format: OutputFormat, path: &Path) -> OutputResult<bool> {
    let contents = match format {
        OutputFormat::Markdown => data.markdown.clone(),
        OutputFormat::Html => data.html.clone(),
        OutputFormat::Json => data
            .json
            .as_ref()
            .map(serde_json::to_string_pretty)
            .transpose()?,
        OutputFormat::Raw => data
            .raw
            .as_ref()
            .map(serde_json::to_string_pretty)
            .transpose()?,
    };

    match contents {
        Some(contents) => {
            fs::write(path, contents)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
