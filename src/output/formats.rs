//! Output format selection

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// A kind of file written for each scraped page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Markdown,
    Json,
    Html,
    Raw,
}

impl OutputFormat {
    /// All formats, in the order files are written
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Markdown,
        OutputFormat::Json,
        OutputFormat::Html,
        OutputFormat::Raw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Html => "html",
            Self::Raw => "raw",
        }
    }

    /// Suffix appended to `<domain>_<timestamp>` when writing this format
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Markdown => ".md",
            Self::Json => ".json",
            Self::Html => ".html",
            Self::Raw => "_raw.json",
        }
    }

    /// Looks up a format by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves requested format names to output formats
///
/// Unknown names are dropped and duplicates collapsed, keeping request order.
/// If nothing valid remains, every format is selected.
///
/// # Examples
///
/// ```
/// use page_scribe::output::{select_formats, OutputFormat};
///
/// assert_eq!(
///     select_formats(&["json", "pdf", "markdown"]),
///     vec![OutputFormat::Json, OutputFormat::Markdown]
/// );
/// assert_eq!(select_formats(&["pdf"]), OutputFormat::ALL.to_vec());
/// ```
pub fn select_formats<S: AsRef<str>>(names: &[S]) -> Vec<OutputFormat> {
    let mut selected = Vec::new();

    for name in names {
        match OutputFormat::from_name(name.as_ref()) {
            Some(format) if !selected.contains(&format) => selected.push(format),
            Some(_) => {}
            None => warn!("Ignoring unknown output format '{}'", name.as_ref()),
        }
    }

    if selected.is_empty() {
        warn!("No valid output formats provided, defaulting to all formats");
        return OutputFormat::ALL.to_vec();
    }

    selected
}
