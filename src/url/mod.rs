//! URL handling module for Page-Scribe
//!
//! This module validates target URLs and derives the domain strings used in
//! prompts, reports and output filenames.

mod domain;

pub use domain::{extract_domain, is_external, netloc};

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses and validates a URL given on the command line or in a batch list
///
/// The URL must parse, use the `http` or `https` scheme, and have a host.
///
/// # Examples
///
/// ```
/// use page_scribe::url::parse_target_url;
///
/// assert!(parse_target_url("https://example.com/").is_ok());
/// assert!(parse_target_url("ftp://example.com/").is_err());
/// assert!(parse_target_url("example.com").is_err());
/// ```
pub fn parse_target_url(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_urls() {
        assert!(parse_target_url("https://example.com").is_ok());
        assert!(parse_target_url("http://localhost:3000/path?q=1").is_ok());
        assert!(parse_target_url("  https://example.com/  ").is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_scheme() {
        assert!(matches!(
            parse_target_url("ftp://example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            parse_target_url("mailto:someone@example.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(matches!(
            parse_target_url("example.com/page"),
            Err(UrlError::Parse(_))
        ));
    }
}
