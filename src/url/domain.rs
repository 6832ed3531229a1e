use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_scribe::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the network location of a URL: the host plus any explicit port
///
/// Default ports are omitted, so `https://example.com:443/` yields
/// `example.com` while `http://127.0.0.1:8080/` yields `127.0.0.1:8080`.
/// Returns an empty string for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_scribe::url::netloc;
///
/// let url = Url::parse("http://localhost:3000/docs").unwrap();
/// assert_eq!(netloc(&url), "localhost:3000");
/// ```
pub fn netloc(url: &Url) -> String {
    match (extract_domain(url), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host,
        (None, _) => String::new(),
    }
}

/// Returns true if `link` points at a different host than `base`
///
/// Links that cannot be parsed are treated as internal.
pub fn is_external(link: &str, base: &Url) -> bool {
    match Url::parse(link) {
        Ok(parsed) => extract_domain(&parsed) != extract_domain(base),
        Err(_) => false,
    }
}
