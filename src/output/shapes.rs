//! JSON shapes produced from a crawled page
//!
//! Four shapes exist:
//! - **simple**: built directly from the page markdown (no LLM)
//! - **extracted**: the model's JSON reply, with a markdown preview appended
//! - **fallback**: the full extraction schema filled from the page itself,
//!   used whenever the model's reply is missing or unusable
//! - **raw**: markdown, links and page metadata

use crate::crawler::{CrawledPage, LinkSet};
use crate::extraction::{Extraction, Strategy};
use crate::output::{now_iso, OutputFormat};
use crate::url::netloc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

/// Characters of markdown kept in previews
const PREVIEW_CHARS: usize = 1000;

/// Characters of markdown kept in the fallback `main_content`
const FALLBACK_PREVIEW_CHARS: usize = 500;

/// Links kept in the simple shape
const SIMPLE_LINK_LIMIT: usize = 20;

/// Links kept per list in the fallback shape
const FALLBACK_LINK_LIMIT: usize = 10;

/// Splits `s` after at most `max` characters
///
/// Returns the head and whether anything was cut off.
pub fn truncate_chars(s: &str, max: usize) -> (&str, bool) {
    match s.char_indices().nth(max) {
        Some((idx, _)) => (&s[..idx], true),
        None => (s, false),
    }
}

/// First `max` characters of `s`, followed by `...` if it was longer
pub fn preview(s: &str, max: usize) -> String {
    match truncate_chars(s, max) {
        (head, true) => format!("{}...", head),
        (head, false) => head.to_string(),
    }
}

/// Whitespace-separated word count
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Removes a surrounding markdown code fence from a model reply
///
/// Handles a leading ```` ```json ```` (any case) or bare ```` ``` ```` and an
/// optional closing fence. Text without a leading fence is only trimmed.
pub fn strip_json_fence(content: &str) -> &str {
    let trimmed = content.trim();

    let body = if trimmed
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("```json"))
    {
        &trimmed[7..]
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}

#[derive(Debug, Clone, Serialize)]
pub struct SimpleMetadata {
    pub url: String,
    pub title: String,
    pub description: String,
    pub language: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimpleContent {
    pub main_content: String,
    pub full_content: String,
}

/// JSON shape for the simple strategy
#[derive(Debug, Clone, Serialize)]
pub struct SimpleDocument {
    pub metadata: SimpleMetadata,
    pub content: SimpleContent,
    pub links: Vec<String>,
    pub scraping_method: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FallbackMetadata {
    pub url: String,
    pub title: String,
    pub description: String,
    pub language: String,
    pub last_updated: Option<String>,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FallbackContent {
    pub main_heading: String,
    pub sub_headings: Vec<String>,
    pub main_content: String,
    pub key_points: Vec<String>,
    pub call_to_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Navigation {
    pub menu_items: Vec<String>,
    pub breadcrumbs: Vec<String>,
    pub footer_links: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Media {
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessInfo {
    pub company_name: String,
    pub contact_info: ContactInfo,
    pub social_media: Vec<String>,
    pub pricing: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Technical {
    pub technologies: Vec<String>,
    pub forms: Vec<String>,
    pub external_links: Vec<String>,
}

/// The extraction schema filled without the model
#[derive(Debug, Clone, Serialize)]
pub struct FallbackDocument {
    pub metadata: FallbackMetadata,
    pub content: FallbackContent,
    pub navigation: Navigation,
    pub media: Media,
    pub business_info: BusinessInfo,
    pub technical: Technical,
    pub raw_markdown: String,
    pub extraction_method: &'static str,
}

/// The JSON written for the `json` output format
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonDocument {
    Simple(Box<SimpleDocument>),
    Extracted(Map<String, Value>),
    Fallback(Box<FallbackDocument>),
}

impl JsonDocument {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Simple(_) => "simple",
            Self::Extracted(_) => "extracted",
            Self::Fallback(_) => "fallback",
        }
    }
}

/// Page metadata included in the raw shape
#[derive(Debug, Clone, Serialize)]
pub struct PageMetadata {
    pub url: String,
    pub final_url: String,
    pub status_code: u16,
    pub content_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub html_length: usize,
}

/// JSON shape for the `raw` output format
#[derive(Debug, Clone, Serialize)]
pub struct RawData {
    pub markdown: String,
    pub links: LinkSet,
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct BasicInfo {
    pub url: String,
    pub strategy: Strategy,
    pub content_length: usize,
    pub links_count: usize,
    pub scraped_at: String,
}

/// Everything produced for one page, keyed by output format
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedData {
    pub basic_info: BasicInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<JsonDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawData>,
}

/// Builds the simple shape
///
/// `source_url` is recorded as given; `url` supplies the domain.
pub fn simple_document(page: &CrawledPage, source_url: &str, url: &Url) -> SimpleDocument {
    SimpleDocument {
        metadata: SimpleMetadata {
            url: source_url.to_string(),
            title: format!("Content from {}", netloc(url)),
            description: "Basic scraping result".to_string(),
            language: "unknown".to_string(),
            word_count: word_count(&page.markdown),
        },
        content: SimpleContent {
            main_content: preview(&page.markdown, PREVIEW_CHARS),
            full_content: page.markdown.clone(),
        },
        links: page
            .parsed
            .links
            .iter()
            .take(SIMPLE_LINK_LIMIT)
            .cloned()
            .collect(),
        scraping_method: "simple",
    }
}

/// Builds the fallback shape
///
/// Footer and external links both take the first links found on the page.
pub fn fallback_document(page: &CrawledPage, source_url: &str, url: &Url) -> FallbackDocument {
    let domain = netloc(url);
    let first_links: Vec<String> = page
        .parsed
        .links
        .iter()
        .take(FALLBACK_LINK_LIMIT)
        .cloned()
        .collect();

    FallbackDocument {
        metadata: FallbackMetadata {
            url: source_url.to_string(),
            title: "Extracted from markdown".to_string(),
            description: "Content extracted using fallback method".to_string(),
            language: "unknown".to_string(),
            last_updated: None,
            word_count: word_count(&page.markdown),
        },
        content: FallbackContent {
            main_heading: format!("Content from {}", domain),
            sub_headings: Vec::new(),
            main_content: preview(&page.markdown, FALLBACK_PREVIEW_CHARS),
            key_points: Vec::new(),
            call_to_actions: Vec::new(),
        },
        navigation: Navigation {
            menu_items: Vec::new(),
            breadcrumbs: Vec::new(),
            footer_links: first_links.clone(),
        },
        media: Media::default(),
        business_info: BusinessInfo {
            company_name: domain,
            contact_info: ContactInfo::default(),
            social_media: Vec::new(),
            pricing: None,
        },
        technical: Technical {
            technologies: Vec::new(),
            forms: Vec::new(),
            external_links: first_links,
        },
        raw_markdown: page.markdown.clone(),
        extraction_method: "fallback",
    }
}

/// Turns the model's reply into the JSON document for a page
///
/// A fenced or bare JSON object is accepted and gets a `raw_markdown`
/// preview added. Missing content, invalid JSON and non-object JSON all
/// produce the fallback shape.
pub fn parse_extracted_content(
    content: Option<&str>,
    page: &CrawledPage,
    source_url: &str,
    url: &Url,
) -> JsonDocument {
    let Some(content) = content.map(strip_json_fence).filter(|c| !c.is_empty()) else {
        return JsonDocument::Fallback(Box::new(fallback_document(page, source_url, url)));
    };

    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(mut map)) => {
            map.insert(
                "raw_markdown".to_string(),
                Value::String(preview(&page.markdown, PREVIEW_CHARS)),
            );
            JsonDocument::Extracted(map)
        }
        Ok(other) => {
            warn!(
                "Extracted content for {} is JSON but not an object ({}), using fallback structure",
                url,
                json_type_name(&other)
            );
            JsonDocument::Fallback(Box::new(fallback_document(page, source_url, url)))
        }
        Err(e) => {
            warn!(
                "Could not parse extracted content for {} as JSON: {}; using fallback structure",
                url, e
            );
            JsonDocument::Fallback(Box::new(fallback_document(page, source_url, url)))
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Builds the raw shape
pub fn raw_data(page: &CrawledPage, url: &Url) -> RawData {
    RawData {
        markdown: page.markdown.clone(),
        links: page.parsed.split_links(url),
        metadata: PageMetadata {
            url: page.url.clone(),
            final_url: page.final_url.clone(),
            status_code: page.status_code,
            content_type: page.content_type.clone(),
            title: page.parsed.title.clone(),
            description: page.parsed.description.clone(),
            language: page.parsed.language.clone(),
            html_length: page.html.len(),
        },
    }
}

/// Builds the processed data for every requested format
pub fn process_results(
    page: &CrawledPage,
    source_url: &str,
    url: &Url,
    strategy: Strategy,
    formats: &[OutputFormat],
    extraction: &Extraction,
) -> ProcessedData {
    let wants = |format: OutputFormat| formats.contains(&format);

    let json = wants(OutputFormat::Json).then(|| match strategy {
        Strategy::Simple => JsonDocument::Simple(Box::new(simple_document(page, source_url, url))),
        Strategy::Llm | Strategy::Comprehensive => {
            parse_extracted_content(extraction.content.as_deref(), page, source_url, url)
        }
    });

    ProcessedData {
        basic_info: BasicInfo {
            url: source_url.to_string(),
            strategy,
            content_length: page.markdown.chars().count(),
            links_count: page.parsed.links.len(),
            scraped_at: now_iso(),
        },
        markdown: wants(OutputFormat::Markdown).then(|| page.markdown.clone()),
        html: wants(OutputFormat::Html).then(|| page.html.clone()),
        json,
        raw: wants(OutputFormat::Raw).then(|| raw_data(page, url)),
    }
}
