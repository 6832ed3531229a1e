//! LLM-based content extraction
//!
//! This module contains:
//! - Scraping strategies and their parsing
//! - The default extraction prompt
//! - The chat-completions client
//! - Building the page context sent alongside the prompt

mod llm;
mod prompt;

pub use llm::{LlmClient, LlmError};
pub use prompt::build_extraction_prompt;

use crate::crawler::CrawledPage;
use crate::output::truncate_chars;
use crate::ScribeError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Links listed in the comprehensive page context
const CONTEXT_LINK_LIMIT: usize = 50;

/// How a page is processed after fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Markdown conversion only, no LLM call
    Simple,
    /// LLM extraction over the page markdown
    Llm,
    /// LLM extraction over the page markdown plus title, description and links
    Comprehensive,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Simple, Strategy::Llm, Strategy::Comprehensive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Llm => "llm",
            Self::Comprehensive => "comprehensive",
        }
    }

    /// Returns true if this strategy calls the LLM endpoint
    pub fn uses_llm(&self) -> bool {
        !matches!(self, Self::Simple)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| ScribeError::UnknownStrategy(s.to_string()))
    }
}

/// Result of running extraction on one page
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Raw model reply, if the call succeeded
    pub content: Option<String>,
    /// Number of content chunks sent to the model
    pub chunks_processed: usize,
}

/// Builds the user message sent with the extraction prompt
///
/// Page markdown is cut to `max_chars` characters. The comprehensive strategy
/// also lists the page title, description and up to 50 links.
pub fn build_page_context(page: &CrawledPage, strategy: Strategy, max_chars: usize) -> String {
    let mut context = String::new();

    if strategy == Strategy::Comprehensive {
        context.push_str(&format!("URL: {}\n", page.final_url));
        if let Some(title) = &page.parsed.title {
            context.push_str(&format!("Title: {}\n", title));
        }
        if let Some(description) = &page.parsed.description {
            context.push_str(&format!("Description: {}\n", description));
        }
        if !page.parsed.links.is_empty() {
            context.push_str("Links:\n");
            for link in page.parsed.links.iter().take(CONTEXT_LINK_LIMIT) {
                context.push_str(&format!("- {}\n", link));
            }
        }
        context.push('\n');
    }

    let (markdown, truncated) = truncate_chars(&page.markdown, max_chars);
    context.push_str("Page content (markdown):\n\n");
    context.push_str(markdown);
    if truncated {
        context.push_str("\n\n[content truncated]");
    }

    context
}

/// Runs LLM extraction for a page
///
/// Endpoint failures are logged and yield an [`Extraction`] without content;
/// the caller falls back to the structure built from the page itself.
pub async fn extract(
    client: &LlmClient,
    page: &CrawledPage,
    strategy: Strategy,
    prompt: &str,
    max_chars: usize,
) -> Extraction {
    let context = build_page_context(page, strategy, max_chars);

    match client.complete(prompt, &context).await {
        Ok(content) => {
            info!(
                "Extracted {} characters with {}",
                content.len(),
                client.model()
            );
            Extraction {
                content: Some(content),
                chunks_processed: 1,
            }
        }
        Err(e) => {
            warn!("LLM extraction failed for {}: {}", page.url, e);
            Extraction::default()
        }
    }
}
