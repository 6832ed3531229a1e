//! HTML to markdown conversion

use htmd::HtmlToMarkdown;
use scraper::Html;
use tracing::warn;

/// Converts an HTML document to markdown
///
/// Script, style and noscript content is dropped. If conversion fails the
/// document's visible text is returned instead.
pub fn html_to_markdown(html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript", "template"])
        .build();

    match converter.convert(html) {
        Ok(markdown) => markdown.trim().to_string(),
        Err(e) => {
            warn!("Markdown conversion failed, using plain text: {}", e);
            plain_text(html)
        }
    }
}

fn plain_text(html: &str) -> String {
    Html::parse_document(html)
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
