//! Raw documents and visible-text extraction.
//!
//! A raw document is either an HTML page or a plain-text dump of one (one
//! element per line, optionally labelled `H2:`, `P:` and so on). Either way
//! [`extract_text`] produces plain text with one logical line per element,
//! which is what the splitter and the line-level cleaner work on.

use crate::error::{Result, TaggerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// Elements whose text becomes one output line each.
const BLOCK_SELECTOR: &str = "title, h1, h2, h3, h4, h5, h6, p, li, td, dt, dd, blockquote";

static HTML_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(?:!doctype|html|head|body|div|p|h[1-6]|li|ul|span|a|table)\b")
        .expect("html marker pattern is valid")
});

/// A document as fetched or read, before any processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// Where the document came from (host name, URL or file path).
    pub source: String,
    /// Opaque markup or text.
    pub content: String,
}

impl RawDocument {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }

    /// Read a document from disk. The source is the file name.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TaggerError::DocumentNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| TaggerError::io(path, e))?;

        let source = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        Ok(Self { source, content })
    }

    pub fn is_html(&self) -> bool {
        looks_like_html(&self.content)
    }

    /// Visible text of the document.
    pub fn text(&self) -> String {
        extract_text(&self.content)
    }
}

/// Heuristic check for HTML markup.
pub fn looks_like_html(content: &str) -> bool {
    HTML_MARKER.is_match(content)
}

/// Extract visible text, one element per line, with whitespace normalized.
pub fn extract_text(content: &str) -> String {
    if looks_like_html(content) {
        normalize_lines(&html_to_lines(content))
    } else {
        normalize_lines(content)
    }
}

fn html_to_lines(html: &str) -> String {
    let soup = scrape_core::Soup::parse(html);

    let blocks: Vec<String> = match soup.find_all(BLOCK_SELECTOR) {
        Ok(tags) => tags.into_iter().map(|tag| tag.text()).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "block selector rejected, falling back to body text");
            Vec::new()
        }
    };

    if blocks.iter().any(|b| !b.trim().is_empty()) {
        return blocks.join("\n");
    }

    soup.find_all("body")
        .map(|tags| {
            tags.into_iter()
                .map(|tag| tag.text())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Collapse whitespace inside each line and drop blank lines.
fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
