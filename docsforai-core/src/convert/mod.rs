//! Text-format converters used by the adapters.
//!
//! - [`HtmlConverter`]: black-box HTML → Markdown service (backed by `html2md`)
//! - [`notebook`]: Jupyter notebook JSON → Markdown
//! - [`markup`]: lightweight reStructuredText / AsciiDoc → Markdown
//! - [`comments`]: documentation comment extraction from source files
//! - [`xml`]: a small owned XML tree for tool index files

pub mod comments;
pub mod markup;
pub mod notebook;
pub mod xml;

use std::sync::LazyLock;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use regex::Regex;

pub use crate::error::ConversionFailure;

/// Converts one HTML document to Markdown.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait HtmlConverter: Send + Sync {
    fn convert(&self, html: &str) -> Result<String, ConversionFailure>;
}

/// [`HtmlConverter`] built on `html2md`, with scripts and styles removed first.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>|<!--.*?-->").unwrap()
});
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

impl HtmlConverter for Html2MdConverter {
    fn convert(&self, html: &str) -> Result<String, ConversionFailure> {
        let cleaned = NOISE.replace_all(html, "");
        let markdown = html2md::parse_html(&cleaned);
        let markdown = markdown.trim();
        if markdown.is_empty() {
            return Err(ConversionFailure("no text content".into()));
        }
        Ok(markdown.to_string())
    }
}

/// Title from the first `<title>` element, if any.
pub fn html_title(html: &str) -> Option<String> {
    TITLE
        .captures(html)
        .map(|c| c[1].split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.is_empty())
}

/// First Markdown `# ` heading, used as a record title.
pub fn first_heading(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .find_map(|l| l.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
