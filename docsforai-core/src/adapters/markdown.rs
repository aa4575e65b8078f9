//! Plain Markdown trees with no generator.

use std::path::Path;

use tracing::info;

use super::support::{as_is, find_files, missing, native_pass};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::ParseOutcome;

pub struct MarkdownAdapter;

impl Adapter for MarkdownAdapter {
    fn framework(&self) -> Framework {
        Framework::Markdown
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let files = find_files(docs_path, &["md", "markdown"], &[]);
        if files.is_empty() {
            return Err(missing(Framework::Markdown, "*.md files"));
        }
        info!(files = files.len(), "Parsing Markdown documentation");
        Ok(native_pass(Framework::Markdown, docs_path, &files, ctx, as_is))
    }
}
