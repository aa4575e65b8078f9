//! Fallback for repositories with a README and little else.

use std::path::Path;

use tracing::info;

use super::support::{as_is, find_files, missing, native_pass};
use super::{Adapter, ParseContext};
use crate::convert::markup::rst_to_markdown;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::ParseOutcome;

pub struct CommonAdapter;

impl Adapter for CommonAdapter {
    fn framework(&self) -> Framework {
        Framework::Common
    }

    /// Markdown and reStructuredText keep their own `doc_type`; plain text is
    /// only read when neither exists.
    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        info!(path = %docs_path.display(), "Parsing plain documentation files");
        let markdown = find_files(docs_path, &["md", "markdown"], &[]);
        let rst = find_files(docs_path, &["rst"], &["_build"]);

        let mut outcome = native_pass(Framework::Markdown, docs_path, &markdown, ctx, as_is);
        outcome.extend(native_pass(
            Framework::RestructuredText,
            docs_path,
            &rst,
            ctx,
            |_, source| rst_to_markdown(source),
        ));

        if markdown.is_empty() && rst.is_empty() {
            let text = find_files(docs_path, &["txt"], &[]);
            if text.is_empty() {
                return Err(missing(Framework::Common, "*.md, *.rst or *.txt files"));
            }
            outcome.extend(native_pass(Framework::Common, docs_path, &text, ctx, as_is));
        }
        Ok(outcome)
    }
}
