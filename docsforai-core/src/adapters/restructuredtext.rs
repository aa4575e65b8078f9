//! Standalone reStructuredText trees, converted without Sphinx.

use std::path::Path;

use tracing::info;

use super::support::{find_files, missing, native_pass};
use super::{Adapter, ParseContext};
use crate::convert::markup::rst_to_markdown;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::ParseOutcome;

pub struct RestructuredTextAdapter;

impl Adapter for RestructuredTextAdapter {
    fn framework(&self) -> Framework {
        Framework::RestructuredText
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::RestructuredText;
        let files = find_files(docs_path, &["rst"], &["_build"]);
        if files.is_empty() {
            return Err(missing(fw, "*.rst files"));
        }
        info!(files = files.len(), "Parsing reStructuredText documentation");
        Ok(native_pass(fw, docs_path, &files, ctx, |_, source| rst_to_markdown(source)))
    }
}
