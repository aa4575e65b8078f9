//! AsciiDoc: light native conversion plus `asciidoctor` HTML capture.

use std::path::Path;

use tracing::info;

use super::support::{
    capture_html, find_files, missing, native_pass, rel_path, run_build_step, ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::convert::markup::asciidoc_to_markdown;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::ParseOutcome;
use crate::tool::ToolInvocation;

const EXTENSIONS: &[&str] = &["adoc", "asciidoc", "asc"];
const OUTPUT_DIR: &str = "asciidoctor_output";

pub struct AsciiDocAdapter;

impl Adapter for AsciiDocAdapter {
    fn framework(&self) -> Framework {
        Framework::AsciiDoc
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::AsciiDoc;
        let sources = find_files(docs_path, EXTENSIONS, &[OUTPUT_DIR]);
        if sources.is_empty() {
            return Err(missing(fw, "*.adoc sources"));
        }
        info!(sources = sources.len(), "Parsing AsciiDoc documentation");

        let mut outcome =
            native_pass(fw, docs_path, &sources, ctx, |_, source| asciidoc_to_markdown(source));

        let output = ScopedPath::claim(docs_path.join(OUTPUT_DIR));
        let build = ToolInvocation::new("asciidoctor", docs_path)
            .args(["-D", OUTPUT_DIR, "-R", "."])
            .args(sources.iter().map(|p| rel_path(docs_path, p)));
        run_build_step(fw, ctx, build, "asciidoctor_args")?;

        outcome.extend(capture_html(fw, docs_path, output.path(), ctx, &[]));
        Ok(outcome)
    }
}
