//! Javadoc: `/** */` comments per Java source, `javadoc` HTML capture.

use std::path::Path;

use tracing::info;

use super::support::{
    capture_html, find_files, missing, native_pass, rel_path, run_build_step, ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::convert::comments::{block_doc_comments, doc_comments_to_markdown};
use crate::convert::ConversionFailure;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::ParseOutcome;
use crate::tool::ToolInvocation;

const OUTPUT_DIR: &str = "javadoc_output";

pub struct JavadocAdapter;

fn java_source(path: &Path, source: &str) -> Result<String, ConversionFailure> {
    let comments = block_doc_comments(source);
    if comments.is_empty() {
        return Err(ConversionFailure("no documentation comments".to_string()));
    }
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(doc_comments_to_markdown(&title, &comments, "java"))
}

impl Adapter for JavadocAdapter {
    fn framework(&self) -> Framework {
        Framework::Javadoc
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::Javadoc;
        let sources = find_files(docs_path, &["java"], &[OUTPUT_DIR, "target", "build"]);
        if sources.is_empty() {
            return Err(missing(fw, "*.java sources"));
        }
        info!(sources = sources.len(), "Parsing Javadoc documentation");

        let mut outcome = native_pass(fw, docs_path, &sources, ctx, java_source);

        let output = ScopedPath::claim(docs_path.join(OUTPUT_DIR));
        let build = ToolInvocation::new("javadoc", docs_path)
            .args(["-d", OUTPUT_DIR, "-quiet"])
            .args(sources.iter().map(|p| rel_path(docs_path, p)));
        run_build_step(fw, ctx, build, "javadoc_args")?;

        outcome.extend(capture_html(
            fw,
            docs_path,
            output.path(),
            ctx,
            &["resources", "script-dir", "legal"],
        ));
        Ok(outcome)
    }
}
