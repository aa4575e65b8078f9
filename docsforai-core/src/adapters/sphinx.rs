//! Sphinx: reStructuredText and Markdown sources, `sphinx-build -b html` capture.

use std::path::{Path, PathBuf};

use tracing::info;

use super::support::{
    capture_html, find_files, first_existing, missing, native_pass, run_build_step, ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::convert::markup::rst_to_markdown;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::ParseOutcome;
use crate::tool::ToolInvocation;

const CONF_CANDIDATES: &[&str] = &["conf.py", "source/conf.py", "docs/conf.py"];
const BUILD_DIR: &str = "_build";

pub struct SphinxAdapter;

/// The Sphinx source directory is wherever `conf.py` lives.
pub(crate) fn find_source_dir(docs_path: &Path) -> Option<PathBuf> {
    first_existing(docs_path, CONF_CANDIDATES).and_then(|conf| conf.parent().map(Path::to_path_buf))
}

impl Adapter for SphinxAdapter {
    fn framework(&self) -> Framework {
        Framework::Sphinx
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let source_dir = find_source_dir(docs_path)
            .ok_or_else(|| missing(Framework::Sphinx, CONF_CANDIDATES.join(" or ")))?;
        parse_source_dir(docs_path, &source_dir, ctx)
    }
}

/// Parses a Sphinx project rooted at `source_dir`; filenames stay relative to `docs_path`.
pub(crate) fn parse_source_dir(
    docs_path: &Path,
    source_dir: &Path,
    ctx: &ParseContext<'_>,
) -> Result<ParseOutcome, DocsError> {
    let fw = Framework::Sphinx;
    info!(source = %source_dir.display(), "Parsing Sphinx documentation");

    let files = find_files(source_dir, &["rst", "md"], &[BUILD_DIR, "_static", "_templates"]);
    let mut outcome = native_pass(fw, docs_path, &files, ctx, |path, source| {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("rst") => rst_to_markdown(source),
            _ => Ok(source.to_string()),
        }
    });

    let build_root = ScopedPath::claim(source_dir.join(BUILD_DIR));
    let html_dir = build_root.path().join("html");
    let build = ToolInvocation::new("sphinx-build", source_dir)
        .args(["-b", "html"])
        .path_arg(source_dir)
        .path_arg(&html_dir);
    run_build_step(fw, ctx, build, "sphinx_args")?;

    outcome.extend(capture_html(
        fw,
        docs_path,
        &html_dir,
        ctx,
        &["_static", "_sources", "_modules"],
    ));
    Ok(outcome)
}
