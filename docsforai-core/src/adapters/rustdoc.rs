//! Rustdoc: `//!` module docs per source file, item pages from `cargo doc`.

use std::fs;
use std::path::Path;

use tracing::info;

use super::support::{find_files, native_pass, rel_path, require, run_build_step, ScopedPath};
use super::{Adapter, ParseContext};
use crate::convert::comments::rust_inner_docs;
use crate::convert::{html_title, ConversionFailure};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};
use crate::tool::ToolInvocation;

const TARGET_DIR: &str = ".docsforai-rustdoc";
const SKIPPED_PAGES: &[&str] = &["all", "help", "settings", "search", "search-index"];
const SKIPPED_DIRS: &[&str] = &["src", "static.files", "implementors", "trait.impl", "type.impl"];

pub struct RustdocAdapter;

fn module_docs(_: &Path, source: &str) -> Result<String, ConversionFailure> {
    rust_inner_docs(source).ok_or_else(|| ConversionFailure("no module documentation".to_string()))
}

/// Item kind from a rustdoc page name: `struct.Foo.html` is a struct, `index.html` a module.
fn item_kind(page: &Path) -> Option<&str> {
    let stem = page.file_stem()?.to_str()?;
    if stem == "index" {
        return Some("module");
    }
    if SKIPPED_PAGES.contains(&stem) {
        return None;
    }
    stem.split_once('.').map(|(kind, _)| kind)
}

fn capture_items(docs_path: &Path, doc_dir: &Path, ctx: &ParseContext<'_>) -> ParseOutcome {
    let mut out = ParseOutcome::default();
    for page in find_files(doc_dir, &["html"], SKIPPED_DIRS) {
        let Some(kind) = item_kind(&page) else {
            continue;
        };
        let rel = rel_path(docs_path, &page);
        let html = match fs::read(&page) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                out.skip(rel, format!("unreadable: {e}"));
                continue;
            }
        };
        match ctx.converter.convert(&html) {
            Ok(markdown) => {
                let mut record =
                    DocumentRecord::new(Framework::Rustdoc.sub_kind(kind), rel, markdown)
                        .with_meta("origin", "build");
                if let Some(title) = html_title(&html) {
                    record = record.with_title(title);
                }
                out.push(record);
            }
            Err(e) => out.skip(rel, e.to_string()),
        }
    }
    info!(items = out.records.len(), "Captured rustdoc item pages");
    out
}

impl Adapter for RustdocAdapter {
    fn framework(&self) -> Framework {
        Framework::Rustdoc
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::Rustdoc;
        let manifest = require(fw, docs_path, &["Cargo.toml"])?;
        info!(manifest = %manifest.display(), "Parsing Rust crate documentation");

        let sources = find_files(docs_path, &["rs"], &["target", TARGET_DIR]);
        let mut outcome = native_pass(fw, docs_path, &sources, ctx, module_docs);

        let target = ScopedPath::claim(docs_path.join(TARGET_DIR));
        let build = ToolInvocation::new("cargo", docs_path).args([
            "doc",
            "--no-deps",
            "--document-private-items",
            "--target-dir",
            TARGET_DIR,
        ]);
        run_build_step(fw, ctx, build, "rustdoc_args")?;

        outcome.extend(capture_items(docs_path, &target.path().join("doc"), ctx));
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names_map_to_item_kinds() {
        assert_eq!(item_kind(Path::new("doc/demo/struct.Widget.html")), Some("struct"));
        assert_eq!(item_kind(Path::new("doc/demo/fn.run.html")), Some("fn"));
        assert_eq!(item_kind(Path::new("doc/demo/index.html")), Some("module"));
        assert_eq!(item_kind(Path::new("doc/help.html")), None);
    }
}
