//! Docsify: `index.html` with an embedded `window.$docsify` config (or a standalone
//! `docsify.json`/`.docsifyrc`), Markdown pages, `_sidebar.md`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use super::support::{
    as_is, find_files, js_literal_after, js_literal_to_value, missing, native_pass,
    parse_structured, pretty_json, read_required, rel_path,
};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};

const SIDEBAR: &str = "_sidebar.md";
/// The site may live at the root or under `docs/`.
const ENTRY_NAMES: &[&str] = &["index.html", "docs/index.html", "docsify.json", ".docsifyrc"];

pub struct DocsifyAdapter;

fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("html"))
}

/// An `index.html` must mention docsify to win; standalone config files always qualify.
/// Falls back to the first existing entry.
fn locate(docs_path: &Path) -> Option<PathBuf> {
    let existing: Vec<PathBuf> = ENTRY_NAMES
        .iter()
        .map(|name| docs_path.join(name))
        .filter(|p| p.is_file())
        .collect();
    existing
        .iter()
        .find(|p| !is_html(p) || fs::read_to_string(p).is_ok_and(|t| t.contains("docsify")))
        .or(existing.first())
        .cloned()
}

/// Best effort: anything unparsable becomes `{}`.
fn embedded_config(index_html: &str) -> Value {
    let Some(literal) = js_literal_after(index_html, "window.$docsify") else {
        warn!("No window.$docsify block in index.html");
        return Value::Object(Default::default());
    };
    js_literal_to_value(&literal).unwrap_or_else(|reason| {
        warn!(reason = %reason, "Failed to parse Docsify config");
        Value::Object(Default::default())
    })
}

impl Adapter for DocsifyAdapter {
    fn framework(&self) -> Framework {
        Framework::Docsify
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::Docsify;
        let entry = locate(docs_path).ok_or_else(|| missing(fw, ENTRY_NAMES.join(" or ")))?;
        let site = entry.parent().unwrap_or(docs_path).to_path_buf();
        info!(path = %site.display(), "Parsing Docsify documentation");

        let config = if is_html(&entry) {
            embedded_config(&read_required(&entry)?)
        } else {
            parse_structured(fw, docs_path, &entry)?
        };
        let mut outcome = ParseOutcome::default();
        outcome.push(
            DocumentRecord::new(
                fw.sub_kind("config"),
                rel_path(docs_path, &entry),
                pretty_json(&config),
            )
            .with_title("Docsify configuration"),
        );

        let sidebar = site.join(SIDEBAR);
        let files: Vec<_> = find_files(&site, &["md"], &[])
            .into_iter()
            .filter(|p| *p != sidebar)
            .collect();
        outcome.extend(native_pass(fw, docs_path, &files, ctx, as_is));

        if sidebar.is_file() {
            let content = read_required(&sidebar)?;
            if !content.trim().is_empty() {
                outcome.push(
                    DocumentRecord::new(fw.sub_kind("sidebar"), rel_path(docs_path, &sidebar), content)
                        .with_title("Sidebar"),
                );
            }
        }
        Ok(outcome)
    }
}
