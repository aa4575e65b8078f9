//! GitBook: config record, `SUMMARY.md` table of contents, Markdown pages titled from it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::info;

use super::support::{
    find_files, first_existing, load_source, markdown_title, missing, parse_structured,
    pretty_json, read_required, rel_path, require,
};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};

const CONFIG_NAMES: &[&str] = &["book.json", ".gitbook.yaml", ".gitbook.yml", "docs/book.json"];
const SUMMARY: &str = "SUMMARY.md";
const CONFIG_OPTION: &str = "gitbook_config_file";

static SUMMARY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s#]+)(?:#[^)]*)?\)").unwrap());

pub struct GitBookAdapter;

/// Maps each page linked from `SUMMARY.md` to its label.
fn summary_titles(summary: &str) -> HashMap<String, String> {
    SUMMARY_LINK
        .captures_iter(summary)
        .map(|c| {
            let target = c[2].trim_start_matches("./").to_string();
            (target, c[1].trim().to_string())
        })
        .collect()
}

/// `.gitbook.yaml` may move the content root and the summary file.
/// Both are relative to `base`, the directory holding the config.
fn content_layout(base: &Path, config: &Value) -> (PathBuf, String) {
    let root = match config.get("root").and_then(Value::as_str) {
        Some(r) => base.join(r.trim_start_matches("./")),
        None => base.to_path_buf(),
    };
    let summary = config
        .pointer("/structure/summary")
        .and_then(Value::as_str)
        .unwrap_or(SUMMARY)
        .to_string();
    (root, summary)
}

impl Adapter for GitBookAdapter {
    fn framework(&self) -> Framework {
        Framework::GitBook
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::GitBook;
        let config_path = match ctx.options.value(CONFIG_OPTION) {
            Some(name) => Some(require(fw, docs_path, &[name])?),
            None => first_existing(docs_path, CONFIG_NAMES),
        };

        let mut outcome = ParseOutcome::default();
        let (config, base) = match &config_path {
            Some(path) => {
                info!(config = %path.display(), "Parsing GitBook documentation");
                let config = parse_structured(fw, docs_path, path)?;
                outcome.push(
                    DocumentRecord::new(
                        fw.sub_kind("config"),
                        rel_path(docs_path, path),
                        pretty_json(&config),
                    )
                    .with_title("Book configuration"),
                );
                (config, path.parent().unwrap_or(docs_path).to_path_buf())
            }
            // A bare `SUMMARY.md` book has no config of its own.
            None if docs_path.join(SUMMARY).is_file() => {
                info!(path = %docs_path.display(), "Parsing GitBook documentation without a config file");
                (Value::Null, docs_path.to_path_buf())
            }
            None => return Err(missing(fw, format!("{} or {SUMMARY}", CONFIG_NAMES.join(" or ")))),
        };

        let (content_root, summary_name) = content_layout(&base, &config);
        let summary_path = content_root.join(&summary_name);
        let titles = if summary_path.is_file() {
            let summary = read_required(&summary_path)?;
            let titles = summary_titles(&summary);
            if !summary.trim().is_empty() {
                outcome.push(
                    DocumentRecord::new(
                        fw.sub_kind("summary"),
                        rel_path(docs_path, &summary_path),
                        summary,
                    )
                    .with_title("Summary"),
                );
            }
            titles
        } else {
            HashMap::new()
        };

        for page in find_files(&content_root, &["md"], &["_book"]) {
            if page == summary_path {
                continue;
            }
            let Some(content) = load_source(ctx, docs_path, &page, &mut outcome) else {
                continue;
            };
            let title = titles
                .get(&rel_path(&content_root, &page))
                .cloned()
                .or_else(|| markdown_title(&content));
            let mut record = DocumentRecord::new(fw.as_str(), rel_path(docs_path, &page), content);
            if let Some(title) = title {
                record = record.with_title(title);
            }
            outcome.push(record);
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_links_map_pages_to_labels() {
        let summary = "# Summary\n\n* [Introduction](README.md)\n* [Setup](./guide/setup.md#install)\n";
        let titles = summary_titles(summary);
        assert_eq!(titles["README.md"], "Introduction");
        assert_eq!(titles["guide/setup.md"], "Setup");
    }

    #[test]
    fn layout_is_relative_to_the_config_directory() {
        let config = serde_json::json!({"root": "./content", "structure": {"summary": "TOC.md"}});
        let (root, summary) = content_layout(Path::new("/repo/docs"), &config);
        assert_eq!(root, Path::new("/repo/docs/content"));
        assert_eq!(summary, "TOC.md");

        let (root, summary) = content_layout(Path::new("/repo"), &Value::Null);
        assert_eq!(root, Path::new("/repo"));
        assert_eq!(summary, SUMMARY);
    }
}
