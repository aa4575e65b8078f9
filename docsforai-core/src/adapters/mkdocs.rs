//! MkDocs: navigation-driven native pass, `mkdocs_nav` record, `mkdocs build` capture.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::support::{
    as_is, capture_html, find_files, first_existing, invalid_config, load_source, markdown_title,
    missing, native_pass, parse_structured, pretty_json, rel_path, run_build_step, ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};
use crate::tool::ToolInvocation;

const CONFIG_NAMES: &[&str] = &["mkdocs.yml", "mkdocs.yaml"];
const SITE_DIR: &str = "site";

pub struct MkDocsAdapter;

/// Locates the MkDocs config at the docs root, else the first one found below it.
pub(crate) fn find_config(docs_path: &Path) -> Option<PathBuf> {
    first_existing(docs_path, CONFIG_NAMES).or_else(|| {
        find_files(docs_path, &["yml", "yaml"], &[])
            .into_iter()
            .find(|p| {
                p.file_name()
                    .is_some_and(|n| CONFIG_NAMES.contains(&n.to_string_lossy().as_ref()))
            })
    })
}

struct NavWalk<'a> {
    docs_dir: &'a Path,
    ctx: &'a ParseContext<'a>,
    out: ParseOutcome,
}

impl NavWalk<'_> {
    fn walk(&mut self, items: &[Value], section: &[String]) {
        for item in items {
            match item {
                Value::String(target) => self.leaf(None, target, section),
                Value::Object(map) => {
                    for (label, value) in map {
                        match value {
                            Value::String(target) => self.leaf(Some(label), target, section),
                            Value::Array(children) => {
                                let mut nested = section.to_vec();
                                nested.push(label.clone());
                                self.walk(children, &nested);
                            }
                            other => debug!(label = %label, value = %other, "Ignoring nav entry"),
                        }
                    }
                }
                other => debug!(value = %other, "Ignoring nav entry"),
            }
        }
    }

    fn leaf(&mut self, label: Option<&String>, target: &str, section: &[String]) {
        if target.contains("://") || target.starts_with("mailto:") {
            debug!(target = %target, "Skipping external nav link");
            return;
        }
        let path = self.docs_dir.join(target);
        if !path.is_file() {
            warn!(target = %target, "File listed in nav does not exist");
            self.out.skip(target, "listed in nav but not found");
            return;
        }
        let Some(content) = load_source(self.ctx, self.docs_dir, &path, &mut self.out) else {
            return;
        };
        let title = label.cloned().or_else(|| markdown_title(&content));
        let mut record =
            DocumentRecord::new(Framework::MkDocs.as_str(), rel_path(self.docs_dir, &path), content);
        if let Some(title) = title {
            record = record.with_title(title);
        }
        if !section.is_empty() {
            record = record.with_meta("nav_section", section.join(" / "));
        }
        self.out.push(record);
    }
}

impl Adapter for MkDocsAdapter {
    fn framework(&self) -> Framework {
        Framework::MkDocs
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let config_path = find_config(docs_path)
            .ok_or_else(|| missing(Framework::MkDocs, CONFIG_NAMES.join(" or ")))?;
        parse_with_config(docs_path, &config_path, ctx)
    }
}

/// Parses the MkDocs project described by `config_path`; filenames stay relative to `docs_path`.
pub(crate) fn parse_with_config(
    docs_path: &Path,
    config_path: &Path,
    ctx: &ParseContext<'_>,
) -> Result<ParseOutcome, DocsError> {
    let fw = Framework::MkDocs;
    let project_root = config_path.parent().unwrap_or(docs_path).to_path_buf();
    info!(config = %config_path.display(), "Parsing MkDocs documentation");

    let config = match parse_structured(fw, docs_path, config_path)? {
        Value::Null => Value::Object(Default::default()),
        v @ Value::Object(_) => v,
        _ => return Err(invalid_config(fw, docs_path, config_path, "expected a mapping")),
    };

    let docs_dir = match config.get("docs_dir").and_then(Value::as_str) {
        Some(dir) => project_root.join(dir),
        None => project_root.join("docs"),
    };
    let nav: Vec<Value> = match config.get("nav") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(_) => {
            return Err(invalid_config(fw, docs_path, config_path, "`nav` must be a list"))
        }
    };

    let mut walk = NavWalk {
        docs_dir: &docs_dir,
        ctx,
        out: ParseOutcome::default(),
    };
    walk.walk(&nav, &[]);
    let mut outcome = walk.out;

    if outcome.records.is_empty() {
        info!(docs_dir = %docs_dir.display(), "No pages from nav, discovering Markdown files");
        let files = find_files(&docs_dir, &["md", "markdown"], &[]);
        let discovered = native_pass(fw, &docs_dir, &files, ctx, as_is);
        outcome.extend(discovered);
    }

    if !nav.is_empty() {
        let name = rel_path(docs_path, config_path);
        outcome.push(
            DocumentRecord::new(fw.sub_kind("nav"), name, pretty_json(&Value::Array(nav)))
                .with_title("Navigation"),
        );
    }

    let site = ScopedPath::dir(project_root.join(SITE_DIR))?;
    let build = ToolInvocation::new("mkdocs", &project_root)
        .arg("build")
        .arg("-f")
        .path_arg(config_path)
        .arg("-d")
        .path_arg(site.path());
    run_build_step(fw, ctx, build, "mkdocs_args")?;

    outcome.extend(capture_html(fw, docs_path, site.path(), ctx, &[]));
    Ok(outcome)
}
