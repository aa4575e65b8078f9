//! Hugo: Markdown under `contentDir`, `hugo --destination public` capture.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::support::{
    as_is, capture_html, find_files, invalid_config, native_pass, parse_structured, require,
    run_build_step, ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::ParseOutcome;
use crate::tool::ToolInvocation;

const CONFIG_NAMES: &[&str] = &[
    "hugo.toml",
    "hugo.yaml",
    "hugo.json",
    "config.toml",
    "config.yaml",
    "config.json",
];
const PUBLISH_DIR: &str = "public";

pub struct HugoAdapter;

impl Adapter for HugoAdapter {
    fn framework(&self) -> Framework {
        Framework::Hugo
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::Hugo;
        let config_path = require(fw, docs_path, CONFIG_NAMES)?;
        info!(config = %config_path.display(), "Parsing Hugo documentation");

        let config = parse_structured(fw, docs_path, &config_path)?;
        if !matches!(config, Value::Object(_) | Value::Null) {
            return Err(invalid_config(fw, docs_path, &config_path, "expected a table"));
        }
        let content_dir = config
            .get("contentDir")
            .or_else(|| config.get("contentdir"))
            .and_then(Value::as_str)
            .unwrap_or("content");

        let files = find_files(&docs_path.join(content_dir), &["md", "markdown"], &[]);
        let mut outcome = native_pass(fw, docs_path, &files, ctx, as_is);

        let public = ScopedPath::claim(docs_path.join(PUBLISH_DIR));
        let build = ToolInvocation::new("hugo", docs_path)
            .arg("--destination")
            .arg(PUBLISH_DIR);
        run_build_step(fw, ctx, build, "hugo_args")?;

        outcome.extend(capture_html(fw, docs_path, public.path(), ctx, &[]));
        Ok(outcome)
    }
}
