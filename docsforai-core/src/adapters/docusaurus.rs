//! Docusaurus: `docs/` Markdown, `sidebars.json`, `npm install` + `npm run build`.

use std::path::Path;

use tracing::info;

use super::support::{
    as_is, capture_html, find_files, native_pass, parse_structured, pretty_json, rel_path,
    require, run_build_step, ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};
use crate::tool::ToolInvocation;

const CONFIG_NAMES: &[&str] = &[
    "docusaurus.config.js",
    "docusaurus.config.ts",
    "docusaurus.config.mjs",
];

pub struct DocusaurusAdapter;

impl Adapter for DocusaurusAdapter {
    fn framework(&self) -> Framework {
        Framework::Docusaurus
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::Docusaurus;
        require(fw, docs_path, CONFIG_NAMES)?;
        info!(path = %docs_path.display(), "Parsing Docusaurus documentation");

        let mut outcome = ParseOutcome::default();

        let sidebar = docs_path.join("sidebars.json");
        if sidebar.is_file() {
            let value = parse_structured(fw, docs_path, &sidebar)?;
            let record = DocumentRecord::new(
                fw.sub_kind("sidebar"),
                rel_path(docs_path, &sidebar),
                pretty_json(&value),
            );
            outcome.push(record.with_title("Sidebar"));
        }

        let files = find_files(&docs_path.join("docs"), &["md", "mdx"], &[]);
        outcome.extend(native_pass(fw, docs_path, &files, ctx, as_is));

        let build_dir = ScopedPath::claim(docs_path.join("build"));
        let install = ToolInvocation::new("npm", docs_path).arg("install");
        run_build_step(fw, ctx, install, "npm_install_args")?;
        let build = ToolInvocation::new("npm", docs_path).args(["run", "build"]);
        run_build_step(fw, ctx, build, "npm_build_args")?;

        outcome.extend(capture_html(fw, docs_path, build_dir.path(), ctx, &["assets"]));
        Ok(outcome)
    }
}
