//! VuePress: Markdown sources, the sidebar from `.vuepress/config.*`, `vuepress build` capture.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::support::{
    as_is, capture_html, find_files, first_existing, invalid_config, js_literal_after,
    js_literal_to_value, missing, native_pass, pretty_json, read_required, rel_path,
    run_build_step, ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};
use crate::tool::ToolInvocation;

const CONFIG_NAMES: &[&str] = &[
    ".vuepress/config.js",
    ".vuepress/config.ts",
    ".vuepress/config.mjs",
];

pub struct VuePressAdapter;

/// Returns the source directory (the parent of `.vuepress`) and the config file.
fn locate(docs_path: &Path) -> Option<(PathBuf, PathBuf)> {
    [docs_path.to_path_buf(), docs_path.join("docs")]
        .into_iter()
        .find_map(|dir| first_existing(&dir, CONFIG_NAMES).map(|config| (dir, config)))
}

impl Adapter for VuePressAdapter {
    fn framework(&self) -> Framework {
        Framework::VuePress
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::VuePress;
        let (source_dir, config_path) =
            locate(docs_path).ok_or_else(|| missing(fw, CONFIG_NAMES.join(" or ")))?;
        info!(config = %config_path.display(), "Parsing VuePress documentation");

        let mut outcome = ParseOutcome::default();

        let config_source = read_required(&config_path)?;
        match js_literal_after(&config_source, "sidebar:") {
            Some(literal) => {
                let sidebar = js_literal_to_value(&literal)
                    .map_err(|reason| invalid_config(fw, docs_path, &config_path, reason))?;
                outcome.push(
                    DocumentRecord::new(
                        fw.sub_kind("sidebar"),
                        rel_path(docs_path, &config_path),
                        pretty_json(&sidebar),
                    )
                    .with_title("Sidebar"),
                );
            }
            None => debug!(config = %config_path.display(), "No sidebar in VuePress config"),
        }

        let files = find_files(docs_path, &["md"], &[".vuepress"]);
        outcome.extend(native_pass(fw, docs_path, &files, ctx, as_is));

        let dist = ScopedPath::claim(source_dir.join(".vuepress").join("dist"));
        let install = ToolInvocation::new("npm", docs_path).arg("install");
        run_build_step(fw, ctx, install, "npm_install_args")?;
        let build = ToolInvocation::new("npx", docs_path)
            .args(["vuepress", "build"])
            .path_arg(&source_dir);
        run_build_step(fw, ctx, build, "npm_build_args")?;

        outcome.extend(capture_html(fw, docs_path, dist.path(), ctx, &["assets"]));
        Ok(outcome)
    }
}
