//! Jekyll: Markdown pages and posts, `bundle exec jekyll build` capture.

use std::path::Path;

use tracing::info;

use super::support::{
    as_is, capture_html, find_files, native_pass, parse_structured, require, run_build_step,
    ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::ParseOutcome;
use crate::tool::ToolInvocation;

const CONFIG_NAMES: &[&str] = &["_config.yml", "_config.yaml"];
const SITE_DIR: &str = "_site";

pub struct JekyllAdapter;

impl Adapter for JekyllAdapter {
    fn framework(&self) -> Framework {
        Framework::Jekyll
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::Jekyll;
        let config_path = require(fw, docs_path, CONFIG_NAMES)?;
        info!(config = %config_path.display(), "Parsing Jekyll documentation");
        parse_structured(fw, docs_path, &config_path)?;

        let files = find_files(
            docs_path,
            &["md", "markdown"],
            &[SITE_DIR, "vendor", ".bundle", ".jekyll-cache"],
        );
        let mut outcome = native_pass(fw, docs_path, &files, ctx, as_is);

        let site = ScopedPath::claim(docs_path.join(SITE_DIR));
        let install = ToolInvocation::new("bundle", docs_path).arg("install");
        run_build_step(fw, ctx, install, "bundle_install_args")?;
        let build = ToolInvocation::new("bundle", docs_path)
            .args(["exec", "jekyll", "build", "-d", SITE_DIR]);
        run_build_step(fw, ctx, build, "bundle_build_args")?;

        outcome.extend(capture_html(fw, docs_path, site.path(), ctx, &["assets"]));
        Ok(outcome)
    }
}
