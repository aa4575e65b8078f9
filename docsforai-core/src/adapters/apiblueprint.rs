//! API Blueprint: raw `.apib` sources, rendered to HTML with `aglio`.

use std::fs;
use std::path::Path;

use tracing::info;

use super::support::{
    as_is, capture_html, find_files, missing, native_pass, rel_path, run_build_step, ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::ParseOutcome;
use crate::tool::ToolInvocation;

const EXTENSIONS: &[&str] = &["apib", "apiblueprint"];
const OUTPUT_DIR: &str = "aglio_output";

pub struct ApiBlueprintAdapter;

/// `v1/api.apib` renders to `v1/api.html` inside the output directory.
fn rendered_page(source: &str) -> String {
    let stem = match source.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem,
        _ => source,
    };
    format!("{stem}.html")
}

impl Adapter for ApiBlueprintAdapter {
    fn framework(&self) -> Framework {
        Framework::ApiBlueprint
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::ApiBlueprint;
        let blueprints = find_files(docs_path, EXTENSIONS, &[OUTPUT_DIR]);
        if blueprints.is_empty() {
            return Err(missing(fw, "*.apib blueprint"));
        }
        info!(blueprints = blueprints.len(), "Parsing API Blueprint documentation");

        let mut outcome = native_pass(fw, docs_path, &blueprints, ctx, as_is);

        let output = ScopedPath::dir(docs_path.join(OUTPUT_DIR))?;
        for blueprint in &blueprints {
            let source = rel_path(docs_path, blueprint);
            let page = rendered_page(&source);
            // same-stem blueprints in different directories must not overwrite each other
            if let Some(parent) = output.path().join(&page).parent() {
                fs::create_dir_all(parent).map_err(|e| DocsError::io(parent, e))?;
            }
            let render = ToolInvocation::new("aglio", docs_path)
                .arg("-i")
                .arg(source)
                .arg("-o")
                .arg(format!("{OUTPUT_DIR}/{page}"));
            run_build_step(fw, ctx, render, "aglio_args")?;
        }

        outcome.extend(capture_html(fw, docs_path, output.path(), ctx, &[]));
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_page_keeps_the_relative_directory() {
        assert_eq!(rendered_page("api.apib"), "api.html");
        assert_eq!(rendered_page("v1/api.apib"), "v1/api.html");
        assert_eq!(rendered_page("specs.v2/api"), "specs.v2/api.html");
    }
}
