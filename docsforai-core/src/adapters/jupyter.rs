//! Jupyter: each notebook rendered as Markdown; corrupt notebooks are skipped.

use std::path::Path;

use tracing::info;

use super::support::{find_files, load_source, markdown_title, missing, rel_path};
use super::{Adapter, ParseContext};
use crate::convert::notebook::notebook_to_markdown;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};

pub struct JupyterAdapter;

impl Adapter for JupyterAdapter {
    fn framework(&self) -> Framework {
        Framework::Jupyter
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::Jupyter;
        let notebooks = find_files(docs_path, &["ipynb"], &[".ipynb_checkpoints"]);
        if notebooks.is_empty() {
            return Err(missing(fw, "*.ipynb notebook"));
        }
        info!(notebooks = notebooks.len(), "Parsing Jupyter notebooks");

        let mut outcome = ParseOutcome::default();
        for path in &notebooks {
            let Some(json) = load_source(ctx, docs_path, path, &mut outcome) else {
                continue;
            };
            let converted = match notebook_to_markdown(&json) {
                Ok(c) => c,
                Err(e) => {
                    outcome.skip(rel_path(docs_path, path), e.to_string());
                    continue;
                }
            };
            let filename = rel_path(docs_path, &path.with_extension("md"));
            let title = markdown_title(&converted.markdown);
            let mut record = DocumentRecord::new(fw.as_str(), filename, converted.markdown)
                .with_meta("source", rel_path(docs_path, path));
            if let Some(title) = title {
                record = record.with_title(title);
            }
            if let Some(language) = converted.language {
                record = record.with_meta("kernel", language);
            }
            outcome.push(record);
        }
        Ok(outcome)
    }
}
