//! Read the Docs: the project config plus whichever builder it points at.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use super::common::CommonAdapter;
use super::support::{parse_structured, pretty_json, rel_path, require};
use super::{mkdocs, sphinx, Adapter, ParseContext};
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};

const CONFIG_NAMES: &[&str] = &[
    ".readthedocs.yaml",
    ".readthedocs.yml",
    "readthedocs.yaml",
    "readthedocs.yml",
    ".readthedocs/config.yaml",
];

pub struct ReadTheDocsAdapter;

enum Delegate {
    Sphinx(PathBuf),
    MkDocs(PathBuf),
    Common,
}

/// Explicit `sphinx.configuration` / `mkdocs.configuration` win over discovery.
fn delegate(docs_path: &Path, config: &Value) -> Delegate {
    let configured = |key: &str| {
        config
            .pointer(&format!("/{key}/configuration"))
            .and_then(Value::as_str)
            .map(|rel| docs_path.join(rel))
            .filter(|p| p.is_file())
    };
    if let Some(conf) = configured("sphinx") {
        if let Some(dir) = conf.parent() {
            return Delegate::Sphinx(dir.to_path_buf());
        }
    }
    if let Some(yml) = configured("mkdocs") {
        return Delegate::MkDocs(yml);
    }
    if let Some(dir) = sphinx::find_source_dir(docs_path) {
        return Delegate::Sphinx(dir);
    }
    if let Some(yml) = mkdocs::find_config(docs_path) {
        return Delegate::MkDocs(yml);
    }
    Delegate::Common
}

impl Adapter for ReadTheDocsAdapter {
    fn framework(&self) -> Framework {
        Framework::ReadTheDocs
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::ReadTheDocs;
        let config_path = require(fw, docs_path, CONFIG_NAMES)?;
        info!(config = %config_path.display(), "Parsing Read the Docs project");

        let config = parse_structured(fw, docs_path, &config_path)?;
        let mut outcome = ParseOutcome::default();
        outcome.push(
            DocumentRecord::new(
                fw.sub_kind("config"),
                rel_path(docs_path, &config_path),
                pretty_json(&config),
            )
            .with_title("Read the Docs configuration"),
        );

        let delegated = match delegate(docs_path, &config) {
            Delegate::Sphinx(dir) => {
                info!(source = %dir.display(), "Delegating to Sphinx");
                sphinx::parse_source_dir(docs_path, &dir, ctx)?
            }
            Delegate::MkDocs(yml) => {
                info!(config = %yml.display(), "Delegating to MkDocs");
                mkdocs::parse_with_config(docs_path, &yml, ctx)?
            }
            Delegate::Common => {
                info!("No builder configured, reading plain documents");
                match CommonAdapter.parse(docs_path, ctx) {
                    Err(DocsError::RequiredFileMissing { .. }) => ParseOutcome::default(),
                    other => other?,
                }
            }
        };
        for record in delegated.records {
            outcome.push(record.with_meta("via", fw.as_str()));
        }
        outcome.skipped.extend(delegated.skipped);
        Ok(outcome)
    }
}
