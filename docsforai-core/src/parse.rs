//! Single entry point from a docs directory to validated document records.

use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::adapters::{Adapter, ParseContext};
use crate::detect::detect;
use crate::error::DocsError;
use crate::framework::{Framework, FrameworkChoice};
use crate::record::ParseOutcome;
use crate::registry::adapter_for;
use crate::validate::validate;

fn adapter_or_unsupported(framework: Framework) -> Result<&'static dyn Adapter, DocsError> {
    adapter_for(framework).ok_or_else(|| DocsError::UnsupportedFramework(framework.to_string()))
}

/// Parses the documentation under `docs_path`.
///
/// An explicit framework is resolved before the filesystem is touched; `Auto`
/// runs the classifier. The adapter's records are validated before returning.
pub fn parse_documentation(
    docs_path: &Path,
    choice: FrameworkChoice,
    ctx: &ParseContext<'_>,
) -> Result<ParseOutcome, DocsError> {
    let explicit = match choice {
        FrameworkChoice::Explicit(fw) => Some(adapter_or_unsupported(fw)?),
        FrameworkChoice::Auto => None,
    };

    if !docs_path.exists() {
        error!(path = %docs_path.display(), "Documentation path does not exist");
        return Err(DocsError::PathNotFound(docs_path.to_path_buf()));
    }
    let root = fs::canonicalize(docs_path).map_err(|e| DocsError::io(docs_path, e))?;

    let adapter = match explicit {
        Some(adapter) => adapter,
        None => adapter_or_unsupported(detect(&root)?)?,
    };
    info!(
        framework = %adapter.framework(),
        path = %root.display(),
        "Parsing documentation"
    );

    let outcome = adapter.parse(&root, ctx)?;
    validate(&outcome.records)?;
    info!(
        framework = %adapter.framework(),
        records = outcome.records.len(),
        skipped = outcome.skipped.len(),
        "Parsed documentation"
    );
    Ok(outcome)
}
