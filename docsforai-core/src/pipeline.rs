//! High-level pipeline: acquire → detect → check toolchain → parse → consolidate → write.
//!
//! Fail-fast: the first failing stage aborts the run and nothing is written.
//! Used by the CLI `build` command and by integration tests with mocked
//! [`RepositoryProvider`] and [`ToolRunner`] implementations.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::acquire::RepositoryProvider;
use crate::adapters::ParseContext;
use crate::config::BuildConfig;
use crate::consolidate::{consolidate, PackageInfo};
use crate::convert::HtmlConverter;
use crate::dependencies::{installation_instructions, missing_dependencies};
use crate::detect::detect;
use crate::error::DocsError;
use crate::framework::{Framework, FrameworkChoice};
use crate::parse::parse_documentation;
use crate::record::SkippedFile;
use crate::tool::ToolRunner;

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub framework: Framework,
    pub repo_root: PathBuf,
    pub output_path: PathBuf,
    pub records: usize,
    pub skipped: Vec<SkippedFile>,
}

fn check_toolchain(framework: Framework) -> Result<(), DocsError> {
    let missing = missing_dependencies(framework);
    if missing.is_empty() {
        return Ok(());
    }
    for hint in installation_instructions(&missing) {
        warn!(framework = %framework, hint = %hint, "[BUILD] Install hint");
    }
    Err(DocsError::MissingDependencies {
        framework,
        missing: missing.iter().map(|d| d.name.to_string()).collect(),
    })
}

/// Runs one full build for `config`. Remote sources are checked out under `workdir`.
pub async fn build_documentation<P>(
    config: &BuildConfig,
    provider: &P,
    runner: &dyn ToolRunner,
    converter: &dyn HtmlConverter,
    workdir: &Path,
) -> Result<BuildReport, DocsError>
where
    P: RepositoryProvider + ?Sized,
{
    info!(package = %config.package_name, "[BUILD] Starting documentation build");

    let repo_root = provider.acquire(&config.source, workdir).await.map_err(|e| {
        error!(error = %e, "[BUILD][ERROR] Repository acquisition failed");
        e
    })?;
    info!(repo_root = %repo_root.display(), "[BUILD] Repository ready");

    let docs_path = repo_root.join(&config.docs.path);
    let framework = match config.docs.framework.parse::<FrameworkChoice>()? {
        FrameworkChoice::Explicit(fw) => fw,
        FrameworkChoice::Auto => detect(&docs_path)?,
    };
    info!(framework = %framework, docs_path = %docs_path.display(), "[BUILD] Framework selected");

    if config.advanced.skip_dependency_check {
        info!("[BUILD] Dependency check skipped by configuration");
    } else {
        check_toolchain(framework)?;
    }

    let ctx = ParseContext::new(&config.build_args, runner, converter)
        .with_max_file_size(Some(config.advanced.max_file_size));
    let outcome = parse_documentation(&docs_path, FrameworkChoice::Explicit(framework), &ctx)
        .map_err(|e| {
            error!(framework = %framework, error = %e, "[BUILD][ERROR] Parsing failed");
            e
        })?;
    info!(
        records = outcome.records.len(),
        skipped = outcome.skipped.len(),
        "[BUILD] Parsing succeeded"
    );

    let package = PackageInfo {
        name: &config.package_name,
        version: config.version.as_deref(),
    };
    let bundle = consolidate(
        &outcome.records,
        &package,
        &config.consolidation,
        &config.metadata,
        &repo_root,
    );

    let output_path = config.output.file_path();
    fs::create_dir_all(&config.output.path).map_err(|e| DocsError::io(&config.output.path, e))?;
    fs::write(&output_path, bundle).map_err(|e| DocsError::io(&output_path, e))?;
    info!(output = %output_path.display(), "[BUILD] Documentation written");

    Ok(BuildReport {
        framework,
        repo_root,
        output_path,
        records: outcome.records.len(),
        skipped: outcome.skipped,
    })
}
