/// `load_config` module: parses a docsforai YAML file into a validated [`BuildConfig`].
///
/// This is the only place where untrusted YAML is read. Serde handles shape
/// and defaults; [`validate`] then checks the values serde cannot, and every
/// failure names the offending field (`docs.framework`, `output.format`, ...).
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{bail, Context, Result};
use docsforai_core::config::BuildConfig;
use docsforai_core::FrameworkChoice;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub const SUPPORTED_OUTPUT_FORMATS: &[&str] = &["markdown"];

/// Value checks that serde cannot express.
pub fn validate(config: &BuildConfig) -> Result<()> {
    if config.package_name.trim().is_empty() {
        bail!("package_name: must not be empty");
    }

    let source = &config.source;
    if source.path.is_none() && source.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
        bail!("source: either source.url or source.path is required");
    }
    if source.branch.as_deref().is_some_and(|b| b.trim().is_empty()) {
        bail!("source.branch: must not be empty when set");
    }

    if config.docs.path.as_os_str().is_empty() {
        bail!("docs.path: must not be empty");
    }
    if config.docs.path.is_absolute() {
        bail!("docs.path: must be relative to the repository root");
    }
    if let Err(e) = config.docs.framework.parse::<FrameworkChoice>() {
        bail!("docs.framework: {e}");
    }

    if config.output.path.as_os_str().is_empty() {
        bail!("output.path: must not be empty");
    }
    let filename = config.output.filename.trim();
    if filename.is_empty() || filename.contains(['/', '\\']) {
        bail!("output.filename: must be a plain file name, got '{}'", config.output.filename);
    }
    if !SUPPORTED_OUTPUT_FORMATS.contains(&config.output.format.as_str()) {
        bail!(
            "output.format: unsupported format '{}', expected one of: {}",
            config.output.format,
            SUPPORTED_OUTPUT_FORMATS.join(", ")
        );
    }

    if config.advanced.max_file_size == 0 {
        bail!("advanced.max_file_size: must be greater than zero");
    }
    Ok(())
}

/// Loads and validates the YAML config at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BuildConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    let config: BuildConfig = serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })?;

    validate(&config).with_context(|| format!("Invalid configuration in {}", path_ref.display()))?;
    config.trace_loaded();
    Ok(config)
}
