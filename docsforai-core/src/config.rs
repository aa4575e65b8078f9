//! Build configuration: what to fetch, how to parse it and where the bundle goes.
//!
//! Loaded from YAML by the CLI; every section except `source`, `docs` and
//! `output` has defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::options::BuildOptions;

pub const DEFAULT_OUTPUT_FILENAME: &str = "documentation.md";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub package_name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub source: SourceConfig,
    pub docs: DocsConfig,
    #[serde(default)]
    pub build_args: BuildOptions,
    pub output: OutputConfig,
    #[serde(default)]
    pub consolidation: ConsolidationConfig,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

impl BuildConfig {
    pub fn trace_loaded(&self) {
        info!(
            package_name = %self.package_name,
            source = %self.source.describe(),
            docs_path = %self.docs.path.display(),
            framework = %self.docs.framework,
            output = %self.output.file_path().display(),
            "Loaded BuildConfig"
        );
        debug!(?self, "BuildConfig loaded (full debug)");
    }
}

/// Where the repository comes from: a git remote or a local checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SourceConfig {
    pub fn describe(&self) -> String {
        match (&self.path, &self.url) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(url)) => match &self.branch {
                Some(branch) => format!("{url}@{branch}"),
                None => url.clone(),
            },
            (None, None) => "<none>".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Relative to the repository root.
    pub path: PathBuf,
    #[serde(default = "default_framework")]
    pub framework: String,
}

fn default_framework() -> String {
    "auto".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "default_format")]
    pub format: String,
}

impl OutputConfig {
    pub fn file_path(&self) -> PathBuf {
        self.path.join(&self.filename)
    }
}

fn default_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

fn default_format() -> String {
    "markdown".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    pub include_changelog: bool,
    pub changelog_path: Option<PathBuf>,
    /// Substrings or glob patterns matched against record filenames.
    pub exclude_patterns: Vec<String>,
    /// `doc_type` values in the order their sections should appear.
    pub custom_order: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub author: String,
    pub description: String,
    pub license: String,
    pub website: String,
    pub repository: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    /// Seconds. Advisory: tools are not killed when it elapses.
    pub timeout: u64,
    pub max_file_size: u64,
    pub skip_dependency_check: bool,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            skip_dependency_check: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_fills_defaults() {
        let yaml = r#"
package_name: demo
source:
  url: https://github.com/org/demo
docs:
  path: docs
output:
  path: ./out
"#;
        let config: BuildConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.docs.framework, "auto");
        assert_eq!(config.output.filename, DEFAULT_OUTPUT_FILENAME);
        assert_eq!(config.output.file_path(), PathBuf::from("./out/documentation.md"));
        assert_eq!(config.advanced, AdvancedConfig::default());
        assert!(config.build_args.is_empty());
        assert_eq!(config.source.describe(), "https://github.com/org/demo");
    }

    #[test]
    fn local_path_wins_over_url_in_description() {
        let source = SourceConfig {
            url: Some("https://github.com/org/demo".into()),
            branch: Some("dev".into()),
            path: Some(PathBuf::from("/src/demo")),
        };
        assert_eq!(source.describe(), "/src/demo");
    }
}
