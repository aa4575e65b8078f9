//! Error types for the docsforai core.
//! One error enum covering detection, parsing, validation and the build pipeline.

use std::fmt;
use std::path::PathBuf;

use crate::framework::Framework;

/// A single contract violation found by the record validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordViolation {
    /// Position of the offending record in the returned sequence.
    pub index: usize,
    pub filename: String,
    pub problem: String,
}

impl fmt::Display for RecordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({}): {}", self.index, self.filename, self.problem)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    // Input
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Unsupported framework: {0}")]
    UnsupportedFramework(String),

    // Adapter preconditions
    #[error("{framework}: required file missing: {artifact}")]
    RequiredFileMissing {
        framework: Framework,
        artifact: String,
    },

    #[error("{framework}: invalid config format in {file}: {reason}")]
    InvalidConfigFormat {
        framework: Framework,
        file: String,
        reason: String,
    },

    // External tools
    #[error("{framework}: external tool '{tool}' failed{}", exit_suffix(.code))]
    ExternalToolFailure {
        framework: Framework,
        tool: String,
        code: Option<i32>,
    },

    #[error("{framework}: could not read output of '{tool}': {reason}")]
    MalformedToolOutput {
        framework: Framework,
        tool: String,
        reason: String,
    },

    // Contract
    #[error("Invalid record shape ({} violations): {}", .violations.len(), join_violations(.violations))]
    InvalidRecordShape { violations: Vec<RecordViolation> },

    // Pipeline
    #[error("Failed to acquire repository {source_ref}: {reason}")]
    RepositoryAcquisition { source_ref: String, reason: String },

    #[error("{framework}: missing dependencies: {}", .missing.join(", "))]
    MissingDependencies {
        framework: Framework,
        missing: Vec<String>,
    },

    #[error("Download failed: {reason}")]
    Download { reason: String },

    // IO
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!(" with exit code {c}"),
        None => String::new(),
    }
}

fn join_violations(violations: &[RecordViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure reported by an [`HtmlConverter`](crate::convert::HtmlConverter).
/// Always recovered per file; never escapes an adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("conversion failed: {0}")]
pub struct ConversionFailure(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failure_message_names_tool_and_code_only() {
        let err = DocsError::ExternalToolFailure {
            framework: Framework::MkDocs,
            tool: "mkdocs".into(),
            code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "mkdocs: external tool 'mkdocs' failed with exit code 2"
        );
    }

    #[test]
    fn record_shape_lists_every_violation() {
        let err = DocsError::InvalidRecordShape {
            violations: vec![
                RecordViolation {
                    index: 0,
                    filename: "a.md".into(),
                    problem: "content is empty".into(),
                },
                RecordViolation {
                    index: 3,
                    filename: "".into(),
                    problem: "filename is empty".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 violations"));
        assert!(msg.contains("#0 (a.md): content is empty"));
        assert!(msg.contains("#3 (): filename is empty"));
    }
}
