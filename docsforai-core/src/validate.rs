//! Record shape validation, run on every adapter result before it is returned.

use std::collections::HashSet;

use tracing::error;

use crate::error::{DocsError, RecordViolation};
use crate::record::DocumentRecord;

fn filename_problem(filename: &str) -> Option<&'static str> {
    if filename.is_empty() {
        Some("empty filename")
    } else if filename.contains('\\') {
        Some("filename uses backslashes")
    } else if filename.starts_with('/') || filename.chars().nth(1) == Some(':') {
        Some("filename is absolute")
    } else if filename.split('/').any(|seg| seg == "..") {
        Some("filename escapes the docs root")
    } else {
        None
    }
}

/// Checks every record and reports all violations at once.
pub fn validate(records: &[DocumentRecord]) -> Result<(), DocsError> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let mut flag = |problem: &str| {
            violations.push(RecordViolation {
                index,
                filename: record.filename.clone(),
                problem: problem.to_string(),
            })
        };
        if record.doc_type.trim().is_empty() {
            flag("empty doc_type");
        }
        if let Some(problem) = filename_problem(&record.filename) {
            flag(problem);
        }
        if record.content.trim().is_empty() {
            flag("empty content");
        }
        if record.content.contains('\0') {
            flag("content contains NUL bytes");
        }
        if record.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            flag("empty title");
        }
        if record.metadata.keys().any(|k| k.trim().is_empty()) {
            flag("empty metadata key");
        }
        if !record.filename.is_empty() && !seen.insert(record.filename.as_str()) {
            flag("duplicate filename");
        }
    }
    if violations.is_empty() {
        return Ok(());
    }
    error!(violations = violations.len(), "Adapter returned malformed records");
    Err(DocsError::InvalidRecordShape { violations })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_records_pass() {
        let records = vec![
            DocumentRecord::new("mkdocs", "index.md", "# Home").with_title("Home"),
            DocumentRecord::new("mkdocs_nav", "mkdocs.yml", "[]"),
        ];
        assert!(validate(&records).is_ok());
    }

    #[test]
    fn all_violations_are_reported() {
        let mut untitled = DocumentRecord::new("", "../escape.md", "text");
        untitled.title = Some(" ".to_string());
        let records = vec![
            DocumentRecord::new("markdown", "a.md", "ok"),
            untitled,
            DocumentRecord::new("markdown", "a.md", "bin\0ary"),
            DocumentRecord::new("markdown", "C:\\docs\\b.md", ""),
        ];
        let Err(DocsError::InvalidRecordShape { violations }) = validate(&records) else {
            panic!("expected InvalidRecordShape");
        };
        let problems: Vec<(usize, &str)> = violations
            .iter()
            .map(|v| (v.index, v.problem.as_str()))
            .collect();
        assert_eq!(
            problems,
            vec![
                (1, "empty doc_type"),
                (1, "filename escapes the docs root"),
                (1, "empty title"),
                (2, "content contains NUL bytes"),
                (2, "duplicate filename"),
                (3, "filename uses backslashes"),
                (3, "empty content"),
            ]
        );
    }
}
