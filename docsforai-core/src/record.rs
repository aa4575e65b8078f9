//! The document record: the one data shape every adapter emits.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One normalized unit of documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_type: String,
    /// Relative, forward-slash path; unique within one parse run.
    pub filename: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl DocumentRecord {
    pub fn new(
        doc_type: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: doc_type.into(),
            filename: filename.into(),
            content: content.into(),
            title: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.trim().is_empty() {
            self.title = Some(title);
        }
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A native-pass file that was not turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Result of one adapter call: records in emission order plus skipped files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub records: Vec<DocumentRecord>,
    pub skipped: Vec<SkippedFile>,
    /// Filenames already in `records`; kept in step by [`ParseOutcome::push`].
    taken: HashSet<String>,
}

impl ParseOutcome {
    pub fn filenames(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.filename.as_str()).collect()
    }

    pub fn extend(&mut self, other: ParseOutcome) {
        for record in other.records {
            self.push(record);
        }
        self.skipped.extend(other.skipped);
    }

    /// Appends a record, renaming it with a numeric suffix if its filename is taken.
    pub fn push(&mut self, mut record: DocumentRecord) {
        if self.taken.contains(&record.filename) {
            let base = record.filename.clone();
            let mut n = 2;
            while self.taken.contains(&numbered(&base, n)) {
                n += 1;
            }
            record.filename = numbered(&base, n);
        }
        self.taken.insert(record.filename.clone());
        self.records.push(record);
    }

    /// Records a skipped file and logs it.
    pub fn skip(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        let path = path.into();
        let reason = reason.into();
        warn!(file = %path, reason = %reason, "Skipping file");
        self.skipped.push(SkippedFile { path, reason });
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn numbered(filename: &str, n: usize) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => {
            format!("{stem}_{n}.{ext}")
        }
        _ => format!("{filename}_{n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_disambiguates_duplicate_filenames() {
        let mut out = ParseOutcome::default();
        out.push(DocumentRecord::new("doxygen_class", "class_Foo.md", "a"));
        out.push(DocumentRecord::new("doxygen_class", "class_Foo.md", "b"));
        out.push(DocumentRecord::new("doxygen_class", "class_Foo.md", "c"));
        assert_eq!(
            out.filenames(),
            vec!["class_Foo.md", "class_Foo_2.md", "class_Foo_3.md"]
        );
    }

    #[test]
    fn extend_keeps_filenames_unique_across_outcomes() {
        let mut first = ParseOutcome::default();
        for _ in 0..500 {
            first.push(DocumentRecord::new("rustdoc_struct", "struct.Item.html", "x"));
        }
        let mut second = ParseOutcome::default();
        second.push(DocumentRecord::new("rustdoc_struct", "struct.Item.html", "y"));
        second.push(DocumentRecord::new("rustdoc_struct", "struct.Item_2.html", "z"));
        first.extend(second);

        let names: HashSet<&str> = first.filenames().into_iter().collect();
        assert_eq!(names.len(), 502);
        assert_eq!(first.records[500].filename, "struct.Item_501.html");
        assert_eq!(first.records[501].filename, "struct.Item_2_2.html");
    }

    #[test]
    fn empty_title_is_dropped() {
        let rec = DocumentRecord::new("markdown", "a.md", "x").with_title("  ");
        assert_eq!(rec.title, None);
    }

    #[test]
    fn skip_is_recorded() {
        let mut out = ParseOutcome::default();
        out.skip("bad.ipynb", "invalid JSON");
        assert_eq!(
            out.skipped,
            vec![SkippedFile {
                path: "bad.ipynb".into(),
                reason: "invalid JSON".into()
            }]
        );
    }
}
