//! Framework classification.
//!
//! One hand-ordered probe table decides precedence: every structural probe
//! (config files, manifests, conventional directories) runs before any content
//! probe, and the generic Markdown probe is always last. A new framework is
//! inserted where it neither shadows a more specific probe nor is shadowed by
//! a generic one.

mod probes;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::DocsError;
use crate::framework::Framework;

/// Whether a probe looks at project structure or at source file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Structural,
    Content,
}

pub struct Probe {
    pub framework: Framework,
    pub signal: Signal,
    check: fn(&Path) -> bool,
}

impl Probe {
    const fn structural(framework: Framework, check: fn(&Path) -> bool) -> Self {
        Self {
            framework,
            signal: Signal::Structural,
            check,
        }
    }

    const fn content(framework: Framework, check: fn(&Path) -> bool) -> Self {
        Self {
            framework,
            signal: Signal::Content,
            check,
        }
    }

    pub fn matches(&self, root: &Path) -> bool {
        (self.check)(root)
    }
}

/// Evaluation order. First match wins.
pub static PROBES: &[Probe] = &[
    Probe::structural(Framework::Docusaurus, probes::docusaurus),
    Probe::structural(Framework::VuePress, probes::vuepress),
    Probe::structural(Framework::MkDocs, probes::mkdocs),
    Probe::structural(Framework::Sphinx, probes::sphinx),
    Probe::structural(Framework::ReadTheDocs, probes::readthedocs),
    Probe::structural(Framework::GitBook, probes::gitbook),
    Probe::structural(Framework::Docsify, probes::docsify),
    Probe::structural(Framework::Jekyll, probes::jekyll),
    Probe::structural(Framework::Hugo, probes::hugo),
    Probe::structural(Framework::Doxygen, probes::doxygen),
    Probe::structural(Framework::OpenApi, probes::openapi),
    Probe::structural(Framework::JsDoc, probes::jsdoc),
    Probe::structural(Framework::AsciiDoc, probes::asciidoc),
    Probe::structural(Framework::Jupyter, probes::jupyter),
    Probe::structural(Framework::ApiBlueprint, probes::apiblueprint),
    Probe::structural(Framework::Javadoc, probes::javadoc),
    Probe::structural(Framework::Rustdoc, probes::rustdoc),
    Probe::structural(Framework::GoDoc, probes::godoc),
    Probe::content(Framework::ApiBlueprint, probes::apiblueprint_content),
    Probe::content(Framework::Jupyter, probes::jupyter_content),
    Probe::content(Framework::Javadoc, probes::javadoc_content),
    Probe::content(Framework::Doxygen, probes::doxygen_content),
    Probe::content(Framework::JsDoc, probes::jsdoc_content),
    Probe::content(Framework::AsciiDoc, probes::asciidoc_content),
    Probe::content(Framework::RestructuredText, probes::restructuredtext_content),
    Probe::content(Framework::Markdown, probes::markdown_content),
];

const COMMON_ENTRY_FILES: &[&str] = &["README.md", "README.rst", "index.md", "index.rst"];

/// Classifies the repository at `root`.
pub fn detect(root: &Path) -> Result<Framework, DocsError> {
    if !root.exists() {
        warn!(path = %root.display(), "Repository path does not exist");
        return Err(DocsError::PathNotFound(root.to_path_buf()));
    }
    if let Some(hit) = PROBES.iter().find(|p| p.matches(root)) {
        info!(framework = %hit.framework, signal = ?hit.signal, "Detected framework");
        return Ok(hit.framework);
    }
    if let Some(entry) = COMMON_ENTRY_FILES.iter().find(|f| root.join(f).is_file()) {
        info!(entry = %entry, "Detected common documentation entry file");
        return Ok(Framework::Common);
    }
    warn!(path = %root.display(), "No known documentation framework detected");
    Ok(Framework::Unknown)
}

/// Whether any probe registered for `framework` matches `root`.
pub fn probe(framework: Framework, root: &Path) -> bool {
    let hit = PROBES
        .iter()
        .filter(|p| p.framework == framework)
        .any(|p| p.matches(root));
    debug!(framework = %framework, matched = hit, "Probe evaluated");
    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_probes_precede_content_probes() {
        let first_content = PROBES
            .iter()
            .position(|p| p.signal == Signal::Content)
            .unwrap();
        assert!(PROBES[first_content..]
            .iter()
            .all(|p| p.signal == Signal::Content));
        assert_eq!(PROBES.last().map(|p| p.framework), Some(Framework::Markdown));
    }

    #[test]
    fn every_framework_has_a_probe() {
        for framework in Framework::ALL {
            assert!(
                PROBES.iter().any(|p| p.framework == framework),
                "no probe for {framework}"
            );
        }
    }
}
