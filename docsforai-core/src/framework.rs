//! Framework identifiers.
//!
//! The set of supported documentation ecosystems is closed: adding one means a
//! new [`Framework`] variant, an adapter entry in [`crate::registry`] and an
//! ordered probe in [`crate::detect`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    ApiBlueprint,
    AsciiDoc,
    Docsify,
    Docusaurus,
    Doxygen,
    GitBook,
    GoDoc,
    Hugo,
    Javadoc,
    Jekyll,
    JsDoc,
    Jupyter,
    Markdown,
    MkDocs,
    OpenApi,
    ReadTheDocs,
    RestructuredText,
    Rustdoc,
    Sphinx,
    VuePress,
    /// Fallback for repositories with only README/index files.
    Common,
    /// Nothing recognisable was found.
    Unknown,
}

impl Framework {
    /// Every concrete framework, excluding the `Common`/`Unknown` sentinels.
    pub const ALL: [Framework; 20] = [
        Framework::ApiBlueprint,
        Framework::AsciiDoc,
        Framework::Docsify,
        Framework::Docusaurus,
        Framework::Doxygen,
        Framework::GitBook,
        Framework::GoDoc,
        Framework::Hugo,
        Framework::Javadoc,
        Framework::Jekyll,
        Framework::JsDoc,
        Framework::Jupyter,
        Framework::Markdown,
        Framework::MkDocs,
        Framework::OpenApi,
        Framework::ReadTheDocs,
        Framework::RestructuredText,
        Framework::Rustdoc,
        Framework::Sphinx,
        Framework::VuePress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::ApiBlueprint => "apiblueprint",
            Framework::AsciiDoc => "asciidoc",
            Framework::Docsify => "docsify",
            Framework::Docusaurus => "docusaurus",
            Framework::Doxygen => "doxygen",
            Framework::GitBook => "gitbook",
            Framework::GoDoc => "godoc",
            Framework::Hugo => "hugo",
            Framework::Javadoc => "javadoc",
            Framework::Jekyll => "jekyll",
            Framework::JsDoc => "jsdoc",
            Framework::Jupyter => "jupyter",
            Framework::Markdown => "markdown",
            Framework::MkDocs => "mkdocs",
            Framework::OpenApi => "openapi",
            Framework::ReadTheDocs => "readthedocs",
            Framework::RestructuredText => "restructuredtext",
            Framework::Rustdoc => "rustdoc",
            Framework::Sphinx => "sphinx",
            Framework::VuePress => "vuepress",
            Framework::Common => "common",
            Framework::Unknown => "unknown",
        }
    }

    /// `doc_type` for a derived record, e.g. `mkdocs_nav`.
    pub fn sub_kind(&self, suffix: &str) -> String {
        format!("{}_{}", self.as_str(), suffix)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Framework::ALL
            .iter()
            .chain([Framework::Common, Framework::Unknown].iter())
            .find(|f| f.as_str() == wanted)
            .copied()
            .ok_or_else(|| DocsError::UnsupportedFramework(s.to_string()))
    }
}

/// Caller's framework hint: detect automatically or force one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkChoice {
    Auto,
    Explicit(Framework),
}

impl FromStr for FrameworkChoice {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(FrameworkChoice::Auto);
        }
        s.parse().map(FrameworkChoice::Explicit)
    }
}

impl fmt::Display for FrameworkChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameworkChoice::Auto => f.write_str("auto"),
            FrameworkChoice::Explicit(fw) => fw.fmt(f),
        }
    }
}
