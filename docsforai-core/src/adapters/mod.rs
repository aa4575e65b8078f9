//! Per-framework adapters.
//!
//! Every adapter implements [`Adapter::parse`] with the same contract:
//! 1. check the framework's mandatory marker (`RequiredFileMissing` before any process is spawned)
//! 2. native pass: one record per source file, per-file failures land in `skipped`
//! 3. structural records for navigation/config files (`InvalidConfigFormat` aborts)
//! 4. optional build pass through the [`ToolRunner`]; a failed build discards everything
//! 5. build artifacts are captured, then the build directory is removed on every exit path

pub mod apiblueprint;
pub mod asciidoc;
pub mod common;
pub mod docsify;
pub mod docusaurus;
pub mod doxygen;
pub mod gitbook;
pub mod godoc;
pub mod hugo;
pub mod javadoc;
pub mod jekyll;
pub mod jsdoc;
pub mod jupyter;
pub mod markdown;
pub mod mkdocs;
pub mod openapi;
pub mod readthedocs;
pub mod restructuredtext;
pub mod rustdoc;
pub mod sphinx;
mod support;
pub mod vuepress;

use std::path::Path;

use crate::convert::HtmlConverter;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::options::BuildOptions;
use crate::record::ParseOutcome;
use crate::tool::ToolRunner;

pub use support::ScopedPath;

/// Everything an adapter may use besides the filesystem.
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub options: &'a BuildOptions,
    pub runner: &'a dyn ToolRunner,
    pub converter: &'a dyn HtmlConverter,
    /// Native-pass files larger than this are skipped.
    pub max_file_size: Option<u64>,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        options: &'a BuildOptions,
        runner: &'a dyn ToolRunner,
        converter: &'a dyn HtmlConverter,
    ) -> Self {
        Self {
            options,
            runner,
            converter,
            max_file_size: None,
        }
    }

    pub fn with_max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }
}

/// The common parsing contract.
pub trait Adapter: Send + Sync {
    fn framework(&self) -> Framework;

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError>;
}
