//! Framework → adapter table.

use tracing::warn;

use crate::adapters::apiblueprint::ApiBlueprintAdapter;
use crate::adapters::asciidoc::AsciiDocAdapter;
use crate::adapters::common::CommonAdapter;
use crate::adapters::docsify::DocsifyAdapter;
use crate::adapters::docusaurus::DocusaurusAdapter;
use crate::adapters::doxygen::DoxygenAdapter;
use crate::adapters::gitbook::GitBookAdapter;
use crate::adapters::godoc::GoDocAdapter;
use crate::adapters::hugo::HugoAdapter;
use crate::adapters::javadoc::JavadocAdapter;
use crate::adapters::jekyll::JekyllAdapter;
use crate::adapters::jsdoc::JsDocAdapter;
use crate::adapters::jupyter::JupyterAdapter;
use crate::adapters::markdown::MarkdownAdapter;
use crate::adapters::mkdocs::MkDocsAdapter;
use crate::adapters::openapi::OpenApiAdapter;
use crate::adapters::readthedocs::ReadTheDocsAdapter;
use crate::adapters::restructuredtext::RestructuredTextAdapter;
use crate::adapters::rustdoc::RustdocAdapter;
use crate::adapters::sphinx::SphinxAdapter;
use crate::adapters::vuepress::VuePressAdapter;
use crate::adapters::Adapter;
use crate::error::DocsError;
use crate::framework::Framework;

/// The adapter for `framework`. `Unknown` has none.
pub fn adapter_for(framework: Framework) -> Option<&'static dyn Adapter> {
    let adapter: &'static dyn Adapter = match framework {
        Framework::ApiBlueprint => &ApiBlueprintAdapter,
        Framework::AsciiDoc => &AsciiDocAdapter,
        Framework::Docsify => &DocsifyAdapter,
        Framework::Docusaurus => &DocusaurusAdapter,
        Framework::Doxygen => &DoxygenAdapter,
        Framework::GitBook => &GitBookAdapter,
        Framework::GoDoc => &GoDocAdapter,
        Framework::Hugo => &HugoAdapter,
        Framework::Javadoc => &JavadocAdapter,
        Framework::Jekyll => &JekyllAdapter,
        Framework::JsDoc => &JsDocAdapter,
        Framework::Jupyter => &JupyterAdapter,
        Framework::Markdown => &MarkdownAdapter,
        Framework::MkDocs => &MkDocsAdapter,
        Framework::OpenApi => &OpenApiAdapter,
        Framework::ReadTheDocs => &ReadTheDocsAdapter,
        Framework::RestructuredText => &RestructuredTextAdapter,
        Framework::Rustdoc => &RustdocAdapter,
        Framework::Sphinx => &SphinxAdapter,
        Framework::VuePress => &VuePressAdapter,
        Framework::Common => &CommonAdapter,
        Framework::Unknown => return None,
    };
    Some(adapter)
}

/// Resolves an identifier such as `"mkdocs"` to its adapter.
pub fn resolve(name: &str) -> Result<&'static dyn Adapter, DocsError> {
    let framework: Framework = name.parse()?;
    adapter_for(framework).ok_or_else(|| {
        warn!(framework = %name, "No adapter registered");
        DocsError::UnsupportedFramework(name.to_string())
    })
}
