//! JSDoc: `/** */` comments per source file plus one record per doclet from `jsdoc -X`.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use super::support::{
    find_files, first_existing, missing, native_pass, run_build_step, safe_file_stem,
};
use super::{Adapter, ParseContext};
use crate::convert::comments::{block_doc_comments, doc_comments_to_markdown};
use crate::convert::ConversionFailure;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};
use crate::tool::ToolInvocation;

const SOURCE_EXTS: &[&str] = &["js", "jsx", "mjs", "ts", "tsx"];
const CONFIG_NAMES: &[&str] = &["jsdoc.json", ".jsdoc.json", "jsdoc.conf.json"];
const EXCLUDED_DIRS: &[&str] = &["dist", "build", "coverage"];

pub struct JsDocAdapter;

fn js_source(path: &Path, source: &str) -> Result<String, ConversionFailure> {
    let comments = block_doc_comments(source);
    if comments.is_empty() {
        return Err(ConversionFailure("no documentation comments".to_string()));
    }
    let title = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(doc_comments_to_markdown(&title, &comments, "javascript"))
}

fn type_names(value: &Value) -> String {
    value
        .pointer("/type/names")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "any".to_string())
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

/// Renders one doclet as Markdown.
fn render_doclet(doclet: &Value, kind: &str, longname: &str) -> String {
    let mut out = format!("# {kind}: {longname}\n");
    if let Some(description) = str_field(doclet, "description").or_else(|| str_field(doclet, "classdesc")) {
        out.push_str(&format!("\n{}\n", description.trim()));
    }
    if let Some(params) = doclet.get("params").and_then(Value::as_array) {
        out.push_str("\n## Parameters\n\n");
        for param in params {
            let name = str_field(param, "name").unwrap_or("?");
            let description = str_field(param, "description").unwrap_or("");
            out.push_str(&format!("- `{name}` ({}) {description}\n", type_names(param)));
        }
    }
    if let Some(returns) = doclet.get("returns").and_then(Value::as_array) {
        out.push_str("\n## Returns\n\n");
        for ret in returns {
            let description = str_field(ret, "description").unwrap_or("");
            out.push_str(&format!("- ({}) {description}\n", type_names(ret)));
        }
    }
    if let Some(examples) = doclet.get("examples").and_then(Value::as_array) {
        out.push_str("\n## Examples\n");
        for example in examples.iter().filter_map(Value::as_str) {
            out.push_str(&format!("\n```javascript\n{example}\n```\n"));
        }
    }
    out
}

/// Turns the `jsdoc -X` doclet array into `jsdoc_<kind>` records.
fn doclet_records(stdout: &str) -> Result<ParseOutcome, DocsError> {
    let doclets: Vec<Value> =
        serde_json::from_str(stdout).map_err(|e| DocsError::MalformedToolOutput {
            framework: Framework::JsDoc,
            tool: "jsdoc".to_string(),
            reason: e.to_string(),
        })?;
    let mut out = ParseOutcome::default();
    for doclet in &doclets {
        let undocumented = doclet.get("undocumented").and_then(Value::as_bool) == Some(true);
        let (Some(kind), Some(longname)) = (str_field(doclet, "kind"), str_field(doclet, "longname"))
        else {
            continue;
        };
        if undocumented || kind == "package" {
            continue;
        }
        let mut record = DocumentRecord::new(
            Framework::JsDoc.sub_kind(kind),
            format!("{}.md", safe_file_stem(longname)),
            render_doclet(doclet, kind, longname),
        )
        .with_title(longname);
        if let Some(file) = doclet.pointer("/meta/filename").and_then(Value::as_str) {
            record = record.with_meta("source", file);
        }
        out.push(record);
    }
    debug!(doclets = doclets.len(), records = out.records.len(), "Parsed JSDoc doclets");
    Ok(out)
}

impl Adapter for JsDocAdapter {
    fn framework(&self) -> Framework {
        Framework::JsDoc
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::JsDoc;
        let sources = find_files(docs_path, SOURCE_EXTS, EXCLUDED_DIRS);
        if sources.is_empty() {
            return Err(missing(fw, "JavaScript or TypeScript sources"));
        }
        info!(sources = sources.len(), "Parsing JSDoc documentation");

        let mut outcome = native_pass(fw, docs_path, &sources, ctx, js_source);

        let mut build = ToolInvocation::new("jsdoc", docs_path).args(["-X", "-r", "."]);
        if let Some(config) = first_existing(docs_path, CONFIG_NAMES) {
            build = build.arg("-c").path_arg(&config);
        }
        let output = run_build_step(fw, ctx, build, "jsdoc_args")?;

        outcome.extend(doclet_records(&output.stdout)?);
        Ok(outcome)
    }
}
