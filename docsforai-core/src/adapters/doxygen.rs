//! Doxygen: Markdown/`.dox` pages plus one record per compound from the XML index.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::support::{
    find_files, missing, native_pass, read_required, rel_path, run_build_step, safe_file_stem,
    ScopedPath,
};
use super::{Adapter, ParseContext};
use crate::convert::comments::block_doc_comments;
use crate::convert::xml::{self, Element};
use crate::convert::ConversionFailure;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};
use crate::tool::ToolInvocation;

const DOXYFILE_NAMES: &[&str] = &[
    "Doxyfile",
    "doxyfile",
    "doxygen.conf",
    ".doxygen",
    "docs/Doxyfile",
];
const OUTPUT_DIR: &str = "doxygen_output";
const TEMP_DOXYFILE: &str = ".docsforai.Doxyfile";

pub struct DoxygenAdapter;

/// Doxygen honours the last assignment of a key, so overrides are appended.
fn forced_doxyfile(original: &str) -> String {
    format!(
        "{original}\n\nOUTPUT_DIRECTORY = {OUTPUT_DIR}\nGENERATE_XML = YES\nGENERATE_HTML = NO\nGENERATE_LATEX = NO\nQUIET = YES\n"
    )
}

fn dox_page(path: &Path, source: &str) -> Result<String, ConversionFailure> {
    let is_dox = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("dox"));
    if !is_dox {
        return Ok(source.to_string());
    }
    let text: Vec<String> = block_doc_comments(source)
        .into_iter()
        .map(|c| c.text)
        .filter(|t| !t.is_empty())
        .collect();
    if text.is_empty() {
        return Err(ConversionFailure("no documentation block".to_string()));
    }
    Ok(text.join("\n\n"))
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders one `<compounddef>` as Markdown.
fn render_compound(def: &Element, kind: &str, fallback_name: &str) -> String {
    let name = def
        .child_text("compoundname")
        .unwrap_or_else(|| fallback_name.to_string());
    let mut out = format!("# {}: {name}\n", capitalise(kind));
    for part in ["briefdescription", "detaileddescription"] {
        if let Some(text) = def.child_text(part) {
            out.push_str(&format!("\n{text}\n"));
        }
    }
    for section in def.children_named("sectiondef") {
        let heading = section.attr("kind").unwrap_or("members").replace(['-', '_'], " ");
        out.push_str(&format!("\n## {}\n", capitalise(&heading)));
        for member in section.children_named("memberdef") {
            let signature = [
                member.child_text("type"),
                member.child_text("name"),
                member.child_text("argsstring"),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
            out.push_str(&format!("\n### `{signature}`\n"));
            for part in ["briefdescription", "detaileddescription"] {
                if let Some(text) = member.child_text(part) {
                    out.push_str(&format!("\n{text}\n"));
                }
            }
        }
    }
    out
}

fn malformed(reason: impl Into<String>) -> DocsError {
    DocsError::MalformedToolOutput {
        framework: Framework::Doxygen,
        tool: "doxygen".to_string(),
        reason: reason.into(),
    }
}

fn parse_xml_file(path: &Path) -> Result<Element, DocsError> {
    let text = read_required(path)?;
    xml::parse(&text).map_err(|e| malformed(format!("{}: {e}", path.display())))
}

/// One `doxygen_<kind>` record per compound listed in `xml/index.xml`.
fn capture_compounds(docs_path: &Path, xml_dir: &Path) -> Result<ParseOutcome, DocsError> {
    let index_path = xml_dir.join("index.xml");
    if !index_path.is_file() {
        return Err(malformed("xml/index.xml was not generated"));
    }
    let index = parse_xml_file(&index_path)?;
    let mut out = ParseOutcome::default();
    for compound in index.children_named("compound") {
        let (Some(kind), Some(refid)) = (compound.attr("kind"), compound.attr("refid")) else {
            debug!("Compound without kind or refid");
            continue;
        };
        let name = compound.child_text("name").unwrap_or_else(|| refid.to_string());
        let compound_path = xml_dir.join(format!("{refid}.xml"));
        if !compound_path.is_file() {
            out.skip(rel_path(docs_path, &compound_path), "compound file missing");
            continue;
        }
        let root = parse_xml_file(&compound_path)?;
        let Some(def) = root.child("compounddef") else {
            out.skip(rel_path(docs_path, &compound_path), "no compounddef element");
            continue;
        };
        let content = render_compound(def, kind, &name);
        out.push(
            DocumentRecord::new(
                Framework::Doxygen.sub_kind(kind),
                format!("{kind}_{}.md", safe_file_stem(&name)),
                content,
            )
            .with_title(name)
            .with_meta("refid", refid),
        );
    }
    info!(compounds = out.records.len(), "Parsed Doxygen XML index");
    Ok(out)
}

impl Adapter for DoxygenAdapter {
    fn framework(&self) -> Framework {
        Framework::Doxygen
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::Doxygen;
        // `.doxygen` is sometimes a directory, so only regular files count.
        let doxyfile = DOXYFILE_NAMES
            .iter()
            .map(|name| docs_path.join(name))
            .find(|p| p.is_file())
            .ok_or_else(|| missing(fw, DOXYFILE_NAMES.join(" or ")))?;
        info!(doxyfile = %doxyfile.display(), "Parsing Doxygen documentation");

        let files = find_files(docs_path, &["md", "dox"], &[OUTPUT_DIR]);
        let mut outcome = native_pass(fw, docs_path, &files, ctx, dox_page);

        let original = fs::read_to_string(&doxyfile).map_err(|e| DocsError::io(&doxyfile, e))?;
        let output = ScopedPath::claim(docs_path.join(OUTPUT_DIR));
        let temp = ScopedPath::file(docs_path.join(TEMP_DOXYFILE), &forced_doxyfile(&original))?;

        let build = ToolInvocation::new("doxygen", docs_path).path_arg(temp.path());
        run_build_step(fw, ctx, build, "doxygen_args")?;

        outcome.extend(capture_compounds(docs_path, &output.path().join("xml"))?);
        Ok(outcome)
    }
}
