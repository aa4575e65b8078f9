//! Go: Markdown and `doc.go` package comments, `go doc -all` package text.

use std::path::Path;

use tracing::info;

use super::support::{find_files, native_pass, require, run_build_step, safe_file_stem};
use super::{Adapter, ParseContext};
use crate::convert::comments::go_package_comment;
use crate::convert::ConversionFailure;
use crate::error::DocsError;
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};
use crate::tool::ToolInvocation;

pub struct GoDocAdapter;

fn go_source(path: &Path, source: &str) -> Result<String, ConversionFailure> {
    let is_go = path.extension().is_some_and(|e| e == "go");
    if !is_go {
        return Ok(source.to_string());
    }
    let comment = go_package_comment(source)
        .ok_or_else(|| ConversionFailure("no package comment".to_string()))?;
    let package = path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(format!("# Package {package}\n\n{comment}\n"))
}

/// Splits `go doc -all` output into one section per `package` clause.
fn package_records(stdout: &str) -> Result<ParseOutcome, DocsError> {
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("package ") {
            let name = rest.split_whitespace().next().unwrap_or(rest).to_string();
            sections.push((name, Vec::new()));
        } else if let Some((_, body)) = sections.last_mut() {
            body.push(line);
        }
    }
    if sections.is_empty() {
        return Err(DocsError::MalformedToolOutput {
            framework: Framework::GoDoc,
            tool: "go".to_string(),
            reason: "no package clause in `go doc` output".to_string(),
        });
    }
    let mut out = ParseOutcome::default();
    for (name, body) in sections {
        let content = format!("# Package {name}\n\n{}\n", body.join("\n").trim());
        out.push(
            DocumentRecord::new(
                Framework::GoDoc.sub_kind("package"),
                format!("go-doc/{}.md", safe_file_stem(&name)),
                content,
            )
            .with_title(name),
        );
    }
    Ok(out)
}

impl Adapter for GoDocAdapter {
    fn framework(&self) -> Framework {
        Framework::GoDoc
    }

    fn parse(&self, docs_path: &Path, ctx: &ParseContext<'_>) -> Result<ParseOutcome, DocsError> {
        let fw = Framework::GoDoc;
        let module = require(fw, docs_path, &["go.mod"])?;
        info!(module = %module.display(), "Parsing Go documentation");

        let files: Vec<_> = find_files(docs_path, &["md", "go"], &["vendor", "testdata"])
            .into_iter()
            .filter(|p| {
                let is_go = p.extension().is_some_and(|e| e == "go");
                !is_go || p.file_name().is_some_and(|n| n == "doc.go")
            })
            .collect();
        let mut outcome = native_pass(fw, docs_path, &files, ctx, go_source);

        let doc = ToolInvocation::new("go", docs_path).args(["doc", "-all"]);
        let output = run_build_step(fw, ctx, doc, "go_doc_args")?;
        outcome.extend(package_records(&output.stdout)?);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_doc_output_is_split_per_package() {
        let stdout = "package demo // import \"example.com/demo\"\n\nDemo does things.\n\nfunc Run() error\n";
        let out = package_records(stdout).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].filename, "go-doc/demo.md");
        assert!(out.records[0].content.contains("func Run() error"));
    }

    #[test]
    fn output_without_package_clause_is_malformed() {
        assert!(matches!(
            package_records("nothing here"),
            Err(DocsError::MalformedToolOutput { .. })
        ));
    }
}
