#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use docsforai_core::framework::Framework;
use docsforai_core::tool::{MockToolRunner, ToolInvocation, ToolOutput};
use tempfile::TempDir;
use walkdir::WalkDir;

pub const PAGE: &str = "<html><head><title>Built page</title><script>var x = 1;</script></head>\
<body><h1>Built page</h1><p>Generated by the tool.</p></body></html>";

pub const DOCLETS: &str = r#"[
    {"kind": "function", "name": "add", "longname": "add", "description": "Adds.",
     "meta": {"filename": "add.js"}},
    {"kind": "package", "longname": "package:undefined"}
]"#;

pub const GO_DOC: &str = "package demo // import \"example.com/demo\"\n\nPackage demo does things.\n\nfunc Run() error\n";

const DOXYGEN_INDEX: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygenindex version="1.9.8">
  <compound refid="class_widget" kind="class"><name>Widget</name></compound>
</doxygenindex>"#;

const DOXYGEN_CLASS: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen version="1.9.8">
  <compounddef id="class_widget" kind="class">
    <compoundname>Widget</compoundname>
    <briefdescription><para>A widget.</para></briefdescription>
  </compounddef>
</doxygen>"#;

pub const NOTEBOOK: &str = r##"{
  "cells": [
    {"cell_type": "markdown", "source": ["# Analysis\n", "Some words."]},
    {"cell_type": "code", "source": "print(1)", "outputs": [{"output_type": "stream", "text": "1\n"}]}
  ],
  "metadata": {"kernelspec": {"language": "python"}},
  "nbformat": 4,
  "nbformat_minor": 5
}"##;

/// Creates a temporary repository containing `files`.
pub fn repo(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

/// Every path below `root`, relative and sorted.
pub fn snapshot(root: &Path) -> BTreeSet<String> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn arg_after<'a>(inv: &'a ToolInvocation, flag: &str) -> &'a str {
    let at = inv.args.iter().position(|a| a == flag).unwrap();
    &inv.args[at + 1]
}

fn page(path: PathBuf) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, PAGE).unwrap();
}

/// Behaves like the real generators just enough to leave output where the adapters look.
pub fn fake_tool(inv: &ToolInvocation) -> ToolOutput {
    let cwd = &inv.cwd;
    let first = inv.args.first().map(String::as_str);
    match inv.program.as_str() {
        "mkdocs" => page(PathBuf::from(arg_after(inv, "-d")).join("index.html")),
        "npm" if first == Some("run") => page(cwd.join("build").join("index.html")),
        "npx" => page(
            PathBuf::from(inv.args.last().unwrap())
                .join(".vuepress")
                .join("dist")
                .join("index.html"),
        ),
        "hugo" => page(cwd.join(arg_after(inv, "--destination")).join("index.html")),
        "bundle" if first == Some("exec") => page(cwd.join(arg_after(inv, "-d")).join("index.html")),
        "sphinx-build" => page(PathBuf::from(&inv.args[3]).join("index.html")),
        "javadoc" => page(cwd.join(arg_after(inv, "-d")).join("index.html")),
        "aglio" => page(cwd.join(arg_after(inv, "-o"))),
        "asciidoctor" => page(cwd.join(arg_after(inv, "-D")).join("guide.html")),
        "cargo" => page(
            cwd.join(arg_after(inv, "--target-dir"))
                .join("doc")
                .join("demo")
                .join("struct.Widget.html"),
        ),
        "doxygen" => {
            let xml = cwd.join("doxygen_output").join("xml");
            fs::create_dir_all(&xml).unwrap();
            fs::write(xml.join("index.xml"), DOXYGEN_INDEX).unwrap();
            fs::write(xml.join("class_widget.xml"), DOXYGEN_CLASS).unwrap();
        }
        "jsdoc" => return ToolOutput::ok(DOCLETS),
        "go" => return ToolOutput::ok(GO_DOC),
        _ => {}
    }
    ToolOutput::ok("")
}

pub fn fake_runner() -> MockToolRunner {
    let mut runner = MockToolRunner::new();
    runner.expect_run().returning(|inv| Ok(fake_tool(inv)));
    runner
}

/// Smallest repository each adapter accepts.
pub fn adapter_fixture(framework: Framework) -> Vec<(&'static str, &'static str)> {
    match framework {
        Framework::ApiBlueprint => vec![("api.apib", "FORMAT: 1A\n\n# Demo API\n\n## Group Notes\n")],
        Framework::AsciiDoc => vec![("guide.adoc", "= Guide\n\n== Intro\n\nHello.\n")],
        Framework::Docsify => vec![
            ("index.html", "<script>window.$docsify = { name: 'demo' }</script>"),
            ("README.md", "# Home\n\nWelcome.\n"),
        ],
        Framework::Docusaurus => vec![
            ("docusaurus.config.js", "module.exports = { title: 'Demo' };\n"),
            ("docs/intro.md", "# Intro\n\nHello.\n"),
        ],
        Framework::Doxygen => vec![
            ("Doxyfile", "PROJECT_NAME = demo\nINPUT = src\n"),
            ("mainpage.md", "# Main page\n"),
        ],
        Framework::GitBook => vec![
            ("book.json", "{\"title\": \"Demo\"}"),
            ("README.md", "# Introduction\n"),
            ("SUMMARY.md", "# Summary\n\n* [Introduction](README.md)\n"),
        ],
        Framework::GoDoc => vec![
            ("go.mod", "module example.com/demo\n\ngo 1.22\n"),
            ("doc.go", "// Package demo does things.\npackage demo\n"),
        ],
        Framework::Hugo => vec![
            ("hugo.toml", "baseURL = 'https://example.org/'\ntitle = 'Demo'\n"),
            ("content/_index.md", "# Home\n"),
        ],
        Framework::Javadoc => vec![(
            "src/Demo.java",
            "/** Demo class. */\npublic class Demo {\n    /** Runs. @return zero */\n    public int run() { return 0; }\n}\n",
        )],
        Framework::Jekyll => vec![("_config.yml", "title: Demo\n"), ("index.md", "# Home\n")],
        Framework::JsDoc => vec![
            ("jsdoc.json", "{}"),
            ("src/add.js", "/**\n * Adds.\n * @param {number} a\n */\nfunction add(a) { return a; }\n"),
        ],
        Framework::Jupyter => vec![("analysis.ipynb", NOTEBOOK)],
        Framework::Markdown => vec![("guide.md", "# Guide\n\nText.\n")],
        Framework::MkDocs => vec![
            ("mkdocs.yml", "site_name: Demo\n"),
            ("docs/index.md", "# Home\n"),
        ],
        Framework::OpenApi => vec![(
            "openapi.yaml",
            "openapi: 3.0.0\ninfo:\n  title: Pets\n  version: '1.0'\npaths:\n  /pets:\n    get:\n      summary: List pets\n      responses:\n        '200':\n          description: ok\n",
        )],
        Framework::ReadTheDocs => vec![
            (".readthedocs.yaml", "version: 2\nmkdocs:\n  configuration: mkdocs.yml\n"),
            ("mkdocs.yml", "site_name: Demo\n"),
            ("docs/index.md", "# Home\n"),
        ],
        Framework::RestructuredText => vec![("guide.rst", "Guide\n=====\n\nHello *world*.\n")],
        Framework::Rustdoc => vec![
            ("Cargo.toml", "[package]\nname = \"demo\"\nversion = \"0.1.0\"\n"),
            ("src/lib.rs", "//! Demo crate.\n\npub struct Widget;\n"),
        ],
        Framework::Sphinx => vec![
            ("conf.py", "project = 'demo'\n"),
            ("index.rst", "Demo\n====\n\nHello.\n"),
        ],
        Framework::VuePress => vec![
            (".vuepress/config.js", "module.exports = { title: 'Demo' }\n"),
            ("README.md", "# Home\n"),
        ],
        Framework::Common => vec![("README.md", "# Project\n\nHello.\n")],
        Framework::Unknown => vec![],
    }
}
