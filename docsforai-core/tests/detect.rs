mod common;

use common::repo;
use docsforai_core::detect::{detect, probe};
use docsforai_core::{DocsError, Framework};

/// One repository per framework that carries only that framework's markers.
fn markers(framework: Framework) -> Vec<(&'static str, &'static str)> {
    match framework {
        Framework::Docusaurus => vec![("docusaurus.config.js", "module.exports = {};\n")],
        Framework::VuePress => vec![(".vuepress/config.js", "module.exports = {}\n")],
        Framework::MkDocs => vec![("mkdocs.yml", "site_name: Demo\n")],
        Framework::Sphinx => vec![("conf.py", "project = 'demo'\n")],
        Framework::ReadTheDocs => vec![(".readthedocs.yaml", "version: 2\n")],
        Framework::GitBook => vec![("book.json", "{}")],
        Framework::Docsify => vec![("index.html", "<script>window.$docsify = {}</script>")],
        Framework::Jekyll => vec![("_config.yml", "title: Demo\n")],
        Framework::Hugo => vec![("hugo.toml", "title = 'Demo'\n")],
        Framework::Doxygen => vec![("Doxyfile", "PROJECT_NAME = demo\n")],
        Framework::OpenApi => vec![("openapi.yaml", "openapi: 3.0.0\npaths: {}\n")],
        Framework::JsDoc => vec![("jsdoc.json", "{}")],
        Framework::AsciiDoc => vec![("guide.adoc", "= Guide\n")],
        Framework::Jupyter => vec![("analysis.ipynb", common::NOTEBOOK)],
        Framework::ApiBlueprint => vec![("api.apib", "FORMAT: 1A\n")],
        Framework::Javadoc => vec![("src/Demo.java", "/** Demo. */\nclass Demo {}\n")],
        Framework::Rustdoc => vec![("Cargo.toml", "[package]\nname = \"demo\"\n")],
        Framework::GoDoc => vec![("go.mod", "module example.com/demo\n")],
        Framework::RestructuredText => vec![("guide.rst", "Guide\n=====\n")],
        Framework::Markdown => vec![("docs/guide.md", "# Guide\n")],
        Framework::Common | Framework::Unknown => vec![],
    }
}

#[test]
fn each_framework_is_detected_from_its_markers() {
    for framework in Framework::ALL {
        let dir = repo(&markers(framework));
        assert_eq!(detect(dir.path()).unwrap(), framework, "markers for {framework}");
        assert!(probe(framework, dir.path()), "probe for {framework}");
    }
}

#[test]
fn probes_do_not_match_an_empty_directory() {
    let dir = repo(&[]);
    for framework in Framework::ALL {
        assert!(!probe(framework, dir.path()), "{framework} matched nothing");
    }
    assert_eq!(detect(dir.path()).unwrap(), Framework::Unknown);
}

#[test]
fn structural_markers_win_over_content() {
    let dir = repo(&[
        ("mkdocs.yml", "site_name: Demo\n"),
        ("docs/guide.md", "# Guide\n"),
        ("docs/api.rst", "API\n===\n"),
    ]);
    assert_eq!(detect(dir.path()).unwrap(), Framework::MkDocs);

    let dir = repo(&[
        ("docusaurus.config.js", "module.exports = {};\n"),
        ("mkdocs.yml", "site_name: Demo\n"),
    ]);
    assert_eq!(detect(dir.path()).unwrap(), Framework::Docusaurus);

    let dir = repo(&[
        ("Cargo.toml", "[package]\nname = \"demo\"\n"),
        ("go.mod", "module example.com/demo\n"),
    ]);
    assert_eq!(detect(dir.path()).unwrap(), Framework::Rustdoc);
}

#[test]
fn readme_only_repository_is_common() {
    let dir = repo(&[("README.md", "# Project\n\nHello.\n")]);
    assert_eq!(detect(dir.path()).unwrap(), Framework::Common);
}

#[test]
fn detection_leaves_the_repository_untouched() {
    let dir = repo(&markers(Framework::Jupyter));
    let before = common::snapshot(dir.path());
    detect(dir.path()).unwrap();
    assert_eq!(common::snapshot(dir.path()), before);
}

#[test]
fn missing_path_is_reported() {
    let dir = repo(&[]);
    let gone = dir.path().join("nope");
    assert!(matches!(detect(&gone), Err(DocsError::PathNotFound(p)) if p == gone));
}
