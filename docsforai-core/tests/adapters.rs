mod common;

use common::{adapter_fixture, fake_runner, repo, snapshot};
use docsforai_core::adapters::ParseContext;
use docsforai_core::convert::Html2MdConverter;
use docsforai_core::detect::probe;
use docsforai_core::options::BuildOptions;
use docsforai_core::tool::{MockToolRunner, ToolOutput};
use docsforai_core::{parse_documentation, DocsError, Framework, FrameworkChoice, ParseOutcome};

fn all_adapters() -> impl Iterator<Item = Framework> {
    Framework::ALL.into_iter().chain([Framework::Common])
}

fn parse_with(
    root: &std::path::Path,
    choice: FrameworkChoice,
    runner: &MockToolRunner,
) -> Result<ParseOutcome, DocsError> {
    let options = BuildOptions::new();
    let ctx = ParseContext::new(&options, runner, &Html2MdConverter);
    parse_documentation(root, choice, &ctx)
}

#[test]
fn every_adapter_emits_records_and_cleans_up() {
    let runner = fake_runner();
    for framework in all_adapters() {
        let dir = repo(&adapter_fixture(framework));
        let before = snapshot(dir.path());

        let outcome = parse_with(dir.path(), FrameworkChoice::Explicit(framework), &runner)
            .unwrap_or_else(|e| panic!("{framework}: {e}"));

        assert!(!outcome.records.is_empty(), "{framework} emitted no records");
        for record in &outcome.records {
            assert!(!record.filename.starts_with('/'), "{framework}: {}", record.filename);
            assert!(!record.filename.contains('\\'), "{framework}: {}", record.filename);
        }
        assert_eq!(snapshot(dir.path()), before, "{framework} left files behind");
    }
}

#[test]
fn parsing_twice_gives_the_same_records() {
    let runner = fake_runner();
    for framework in all_adapters() {
        let dir = repo(&adapter_fixture(framework));
        let first = parse_with(dir.path(), FrameworkChoice::Explicit(framework), &runner).unwrap();
        let second = parse_with(dir.path(), FrameworkChoice::Explicit(framework), &runner).unwrap();
        assert_eq!(first, second, "{framework} is not repeatable");
    }
}

#[test]
fn mkdocs_follows_nav_order_and_labels() {
    let dir = repo(&[
        (
            "mkdocs.yml",
            "site_name: Demo\nnav:\n  - Home: index.md\n  - Guide:\n      - Intro: guide/intro.md\n      - Missing: guide/missing.md\n",
        ),
        ("docs/index.md", "# Welcome\n"),
        ("docs/guide/intro.md", "# Getting started\n"),
    ]);
    let outcome = parse_with(
        dir.path(),
        FrameworkChoice::Explicit(Framework::MkDocs),
        &fake_runner(),
    )
    .unwrap();

    let pages: Vec<_> = outcome
        .records
        .iter()
        .filter(|r| r.doc_type == "mkdocs")
        .collect();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].filename, "index.md");
    assert_eq!(pages[0].title.as_deref(), Some("Home"));
    assert_eq!(pages[1].filename, "guide/intro.md");
    assert_eq!(pages[1].title.as_deref(), Some("Intro"));
    assert_eq!(
        pages[1].metadata.get("nav_section").map(String::as_str),
        Some("Guide")
    );

    assert!(outcome.records.iter().any(|r| r.filename == "mkdocs.yml"));
    assert!(outcome.skipped.iter().any(|s| s.path == "guide/missing.md"));
}

#[test]
fn auto_detection_picks_the_adapter() {
    let dir = repo(&adapter_fixture(Framework::MkDocs));
    let outcome = parse_with(dir.path(), FrameworkChoice::Auto, &fake_runner()).unwrap();
    assert!(outcome.records.iter().all(|r| r.doc_type.starts_with("mkdocs")));
}

#[test]
fn failed_build_discards_output_and_cleans_up() {
    let dir = repo(&adapter_fixture(Framework::MkDocs));
    let mut runner = MockToolRunner::new();
    runner.expect_run().times(1).returning(|inv| {
        std::fs::create_dir_all(inv.cwd.join("site")).unwrap();
        Ok(ToolOutput::failed(1, "boom"))
    });

    let err = parse_with(dir.path(), FrameworkChoice::Explicit(Framework::MkDocs), &runner)
        .unwrap_err();

    assert!(matches!(
        err,
        DocsError::ExternalToolFailure { framework: Framework::MkDocs, code: Some(1), .. }
    ));
    assert!(!dir.path().join("site").exists());
}

#[test]
fn missing_marker_fails_before_any_tool_runs() {
    let dir = repo(&[("docs/index.md", "# Home\n")]);
    let mut runner = MockToolRunner::new();
    runner.expect_run().never();

    let err = parse_with(dir.path(), FrameworkChoice::Explicit(Framework::Sphinx), &runner)
        .unwrap_err();
    assert!(matches!(
        err,
        DocsError::RequiredFileMissing { framework: Framework::Sphinx, .. }
    ));
}

#[test]
fn unsupported_framework_is_rejected_before_the_path_is_checked() {
    let err = parse_with(
        std::path::Path::new("/no/such/docs"),
        FrameworkChoice::Explicit(Framework::Unknown),
        &MockToolRunner::new(),
    )
    .unwrap_err();
    assert!(matches!(err, DocsError::UnsupportedFramework(_)));
}

#[test]
fn corrupt_notebook_is_skipped() {
    let dir = repo(&[
        ("a.ipynb", common::NOTEBOOK),
        ("b.ipynb", "{ this is not json"),
        ("c.ipynb", common::NOTEBOOK),
    ]);
    let outcome = parse_with(
        dir.path(),
        FrameworkChoice::Explicit(Framework::Jupyter),
        &MockToolRunner::new(),
    )
    .unwrap();

    assert_eq!(outcome.filenames(), vec!["a.md", "c.md"]);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].path, "b.ipynb");
    assert_eq!(outcome.records[0].title.as_deref(), Some("Analysis"));
}

#[test]
fn doxygen_compounds_become_records() {
    let dir = repo(&adapter_fixture(Framework::Doxygen));
    let outcome = parse_with(
        dir.path(),
        FrameworkChoice::Explicit(Framework::Doxygen),
        &fake_runner(),
    )
    .unwrap();
    let class = outcome
        .records
        .iter()
        .find(|r| r.doc_type == "doxygen_class")
        .expect("class record");
    assert!(class.content.contains("Widget"));
    assert!(class.content.contains("A widget."));
}

fn assert_invalid_config(files: &[(&str, &str)], framework: Framework, expected_file: &str) {
    let dir = repo(files);
    let mut runner = MockToolRunner::new();
    runner.expect_run().never();

    let err = parse_with(dir.path(), FrameworkChoice::Explicit(framework), &runner).unwrap_err();
    match err {
        DocsError::InvalidConfigFormat { framework: fw, file, .. } => {
            assert_eq!(fw, framework);
            assert_eq!(file, expected_file);
        }
        other => panic!("{framework}: expected InvalidConfigFormat, got {other:?}"),
    }
}

#[test]
fn malformed_docusaurus_sidebar_aborts_before_the_build() {
    assert_invalid_config(
        &[
            ("docusaurus.config.js", "module.exports = { title: 'Demo' };\n"),
            ("sidebars.json", "{ \"docs\": [\"intro\""),
            ("docs/intro.md", "# Intro\n"),
        ],
        Framework::Docusaurus,
        "sidebars.json",
    );
}

#[test]
fn malformed_mkdocs_config_aborts_before_the_build() {
    assert_invalid_config(
        &[("mkdocs.yml", "site_name: Demo\nnav: 5\n"), ("docs/index.md", "# Home\n")],
        Framework::MkDocs,
        "mkdocs.yml",
    );
    assert_invalid_config(
        &[("mkdocs.yml", "site_name: Demo\nnav: [unclosed\n"), ("docs/index.md", "# Home\n")],
        Framework::MkDocs,
        "mkdocs.yml",
    );
}

#[test]
fn malformed_gitbook_config_is_rejected() {
    assert_invalid_config(
        &[
            ("book.json", "{ not json"),
            ("README.md", "# Introduction\n"),
            ("SUMMARY.md", "# Summary\n"),
        ],
        Framework::GitBook,
        "book.json",
    );
}

#[test]
fn failed_install_discards_native_records_and_cleans_up() {
    let dir = repo(&adapter_fixture(Framework::Docusaurus));
    let before = snapshot(dir.path());
    let mut runner = MockToolRunner::new();
    runner.expect_run().times(1).returning(|inv| {
        assert_eq!(inv.program, "npm");
        assert_eq!(inv.args.first().map(String::as_str), Some("install"));
        std::fs::create_dir_all(inv.cwd.join("build")).unwrap();
        Ok(ToolOutput::failed(1, "npm ERR! network"))
    });

    let err = parse_with(dir.path(), FrameworkChoice::Explicit(Framework::Docusaurus), &runner)
        .unwrap_err();

    match err {
        DocsError::ExternalToolFailure { framework, tool, code } => {
            assert_eq!(framework, Framework::Docusaurus);
            assert_eq!(tool, "npm");
            assert_eq!(code, Some(1));
        }
        other => panic!("expected ExternalToolFailure, got {other:?}"),
    }
    assert!(!dir.path().join("build").exists());
    assert_eq!(snapshot(dir.path()), before);
}

#[test]
fn vuepress_sidebar_survives_comments() {
    let dir = repo(&[
        (
            ".vuepress/config.js",
            "module.exports = {\n  themeConfig: {\n    /* sidebar: ['/old/'], */\n    sidebar: [\n      '/guide/', // main guide\n      /* '/legacy/',\n         dropped } */\n      '/api/',\n    ],\n  },\n}\n",
        ),
        ("README.md", "# Home\n"),
    ]);
    let outcome = parse_with(
        dir.path(),
        FrameworkChoice::Explicit(Framework::VuePress),
        &fake_runner(),
    )
    .unwrap();

    let sidebar = outcome
        .records
        .iter()
        .find(|r| r.doc_type == "vuepress_sidebar")
        .expect("sidebar record");
    let value: serde_json::Value = serde_json::from_str(&sidebar.content).unwrap();
    assert_eq!(value, serde_json::json!(["/guide/", "/api/"]));
}

#[test]
fn blueprints_with_the_same_name_render_separately() {
    let dir = repo(&[
        ("v1/api.apib", "FORMAT: 1A\n\n# Demo API v1\n"),
        ("v2/api.apib", "FORMAT: 1A\n\n# Demo API v2\n"),
    ]);
    let before = snapshot(dir.path());
    let outcome = parse_with(
        dir.path(),
        FrameworkChoice::Explicit(Framework::ApiBlueprint),
        &fake_runner(),
    )
    .unwrap();

    let built: Vec<&str> = outcome
        .records
        .iter()
        .filter(|r| r.doc_type == "apiblueprint_built")
        .map(|r| r.filename.as_str())
        .collect();
    assert!(built.contains(&"aglio_output/v1/api.html"), "{built:?}");
    assert!(built.contains(&"aglio_output/v2/api.html"), "{built:?}");
    assert_eq!(snapshot(dir.path()), before);
}

/// Repositories that only carry a secondary marker the detector accepts.
fn secondary_markers() -> Vec<(Framework, Vec<(&'static str, &'static str)>)> {
    vec![
        (
            Framework::GitBook,
            vec![
                ("SUMMARY.md", "# Summary\n\n* [Introduction](README.md)\n"),
                ("README.md", "# Introduction\n"),
            ],
        ),
        (
            Framework::GitBook,
            vec![("docs/book.json", "{}"), ("docs/README.md", "# Introduction\n")],
        ),
        (
            Framework::Docsify,
            vec![
                ("docs/index.html", "<script>window.$docsify = { name: 'demo' }</script>"),
                ("docs/README.md", "# Home\n"),
            ],
        ),
        (
            Framework::Docsify,
            vec![("docsify.json", "{\"name\": \"demo\"}"), ("README.md", "# Home\n")],
        ),
        (Framework::Doxygen, vec![("doxygen.conf", "PROJECT_NAME = demo\n")]),
        (Framework::Doxygen, vec![(".doxygen", "PROJECT_NAME = demo\n")]),
        (Framework::Doxygen, vec![("docs/Doxyfile", "PROJECT_NAME = demo\n")]),
    ]
}

#[test]
fn detected_markers_are_accepted_by_the_adapter() {
    let runner = fake_runner();
    for (framework, files) in secondary_markers() {
        let dir = repo(&files);
        let names: Vec<&str> = files.iter().map(|(name, _)| *name).collect();
        assert!(probe(framework, dir.path()), "{framework} probe rejects {names:?}");

        let outcome = parse_with(dir.path(), FrameworkChoice::Explicit(framework), &runner)
            .unwrap_or_else(|e| panic!("{framework} adapter rejects {names:?}: {e}"));
        assert!(!outcome.records.is_empty(), "{framework}: {names:?}");
    }
}

#[test]
fn dependency_only_signal_still_needs_project_files() {
    // package.json hints at the framework but leaves nothing to parse.
    for (framework, dependency) in [(Framework::GitBook, "gitbook-cli"), (Framework::Docsify, "docsify-cli")] {
        let package = format!("{{\"devDependencies\": {{\"{dependency}\": \"^4.0.0\"}}}}");
        let dir = repo(&[("package.json", package.as_str())]);
        assert!(probe(framework, dir.path()), "{framework}");

        let err = parse_with(dir.path(), FrameworkChoice::Explicit(framework), &MockToolRunner::new())
            .unwrap_err();
        assert!(
            matches!(err, DocsError::RequiredFileMissing { framework: fw, .. } if fw == framework),
            "{framework}: {err:?}"
        );
    }
}
