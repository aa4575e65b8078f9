//! Read-only signal probes, one structural and/or one content probe per framework.
//!
//! Every probe fails open: unreadable files, undecodable bytes and malformed
//! JSON simply mean "no match".

use std::fs;
use std::path::Path;

use serde_json::Value;
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];
/// Top-level entry files belong to the common fallback, not to a framework.
const ENTRY_FILES: &[&str] = &["README.md", "README.rst", "index.md", "index.rst"];

fn exists_any(root: &Path, candidates: &[&str]) -> bool {
    candidates.iter().any(|c| root.join(c).exists())
}

fn contains_any(path: &Path, markers: &[&str]) -> bool {
    match fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            markers.iter().any(|m| text.contains(m))
        }
        Err(_) => false,
    }
}

/// The first candidate that exists decides, as with a config file lookup.
fn first_existing_contains(root: &Path, candidates: &[&str], markers: &[&str]) -> bool {
    candidates
        .iter()
        .map(|c| root.join(c))
        .find(|p| p.exists())
        .is_some_and(|p| contains_any(&p, markers))
}

fn package_dependencies(root: &Path) -> Vec<String> {
    let Ok(text) = fs::read_to_string(root.join("package.json")) else {
        return Vec::new();
    };
    let Ok(json) = serde_json::from_str::<Value>(&text) else {
        return Vec::new();
    };
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|k| json.get(k).and_then(Value::as_object))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

fn depends_on(root: &Path, needle: &str) -> bool {
    package_dependencies(root).iter().any(|d| d.contains(needle))
}

fn walk_skipping(entry: &DirEntry) -> bool {
    entry.depth() == 0
        || !(entry.file_type().is_dir()
            && SKIPPED_DIRS.contains(&entry.file_name().to_string_lossy().as_ref()))
}

/// Lazily walks `root` for files with one of `exts`, sorted by name.
fn files_with_ext<'a>(root: &Path, exts: &'a [&'a str]) -> impl Iterator<Item = DirEntry> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(walk_skipping)
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(move |e| {
            e.path()
                .extension()
                .map(|x| x.to_string_lossy().to_ascii_lowercase())
                .is_some_and(|x| exts.contains(&x.as_str()))
        })
}

fn any_file_contains(root: &Path, exts: &[&str], markers: &[&str]) -> bool {
    files_with_ext(root, exts).any(|e| contains_any(e.path(), markers))
}

fn is_entry_file(entry: &DirEntry) -> bool {
    entry.depth() == 1 && ENTRY_FILES.contains(&entry.file_name().to_string_lossy().as_ref())
}

fn requirements_mention(root: &Path, needle: &str) -> bool {
    ["requirements.txt", "dev-requirements.txt", "docs/requirements.txt"]
        .iter()
        .map(|f| root.join(f))
        .any(|p| p.is_file() && contains_any(&p, &[needle]))
}

fn workflows_mention(root: &Path, markers: &[&str]) -> bool {
    let base = glob::Pattern::escape(&root.join(".github").join("workflows").to_string_lossy());
    ["yml", "yaml"].iter().any(|ext| {
        glob::glob(&format!("{base}/*.{ext}"))
            .map(|paths| paths.filter_map(Result::ok).any(|p| contains_any(&p, markers)))
            .unwrap_or(false)
    })
}

// Structural probes

pub(crate) fn docusaurus(root: &Path) -> bool {
    exists_any(
        root,
        &["docusaurus.config.js", "docusaurus.config.ts", "docusaurus.config.mjs"],
    ) || first_existing_contains(
        root,
        &["siteConfig.js", "website/siteConfig.js"],
        &["docusaurus"],
    ) || depends_on(root, "docusaurus")
}

pub(crate) fn vuepress(root: &Path) -> bool {
    exists_any(root, &[".vuepress", "docs/.vuepress"]) || depends_on(root, "vuepress")
}

pub(crate) fn mkdocs(root: &Path) -> bool {
    exists_any(
        root,
        &["mkdocs.yml", "mkdocs.yaml", "docs/mkdocs.yml", "docs/mkdocs.yaml"],
    ) || requirements_mention(root, "mkdocs")
}

pub(crate) fn sphinx(root: &Path) -> bool {
    exists_any(
        root,
        &["conf.py", "source/conf.py", "docs/conf.py", "source/_templates"],
    ) || requirements_mention(root, "sphinx")
}

pub(crate) fn readthedocs(root: &Path) -> bool {
    exists_any(
        root,
        &[
            ".readthedocs.yaml",
            ".readthedocs.yml",
            "readthedocs.yaml",
            "readthedocs.yml",
            ".readthedocs/config.yaml",
        ],
    ) || workflows_mention(root, &["readthedocs", "Read the Docs"])
}

pub(crate) fn gitbook(root: &Path) -> bool {
    exists_any(root, &["book.json", ".gitbook.yaml", ".gitbook.yml", "docs/book.json"])
        || (exists_any(root, &["SUMMARY.md"]) && exists_any(root, &["README.md"]))
        || depends_on(root, "gitbook")
}

pub(crate) fn docsify(root: &Path) -> bool {
    ["index.html", "docs/index.html"]
        .iter()
        .map(|f| root.join(f))
        .any(|p| contains_any(&p, &["window.$docsify", "docsify"]))
        || exists_any(root, &[".docsifyrc", "docsify.json"])
        || depends_on(root, "docsify")
}

pub(crate) fn jekyll(root: &Path) -> bool {
    exists_any(
        root,
        &["_config.yml", "_config.yaml", "docs/_config.yml", "_layouts", "_posts"],
    ) || contains_any(&root.join("Gemfile"), &["jekyll"])
}

pub(crate) fn hugo(root: &Path) -> bool {
    exists_any(root, &["hugo.toml", "hugo.yaml", "hugo.json", "archetypes"])
        || first_existing_contains(
            root,
            &["config.toml", "config.yaml", "config.json"],
            &["baseURL", "baseurl", "hugo"],
        )
}

pub(crate) fn doxygen(root: &Path) -> bool {
    ["Doxyfile", "doxyfile", "doxygen.conf", ".doxygen", "docs/Doxyfile"]
        .iter()
        .any(|name| root.join(name).is_file())
}

pub(crate) fn openapi(root: &Path) -> bool {
    ["openapi", "swagger", "api"].iter().any(|stem| {
        let json = root.join(format!("{stem}.json"));
        let json_match = fs::read_to_string(&json)
            .ok()
            .and_then(|t| serde_json::from_str::<Value>(&t).ok())
            .is_some_and(|v| v.get("openapi").is_some() || v.get("swagger").is_some());
        json_match
            || ["yaml", "yml"].iter().any(|ext| {
                contains_any(
                    &root.join(format!("{stem}.{ext}")),
                    &["openapi:", "swagger:", "paths:"],
                )
            })
    })
}

pub(crate) fn jsdoc(root: &Path) -> bool {
    exists_any(root, &["jsdoc.json", ".jsdoc.json", "jsdoc.conf.json", ".jsdoc.conf.json"])
        || contains_any(&root.join("conf.json"), &["jsdoc"])
        || depends_on(root, "jsdoc")
}

pub(crate) fn asciidoc(root: &Path) -> bool {
    exists_any(
        root,
        &["asciidoctor.json", ".asciidoctor.json", "docs/asciidoctor.json"],
    ) || contains_any(&root.join("Gemfile"), &["asciidoctor"])
}

pub(crate) fn jupyter(root: &Path) -> bool {
    exists_any(
        root,
        &[".jupyter", "jupyter_notebook_config.py", "jupyter_notebook_config.json"],
    )
}

pub(crate) fn apiblueprint(root: &Path) -> bool {
    package_dependencies(root)
        .iter()
        .any(|d| matches!(d.as_str(), "aglio" | "apib2swagger" | "apiary-client"))
}

pub(crate) fn javadoc(root: &Path) -> bool {
    ["pom.xml", "build.gradle", "build.gradle.kts"]
        .iter()
        .any(|f| contains_any(&root.join(f), &["javadoc"]))
}

pub(crate) fn rustdoc(root: &Path) -> bool {
    root.join("Cargo.toml").is_file()
}

pub(crate) fn godoc(root: &Path) -> bool {
    root.join("go.mod").is_file()
}

// Content probes

pub(crate) fn apiblueprint_content(root: &Path) -> bool {
    any_file_contains(
        root,
        &["apib", "apiblueprint"],
        &["FORMAT: 1A", "# Group", "## Action"],
    )
}

pub(crate) fn jupyter_content(root: &Path) -> bool {
    files_with_ext(root, &["ipynb"]).any(|e| {
        fs::read_to_string(e.path())
            .ok()
            .and_then(|t| serde_json::from_str::<Value>(&t).ok())
            .is_some_and(|v| v.get("cells").is_some() && v.get("metadata").is_some())
    })
}

pub(crate) fn javadoc_content(root: &Path) -> bool {
    any_file_contains(
        root,
        &["java"],
        &["/**", "@param", "@return", "@throws", "@author", "@see"],
    )
}

pub(crate) fn doxygen_content(root: &Path) -> bool {
    any_file_contains(
        root,
        &["c", "h", "cpp", "hpp", "cc", "cxx"],
        &["/**", "///", "\\brief", "@brief", "@param", "@return"],
    )
}

pub(crate) fn jsdoc_content(root: &Path) -> bool {
    any_file_contains(
        root,
        &["js", "jsx", "ts", "tsx"],
        &["/**", "@param", "@returns", "@type", "@typedef", "@module"],
    )
}

pub(crate) fn asciidoc_content(root: &Path) -> bool {
    any_file_contains(
        root,
        &["adoc", "asciidoc", "asc"],
        &["= ", "== ", ":toc:", "ifdef::", "include::"],
    )
}

pub(crate) fn restructuredtext_content(root: &Path) -> bool {
    files_with_ext(root, &["rst"])
        .filter(|e| !is_entry_file(e))
        .any(|e| {
            contains_any(
                e.path(),
                &["===", "---", "^^^", ".. toctree::", ".. code-block::", ":ref:", ".. note::"],
            )
        })
}

pub(crate) fn markdown_content(root: &Path) -> bool {
    files_with_ext(root, &["md", "markdown"])
        .filter(|e| !is_entry_file(e))
        .any(|e| {
            contains_any(
                e.path(),
                &["# ", "```", "~~~", "- [ ]", "- [x]", "[TOC]", "|---"],
            )
        })
}
