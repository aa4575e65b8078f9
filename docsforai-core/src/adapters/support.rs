//! Helpers shared by the adapters: file discovery, native-pass reading,
//! scoped build directories and build-output capture.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use super::ParseContext;
use crate::convert::{first_heading, html_title};
use crate::error::{ConversionFailure, DocsError};
use crate::framework::Framework;
use crate::record::{DocumentRecord, ParseOutcome};
use crate::tool::{run_tool, ToolInvocation, ToolOutput};

/// Directory names never descended into.
pub(crate) const ALWAYS_SKIPPED: &[&str] = &[".git", "node_modules"];

/// Forward-slash path of `path` relative to `root`.
pub(crate) fn rel_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_skipped_dir(entry: &DirEntry, exclude: &[&str]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    ALWAYS_SKIPPED.contains(&name.as_ref()) || exclude.contains(&name.as_ref())
}

fn has_extension(path: &Path, exts: &[&str]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|e| exts.contains(&e.as_str()))
}

/// Files under `root` with one of `exts` (no leading dot), sorted, skipping
/// `.git`, `node_modules` and any directory named in `exclude`.
pub(crate) fn find_files(root: &Path, exts: &[&str], exclude: &[&str]) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e, exclude))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), exts))
        .map(DirEntry::into_path)
        .collect()
}

pub(crate) fn first_existing(root: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|c| root.join(c))
        .find(|p| p.exists())
}

/// First existing candidate, or `RequiredFileMissing` naming all of them.
pub(crate) fn require(
    framework: Framework,
    root: &Path,
    candidates: &[&str],
) -> Result<PathBuf, DocsError> {
    first_existing(root, candidates).ok_or_else(|| missing(framework, candidates.join(" or ")))
}

pub(crate) fn missing(framework: Framework, artifact: impl Into<String>) -> DocsError {
    let artifact = artifact.into();
    warn!(framework = %framework, artifact = %artifact, "Required file missing");
    DocsError::RequiredFileMissing {
        framework,
        artifact,
    }
}

pub(crate) fn invalid_config(
    framework: Framework,
    root: &Path,
    file: &Path,
    reason: impl ToString,
) -> DocsError {
    let file = rel_path(root, file);
    let reason = reason.to_string();
    warn!(framework = %framework, file = %file, reason = %reason, "Invalid config format");
    DocsError::InvalidConfigFormat {
        framework,
        file,
        reason,
    }
}

/// Reads a structural file that must be readable.
pub(crate) fn read_required(path: &Path) -> Result<String, DocsError> {
    fs::read_to_string(path).map_err(|e| DocsError::io(path, e))
}

/// Parses JSON, YAML or TOML (by extension) into a JSON value.
pub(crate) fn parse_structured(
    framework: Framework,
    root: &Path,
    path: &Path,
) -> Result<Value, DocsError> {
    let text = read_required(path)?;
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let parsed = match ext.as_str() {
        "json" => serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()),
        "toml" => toml::from_str::<Value>(&text).map_err(|e| e.to_string()),
        _ => crate::yaml::from_str_lenient(&text).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| invalid_config(framework, root, path, reason))
}

pub(crate) fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Title from YAML front matter, falling back to the first `# ` heading.
pub(crate) fn markdown_title(content: &str) -> Option<String> {
    let front = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"));
    if let Some(rest) = front {
        if let Some(end) = rest.find("\n---") {
            let title = rest[..end]
                .lines()
                .filter_map(|l| l.strip_prefix("title:"))
                .map(|t| t.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
                .find(|t| !t.is_empty());
            if title.is_some() {
                return title;
            }
        }
    }
    first_heading(content)
}

/// Finds `marker` in JavaScript source and returns the balanced `{...}` or `[...]`
/// literal that follows it, with comments removed. String literals are respected,
/// and a marker inside a comment does not count.
pub(crate) fn js_literal_after(source: &str, marker: &str) -> Option<String> {
    let source = strip_js_comments(source);
    let start = source.find(marker)? + marker.len();
    let rest = &source[start..];
    let open_at = rest.find(|c: char| !c.is_whitespace() && c != '=' && c != ':')?;
    let body = &rest[open_at..];
    if !body.starts_with(['{', '[']) {
        return None;
    }
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(body[..i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Interprets a JavaScript object/array literal as data: strict JSON first,
/// then YAML flow syntax (unquoted keys, single quotes, trailing commas).
pub(crate) fn js_literal_to_value(literal: &str) -> Result<Value, String> {
    if let Ok(v) = serde_json::from_str::<Value>(literal) {
        return Ok(v);
    }
    crate::yaml::from_str_lenient(&strip_js_comments(literal)).map_err(|e| e.to_string())
}

/// Drops `//` and `/* */` comments that sit outside string literals.
/// A `//` right after `:` is an unquoted URL scheme, not a comment.
fn strip_js_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            prev = Some(c);
            continue;
        }
        match (c, chars.peek().copied()) {
            ('/', Some('/')) if prev != Some(':') => {
                while chars.next_if(|n| *n != '\n').is_some() {}
            }
            ('/', Some('*')) => {
                chars.next();
                let mut last = None;
                for n in chars.by_ref() {
                    if last == Some('*') && n == '/' {
                        break;
                    }
                    // keep line numbers stable for parser errors
                    if n == '\n' {
                        out.push('\n');
                    }
                    last = Some(n);
                }
                out.push(' ');
            }
            _ => {
                if matches!(c, '"' | '\'' | '`') {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
        prev = Some(c);
    }
    out
}

/// Entity names (`ui::Widget<T>`, `module:foo~bar`) as a single path component.
pub(crate) fn safe_file_stem(name: &str) -> String {
    name.replace("::", "_")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Reads one native-pass file, recording a skip instead of failing.
pub(crate) fn load_source(
    ctx: &ParseContext<'_>,
    root: &Path,
    path: &Path,
    out: &mut ParseOutcome,
) -> Option<String> {
    let rel = rel_path(root, path);
    if let (Some(limit), Ok(meta)) = (ctx.max_file_size, fs::metadata(path)) {
        if meta.len() > limit {
            out.skip(rel, format!("larger than {limit} bytes"));
            return None;
        }
    }
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            out.skip(rel, format!("unreadable: {e}"));
            return None;
        }
    };
    let text = match String::from_utf8(bytes) {
        Ok(t) => t,
        Err(_) => {
            out.skip(rel, "not valid UTF-8");
            return None;
        }
    };
    if text.trim().is_empty() {
        out.skip(rel, "empty file");
        return None;
    }
    if text.contains('\0') {
        out.skip(rel, "binary content");
        return None;
    }
    Some(text)
}

/// One record per file: `doc_type` = framework name, filename relative to `root`.
pub(crate) fn native_pass<F>(
    framework: Framework,
    root: &Path,
    files: &[PathBuf],
    ctx: &ParseContext<'_>,
    mut convert: F,
) -> ParseOutcome
where
    F: FnMut(&Path, &str) -> Result<String, ConversionFailure>,
{
    let mut out = ParseOutcome::default();
    for path in files {
        let Some(source) = load_source(ctx, root, path, &mut out) else {
            continue;
        };
        let rel = rel_path(root, path);
        match convert(path, &source) {
            Ok(markdown) if !markdown.trim().is_empty() => {
                let mut record = DocumentRecord::new(framework.as_str(), rel, markdown);
                if let Some(title) = markdown_title(&record.content) {
                    record = record.with_title(title);
                }
                out.push(record);
            }
            Ok(_) => out.skip(rel, "no content after conversion"),
            Err(e) => out.skip(rel, e.to_string()),
        }
    }
    debug!(
        framework = %framework,
        records = out.records.len(),
        skipped = out.skipped.len(),
        "Native pass finished"
    );
    out
}

/// Identity conversion for files that are already Markdown.
pub(crate) fn as_is(_: &Path, source: &str) -> Result<String, ConversionFailure> {
    Ok(source.to_string())
}

/// A build directory or temporary file owned by one adapter call.
/// Removed when dropped, whether the call succeeded, failed or panicked.
#[derive(Debug)]
pub struct ScopedPath {
    path: PathBuf,
}

impl ScopedPath {
    /// Clears anything already at `path` and creates an empty directory there.
    pub fn dir(path: impl Into<PathBuf>) -> Result<Self, DocsError> {
        let path = path.into();
        remove_path(&path);
        fs::create_dir_all(&path).map_err(|e| DocsError::io(&path, e))?;
        debug!(path = %path.display(), "Created scoped directory");
        Ok(Self { path })
    }

    /// Claims `path` for a directory that the external tool will create itself.
    pub fn claim(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        remove_path(&path);
        Self { path }
    }

    /// Writes a temporary file.
    pub fn file(path: impl Into<PathBuf>, contents: &str) -> Result<Self, DocsError> {
        let path = path.into();
        fs::write(&path, contents).map_err(|e| DocsError::io(&path, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedPath {
    fn drop(&mut self) {
        remove_path(&self.path);
    }
}

fn remove_path(path: &Path) {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else if path.exists() {
        fs::remove_file(path)
    } else {
        return;
    };
    match result {
        Ok(()) => debug!(path = %path.display(), "Removed scoped path"),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove scoped path"),
    }
}

/// Runs one build step with base arguments plus the caller's extra arguments for `options_key`.
pub(crate) fn run_build_step(
    framework: Framework,
    ctx: &ParseContext<'_>,
    invocation: ToolInvocation,
    options_key: &str,
) -> Result<ToolOutput, DocsError> {
    let invocation = invocation.args(ctx.options.args(options_key));
    run_tool(ctx.runner, framework, &invocation)
}

/// Converts every HTML page under `build_dir` into a `<framework>_built` record.
/// Filenames are relative to `docs_root`, so they include the build directory name.
pub(crate) fn capture_html(
    framework: Framework,
    docs_root: &Path,
    build_dir: &Path,
    ctx: &ParseContext<'_>,
    exclude: &[&str],
) -> ParseOutcome {
    let mut out = ParseOutcome::default();
    if !build_dir.is_dir() {
        warn!(
            framework = %framework,
            path = %build_dir.display(),
            "Build finished but produced no output directory"
        );
        return out;
    }
    let doc_type = framework.sub_kind("built");
    for page in find_files(build_dir, &["html", "htm"], exclude) {
        let rel = rel_path(docs_root, &page);
        let html = match fs::read(&page) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                out.skip(rel, format!("unreadable: {e}"));
                continue;
            }
        };
        match ctx.converter.convert(&html) {
            Ok(markdown) => {
                let mut record = DocumentRecord::new(doc_type.as_str(), rel, markdown)
                    .with_meta("origin", "build");
                if let Some(title) = html_title(&html) {
                    record = record.with_title(title);
                }
                out.push(record);
            }
            Err(e) => out.skip(rel, e.to_string()),
        }
    }
    info!(
        framework = %framework,
        pages = out.records.len(),
        skipped = out.skipped.len(),
        "Captured build output"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn find_files_is_sorted_and_skips_excluded_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for p in ["b.md", "a.md", "sub/c.MD", "node_modules/x.md", "_build/y.md", "z.txt"] {
            let path = root.join(p);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "# x").unwrap();
        }
        let found: Vec<String> = find_files(root, &["md"], &["_build"])
            .iter()
            .map(|p| rel_path(root, p))
            .collect();
        assert_eq!(found, vec!["a.md", "b.md", "sub/c.MD"]);
    }

    #[test]
    fn scoped_dir_is_removed_on_drop() {
        let dir = tempdir().unwrap();
        let build = dir.path().join("_site");
        {
            let guard = ScopedPath::dir(&build).unwrap();
            fs::write(guard.path().join("index.html"), "<p>x</p>").unwrap();
            assert!(build.exists());
        }
        assert!(!build.exists());
    }

    #[test]
    fn js_literal_extraction_balances_brackets_and_strings() {
        let js = "module.exports = {\n  title: 'Docs',\n  themeConfig: {\n    sidebar: [\n      '/',\n      ['/guide/', 'Guide ] tricky'], // comment ]\n    ],\n  },\n};";
        let lit = js_literal_after(js, "sidebar").unwrap();
        assert!(lit.starts_with('['));
        assert!(lit.ends_with(']'));
        let value = js_literal_to_value(&lit).unwrap();
        assert_eq!(value[0], "/");
        assert_eq!(value[1][1], "Guide ] tricky");
    }

    #[test]
    fn block_comments_inside_a_literal_are_ignored() {
        let js = "sidebar: [\n  /* keep } in sync */\n  '/guide/',\n  /* multi\n     line ] */ '/api/',\n]";
        let lit = js_literal_after(js, "sidebar:").unwrap();
        let value = js_literal_to_value(&lit).unwrap();
        assert_eq!(value, serde_json::json!(["/guide/", "/api/"]));
    }

    #[test]
    fn commented_out_marker_is_skipped() {
        let js = "/* sidebar: ['/old/'] */\n// sidebar: ['/older/']\nsidebar: ['/new/']";
        let lit = js_literal_after(js, "sidebar:").unwrap();
        assert_eq!(js_literal_to_value(&lit).unwrap(), serde_json::json!(["/new/"]));
    }

    #[test]
    fn trailing_comment_after_a_quoted_url_is_dropped() {
        let js = "nav: [\n  { text: 'Home', link: 'https://example.com/a' }, // external\n  { text: 'B', link: '/b' } // local\n]";
        let lit = js_literal_after(js, "nav:").unwrap();
        let value = js_literal_to_value(&lit).unwrap();
        assert_eq!(value[0]["link"], "https://example.com/a");
        assert_eq!(value[1]["link"], "/b");
        assert!(!lit.contains("external"));

        let stripped = strip_js_comments("base: https://example.com/docs // canonical host\n");
        assert_eq!(stripped, "base: https://example.com/docs \n");
    }

    #[test]
    fn comment_markers_inside_strings_are_kept() {
        let js = "x = { a: 'one // two', b: \"/* not a comment */\" }";
        let lit = js_literal_after(js, "x").unwrap();
        let value = js_literal_to_value(&lit).unwrap();
        assert_eq!(value["a"], "one // two");
        assert_eq!(value["b"], "/* not a comment */");
    }

    #[test]
    fn entity_names_become_single_path_components() {
        assert_eq!(safe_file_stem("ui::Widget<T>"), "ui_Widget_T_");
        assert_eq!(safe_file_stem("module:a/b~c"), "module_a_b_c");
    }

    #[test]
    fn title_prefers_front_matter() {
        assert_eq!(
            markdown_title("---\ntitle: \"Getting Started\"\n---\n# Other\n").as_deref(),
            Some("Getting Started")
        );
        assert_eq!(markdown_title("# Heading\ntext").as_deref(), Some("Heading"));
        assert_eq!(markdown_title("plain"), None);
    }
}
