//! Documentation comment extraction from source files.
//!
//! Handles `/** ... */` blocks (Java, JavaScript, TypeScript, C/C++), Rust inner
//! docs (`//!`) and Go package comments. Block tags such as `@param` are
//! rendered as a Markdown list.

use std::sync::LazyLock;

use regex::Regex;

static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@(?:code|literal|link|linkplain)\s+([^}]*)\}").unwrap());

/// One documentation comment and the declaration it precedes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    pub text: String,
    pub tags: Vec<(String, String)>,
    /// First non-empty source line after the comment.
    pub subject: Option<String>,
}

/// Extracts every `/** ... */` comment, in source order.
pub fn block_doc_comments(source: &str) -> Vec<DocComment> {
    let mut comments = Vec::new();
    let mut rest = source;
    while let Some(start) = rest.find("/**") {
        let after = &rest[start + 3..];
        // `/**/` is an empty ordinary comment.
        if after.starts_with('/') {
            rest = &after[1..];
            continue;
        }
        let Some(end) = after.find("*/") else {
            break;
        };
        let body = &after[..end];
        rest = &after[end + 2..];

        let subject = rest
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .filter(|l| !l.starts_with("/*") && !l.starts_with("//"))
            .map(|l| l.trim_end_matches('{').trim().to_string());

        let comment = parse_block(body, subject);
        if !comment.text.is_empty() || !comment.tags.is_empty() {
            comments.push(comment);
        }
    }
    comments
}

fn parse_block(body: &str, subject: Option<String>) -> DocComment {
    let mut text_lines: Vec<String> = Vec::new();
    let mut tags: Vec<(String, String)> = Vec::new();

    for raw in body.lines() {
        let line = raw.trim();
        let line = line.strip_prefix('*').unwrap_or(line);
        let line = line.strip_prefix(' ').unwrap_or(line).trim_end();
        let line = INLINE_TAG.replace_all(line, "`$1`");
        let blank = line.trim().is_empty();

        if let Some(tag) = line.strip_prefix('@') {
            let (name, value) = tag.split_once(char::is_whitespace).unwrap_or((tag, ""));
            tags.push((name.to_string(), value.trim().to_string()));
        } else if let Some((_, value)) = tags.last_mut().filter(|_| !blank) {
            value.push(' ');
            value.push_str(line.trim());
        } else {
            text_lines.push(line.to_string());
        }
    }

    while text_lines.first().is_some_and(|l| l.trim().is_empty()) {
        text_lines.remove(0);
    }
    while text_lines.last().is_some_and(|l| l.trim().is_empty()) {
        text_lines.pop();
    }
    DocComment {
        text: text_lines.join("\n"),
        tags,
        subject,
    }
}

/// Renders comments under a `## <subject>` heading each.
pub fn doc_comments_to_markdown(title: &str, comments: &[DocComment], fence: &str) -> String {
    let mut out = format!("# {title}\n");
    for comment in comments {
        out.push('\n');
        if let Some(subject) = &comment.subject {
            out.push_str(&format!("## `{subject}`\n\n"));
        }
        if !comment.text.is_empty() {
            out.push_str(&comment.text);
            out.push('\n');
        }
        if !comment.tags.is_empty() {
            out.push('\n');
            for (name, value) in &comment.tags {
                if name == "example" {
                    out.push_str(&format!("```{fence}\n{value}\n```\n"));
                } else if value.is_empty() {
                    out.push_str(&format!("- **{name}**\n"));
                } else {
                    out.push_str(&format!("- **{name}** {value}\n"));
                }
            }
        }
    }
    out
}

/// Module-level `//!` documentation at the top of a Rust source file.
pub fn rust_inner_docs(source: &str) -> Option<String> {
    let lines: Vec<&str> = source
        .lines()
        .map(str::trim_start)
        .skip_while(|l| l.is_empty() || l.starts_with("#!["))
        .take_while(|l| l.starts_with("//!") || l.is_empty() || l.starts_with("#!["))
        .filter_map(|l| l.strip_prefix("//!"))
        .map(|l| l.strip_prefix(' ').unwrap_or(l))
        .collect();
    let text = lines.join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// The `//` comment block immediately preceding the `package` clause of a Go file.
pub fn go_package_comment(source: &str) -> Option<String> {
    let mut block: Vec<&str> = Vec::new();
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("package ") {
            let text = block.join("\n");
            let text = text.trim();
            return (!text.is_empty()).then(|| text.to_string());
        }
        match trimmed.strip_prefix("//") {
            Some(c) if !c.starts_with("go:") && !c.starts_with(" +build") => {
                block.push(c.strip_prefix(' ').unwrap_or(c));
            }
            _ => block.clear(),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAVA: &str = r#"
package demo;

/**
 * Greets people.
 * Uses {@code System.out}.
 */
public class Greeter {
    /**
     * Says hello.
     *
     * @param name who to greet,
     *        never null
     * @return the greeting
     */
    public String greet(String name) {
        return "Hello " + name;
    }
}
"#;

    #[test]
    fn extracts_javadoc_blocks_with_tags_and_subjects() {
        let comments = block_doc_comments(JAVA);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "Greets people.\nUses `System.out`.");
        assert_eq!(comments[0].subject.as_deref(), Some("public class Greeter"));
        assert_eq!(comments[1].text, "Says hello.");
        assert_eq!(
            comments[1].tags,
            vec![
                ("param".to_string(), "name who to greet, never null".to_string()),
                ("return".to_string(), "the greeting".to_string()),
            ]
        );
        assert_eq!(
            comments[1].subject.as_deref(),
            Some("public String greet(String name)")
        );
    }

    #[test]
    fn renders_markdown_sections() {
        let md = doc_comments_to_markdown("Greeter.java", &block_doc_comments(JAVA), "java");
        assert!(md.starts_with("# Greeter.java\n"));
        assert!(md.contains("## `public class Greeter`\n\nGreets people."));
        assert!(md.contains("- **param** name who to greet, never null\n"));
    }

    #[test]
    fn rust_and_go_module_docs() {
        let rs = "#![allow(dead_code)]\n//! Parser utilities.\n//!\n//! Second paragraph.\n\nuse std::fmt;\n";
        assert_eq!(
            rust_inner_docs(rs).as_deref(),
            Some("Parser utilities.\n\nSecond paragraph.")
        );
        assert_eq!(rust_inner_docs("fn main() {}\n"), None);

        let go = "// Copyright x\n\n// Package server runs things.\n// It is small.\npackage server\n";
        assert_eq!(
            go_package_comment(go).as_deref(),
            Some("Package server runs things.\nIt is small.")
        );
    }
}
