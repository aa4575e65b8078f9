//! Line-oriented reStructuredText and AsciiDoc → Markdown conversion.
//!
//! These cover the constructs that carry meaning in prose documentation
//! (headings, code blocks, admonitions, links, lists). Anything unrecognised
//! is passed through as text.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConversionFailure;

// reStructuredText

static RST_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`<]+?)\s*<([^`>]+)>`_{1,2}").unwrap());
static RST_ROLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[a-zA-Z:+-]+:`([^`]+)`").unwrap());
static RST_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"``([^`]+)``").unwrap());
static RST_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\.\s+([a-zA-Z0-9_:-]+)::\s*(.*)$").unwrap());

const RST_ADORNMENT: &str = "=-~^\"'`#*+:._";

fn is_adornment(line: &str) -> Option<char> {
    let line = line.trim_end();
    let first = line.chars().next()?;
    if line.len() < 2 || !RST_ADORNMENT.contains(first) {
        return None;
    }
    line.chars().all(|c| c == first).then_some(first)
}

fn rst_inline(text: &str) -> String {
    let text = RST_LINK.replace_all(text, "[$1]($2)");
    let text = RST_ROLE.replace_all(&text, "`$1`");
    RST_LITERAL.replace_all(&text, "`$1`").into_owned()
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Collects the indented body following line `start`; returns (body lines, next index).
fn indented_block(lines: &[&str], start: usize) -> (Vec<String>, usize) {
    let mut i = start;
    let mut body: Vec<&str> = Vec::new();
    while i < lines.len() && (lines[i].trim().is_empty() || indent_of(lines[i]) > 0) {
        body.push(lines[i]);
        i += 1;
    }
    while body.last().is_some_and(|l| l.trim().is_empty()) {
        body.pop();
    }
    let strip = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);
    let body = body
        .iter()
        .map(|l| l.get(strip..).unwrap_or("").to_string())
        .skip_while(|l| l.trim().is_empty())
        .collect();
    (body, i)
}

pub fn rst_to_markdown(source: &str) -> Result<String, ConversionFailure> {
    if source.contains('\0') {
        return Err(ConversionFailure("binary content".into()));
    }
    let lines: Vec<&str> = source.lines().collect();
    let mut levels: Vec<(char, bool)> = Vec::new();
    let mut out: Vec<String> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        // Overlined title: ===== / Title / =====
        if let (Some(over), Some(title), Some(under)) =
            (is_adornment(line), lines.get(i + 1), lines.get(i + 2))
        {
            if !title.trim().is_empty() && is_adornment(under) == Some(over) {
                let level = heading_level(&mut levels, (over, true));
                out.push(format!("{} {}", "#".repeat(level), rst_inline(title.trim())));
                i += 3;
                continue;
            }
        }

        // Underlined title
        if let Some(under) = lines.get(i + 1).and_then(|l| is_adornment(l)) {
            let text = line.trim();
            if !text.is_empty()
                && indent_of(line) == 0
                && is_adornment(line).is_none()
                && lines[i + 1].trim_end().chars().count() >= text.chars().count()
            {
                let level = heading_level(&mut levels, (under, false));
                out.push(format!("{} {}", "#".repeat(level), rst_inline(text)));
                i += 2;
                continue;
            }
        }

        if let Some(caps) = RST_DIRECTIVE.captures(line) {
            let name = caps[1].to_ascii_lowercase();
            let argument = caps[2].trim().to_string();
            let (body, next) = indented_block(&lines, i + 1);
            let body: Vec<String> = body
                .into_iter()
                .skip_while(|l| l.trim_start().starts_with(':'))
                .collect();
            match name.as_str() {
                "code-block" | "code" | "sourcecode" | "literalinclude" => {
                    out.push(format!("```{argument}"));
                    out.extend(body);
                    out.push("```".into());
                }
                "note" | "warning" | "tip" | "important" | "caution" | "danger" | "hint"
                | "attention" | "seealso" | "admonition" | "deprecated" | "versionadded"
                | "versionchanged" => {
                    let label = capitalize(&name);
                    let mut first = true;
                    let inline = (!argument.is_empty()).then_some(argument);
                    for text in inline.into_iter().chain(body.into_iter()) {
                        if first {
                            out.push(format!("> **{label}:** {}", rst_inline(&text)));
                            first = false;
                        } else {
                            out.push(format!("> {}", rst_inline(&text)));
                        }
                    }
                    if first {
                        out.push(format!("> **{label}**"));
                    }
                }
                "image" | "figure" => out.push(format!("![]({argument})")),
                _ => {}
            }
            out.push(String::new());
            i = next;
            continue;
        }

        // Comments and link targets
        if line.starts_with("..") {
            let (_, next) = indented_block(&lines, i + 1);
            i = next;
            continue;
        }

        // Paragraph ending in `::` introduces a literal block
        if line.trim_end().ends_with("::") && indent_of(line) == 0 {
            let text = line.trim_end();
            let text = if text.trim() == "::" {
                String::new()
            } else {
                format!("{}:", text.trim_end_matches(':'))
            };
            if !text.is_empty() {
                out.push(rst_inline(&text));
            }
            let (body, next) = indented_block(&lines, i + 1);
            if !body.is_empty() {
                out.push(String::new());
                out.push("```".into());
                out.extend(body);
                out.push("```".into());
                out.push(String::new());
            }
            i = next;
            continue;
        }

        out.push(rst_inline(line));
        i += 1;
    }

    finish(out)
}

fn heading_level(levels: &mut Vec<(char, bool)>, style: (char, bool)) -> usize {
    let level = match levels.iter().position(|s| *s == style) {
        Some(pos) => pos + 1,
        None => {
            levels.push(style);
            levels.len()
        }
    };
    level.min(6)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn finish(out: Vec<String>) -> Result<String, ConversionFailure> {
    let mut text = out.join("\n");
    while text.contains("\n\n\n") {
        text = text.replace("\n\n\n", "\n\n");
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(ConversionFailure("no text content".into()));
    }
    Ok(format!("{text}\n"))
}

// AsciiDoc

static ADOC_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:link:)?((?:https?|ftp|mailto):[^\s\[]+|[^\s\[]+\.html?)\[([^\]]*)\]").unwrap()
});
static ADOC_XREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<([^,>]+),\s*([^>]+)>>|xref:([^\[]+)\[([^\]]*)\]").unwrap());
static ADOC_BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[\s(])\*([^*\s][^*]*?)\*($|[\s).,;:!?])").unwrap());
static ADOC_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[\s(])_([^_\s][^_]*?)_($|[\s).,;:!?])").unwrap());
static ADOC_ADMONITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(NOTE|TIP|IMPORTANT|WARNING|CAUTION):\s+(.*)$").unwrap());
static ADOC_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:!?[a-zA-Z0-9_-]+!?:").unwrap());

fn adoc_inline(text: &str) -> String {
    let text = ADOC_LINK.replace_all(text, |c: &regex::Captures<'_>| {
        let label = if c[2].is_empty() { &c[1] } else { &c[2] };
        format!("[{label}]({})", &c[1])
    });
    let text = ADOC_XREF.replace_all(&text, |c: &regex::Captures<'_>| match (c.get(1), c.get(3)) {
        (Some(target), _) => format!("[{}](#{})", c[2].trim(), target.as_str().trim()),
        (None, Some(target)) => {
            let label = c.get(4).map(|m| m.as_str()).filter(|l| !l.is_empty());
            format!("[{}]({})", label.unwrap_or(target.as_str()), target.as_str())
        }
        _ => c[0].to_string(),
    });
    let text = ADOC_BOLD.replace_all(&text, "$1**$2**$3");
    ADOC_ITALIC.replace_all(&text, "$1*$2*$3").into_owned()
}

pub fn asciidoc_to_markdown(source: &str) -> Result<String, ConversionFailure> {
    if source.contains('\0') {
        return Err(ConversionFailure("binary content".into()));
    }
    let mut out: Vec<String> = Vec::new();
    let mut pending_lang: Option<String> = None;
    let mut delimiter: Option<&str> = None;
    let mut in_comment = false;

    for line in source.lines() {
        let trimmed = line.trim_end();

        if in_comment {
            if trimmed == "////" {
                in_comment = false;
            }
            continue;
        }
        if let Some(delim) = delimiter {
            if trimmed == delim {
                out.push("```".into());
                delimiter = None;
            } else {
                out.push(line.to_string());
            }
            continue;
        }

        match trimmed {
            "////" => {
                in_comment = true;
                continue;
            }
            "----" | "...." => {
                let lang = pending_lang.take().unwrap_or_default();
                out.push(format!("```{lang}"));
                delimiter = Some(if trimmed == "----" { "----" } else { "...." });
                continue;
            }
            "====" | "****" | "____" | "--" => continue,
            _ => {}
        }

        if trimmed.starts_with("//")
            || trimmed.starts_with("include::")
            || trimmed.starts_with("ifdef::")
            || trimmed.starts_with("ifndef::")
            || trimmed.starts_with("endif::")
            || ADOC_ATTRIBUTE.is_match(trimmed)
        {
            continue;
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            let attrs = &trimmed[1..trimmed.len() - 1];
            let mut parts = attrs.split(',').map(str::trim);
            if matches!(parts.next(), Some("source") | Some("listing")) {
                pending_lang = Some(parts.next().unwrap_or("").to_string());
            }
            continue;
        }

        if let Some(rest) = heading(trimmed) {
            out.push(rest);
            continue;
        }

        if let Some(c) = ADOC_ADMONITION.captures(trimmed) {
            out.push(format!("> **{}:** {}", capitalize(&c[1].to_ascii_lowercase()), adoc_inline(&c[2])));
            continue;
        }

        if let Some(item) = list_item(trimmed) {
            out.push(item);
            continue;
        }

        if let Some(title) = trimmed.strip_prefix('.').filter(|t| {
            !t.is_empty() && !t.starts_with('.') && !t.starts_with(' ')
        }) {
            out.push(format!("**{}**", adoc_inline(title)));
            continue;
        }

        out.push(adoc_inline(trimmed));
    }

    if delimiter.is_some() {
        out.push("```".into());
    }
    finish(out)
}

fn heading(line: &str) -> Option<String> {
    let marks = line.chars().take_while(|c| *c == '=').count();
    if marks == 0 || marks > 6 {
        return None;
    }
    let rest = line[marks..].strip_prefix(' ')?;
    Some(format!("{} {}", "#".repeat(marks), adoc_inline(rest.trim())))
}

fn list_item(line: &str) -> Option<String> {
    for (marker, ordered) in [('*', false), ('-', false), ('.', true)] {
        let depth = line.chars().take_while(|c| *c == marker).count();
        if depth == 0 || (marker == '-' && depth > 1) {
            continue;
        }
        if let Some(text) = line[depth..].strip_prefix(' ') {
            let indent = "  ".repeat(depth.saturating_sub(1));
            let bullet = if ordered { "1." } else { "-" };
            return Some(format!("{indent}{bullet} {}", adoc_inline(text.trim())));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rst_headings_follow_first_seen_adornment_order() {
        let rst = "=====\nGuide\n=====\n\nIntro\n-----\n\nText with ``code`` and `link <https://x.io>`_.\n\nMore\n-----\n";
        let md = rst_to_markdown(rst).unwrap();
        assert_eq!(
            md,
            "# Guide\n\n## Intro\n\nText with `code` and [link](https://x.io).\n\n## More\n"
        );
    }

    #[test]
    fn rst_code_block_and_note() {
        let rst = "Usage\n=====\n\n.. code-block:: python\n\n   import x\n   x.run()\n\n.. note:: Be careful.\n\n.. toctree::\n   :maxdepth: 2\n\n   intro\n";
        let md = rst_to_markdown(rst).unwrap();
        assert!(md.contains("```python\nimport x\nx.run()\n```"));
        assert!(md.contains("> **Note:** Be careful."));
        assert!(!md.contains("maxdepth"));
        assert!(!md.contains("intro"));
    }

    #[test]
    fn rst_literal_block_after_double_colon() {
        let md = rst_to_markdown("Example::\n\n    $ make\n\nDone.\n").unwrap();
        assert_eq!(md, "Example:\n\n```\n$ make\n```\n\nDone.\n");
    }

    #[test]
    fn asciidoc_core_constructs() {
        let adoc = "= Manual\n:toc:\n\n== Install\n\nRun *this* with _care_.\n\n[source,bash]\n----\nmake install\n----\n\nNOTE: Requires root.\n\n* one\n** nested\n\nSee https://example.com[the site].\n";
        let md = asciidoc_to_markdown(adoc).unwrap();
        assert_eq!(
            md,
            "# Manual\n\n## Install\n\nRun **this** with *care*.\n\n```bash\nmake install\n```\n\n> **Note:** Requires root.\n\n- one\n  - nested\n\nSee [the site](https://example.com).\n"
        );
    }

    #[test]
    fn empty_input_is_a_failure() {
        assert!(asciidoc_to_markdown(":toc:\n// nothing\n").is_err());
        assert!(rst_to_markdown("\n\n").is_err());
    }
}
