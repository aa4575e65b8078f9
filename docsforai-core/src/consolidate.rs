//! Consolidation: many document records in, one navigable Markdown bundle out.
//!
//! Layout of the bundle:
//! 1. a header with the package name, version and author metadata
//! 2. a table of contents grouped by `doc_type`
//! 3. one `# <Type> Documentation` section per group, one `## <filename>` per record
//! 4. the changelog, when enabled and present

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glob::Pattern;
use tracing::{debug, info, warn};

use crate::config::{ConsolidationConfig, Metadata};
use crate::record::DocumentRecord;

const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";
const RULE: &str = "\n---\n\n";

/// Name and version printed at the top of the bundle.
#[derive(Debug, Clone, Copy)]
pub struct PackageInfo<'a> {
    pub name: &'a str,
    pub version: Option<&'a str>,
}

enum Exclusion {
    Substring(String),
    Glob(Pattern),
}

impl Exclusion {
    fn parse(raw: &str) -> Self {
        if raw.contains(['*', '?', '[']) {
            match Pattern::new(raw) {
                Ok(p) => return Exclusion::Glob(p),
                Err(e) => warn!(pattern = raw, error = %e, "Invalid glob, matching as substring"),
            }
        }
        Exclusion::Substring(raw.to_string())
    }

    fn matches(&self, filename: &str) -> bool {
        match self {
            Exclusion::Substring(s) => filename.contains(s.as_str()),
            Exclusion::Glob(p) => p.matches(filename),
        }
    }
}

/// `api_reference` -> `Api Reference`.
fn type_heading(doc_type: &str) -> String {
    doc_type
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// GitHub-style heading anchor.
fn slug(heading: &str) -> String {
    heading
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

/// Hands out anchors the way renderers do: repeats get `-1`, `-2`, ...
#[derive(Default)]
struct Anchors(HashMap<String, usize>);

impl Anchors {
    fn next(&mut self, heading: &str) -> String {
        let base = slug(heading);
        let seen = self.0.entry(base.clone()).or_insert(0);
        let anchor = if *seen == 0 {
            base
        } else {
            format!("{base}-{seen}")
        };
        *seen += 1;
        anchor
    }
}

/// Groups records by `doc_type`: `custom_order` types first, the rest in first-seen order.
fn grouped<'r>(
    records: &[&'r DocumentRecord],
    custom_order: &[String],
) -> Vec<(String, Vec<&'r DocumentRecord>)> {
    let mut groups: Vec<(String, Vec<&DocumentRecord>)> = Vec::new();
    for &record in records {
        match groups.iter_mut().find(|(t, _)| *t == record.doc_type) {
            Some((_, members)) => members.push(record),
            None => groups.push((record.doc_type.clone(), vec![record])),
        }
    }
    let rank = |doc_type: &str| {
        custom_order
            .iter()
            .position(|t| t == doc_type)
            .unwrap_or(custom_order.len())
    };
    // Stable sort keeps first-seen order within the unranked tail.
    groups.sort_by_key(|(t, _)| rank(t.as_str()));
    groups
}

fn header(package: &PackageInfo<'_>, metadata: &Metadata) -> String {
    let or_na = |s: &str| if s.trim().is_empty() { "N/A".to_string() } else { s.to_string() };
    let mut out = format!("# {}\n\n", package.name);
    out.push_str(&format!("Version: {}\n", or_na(package.version.unwrap_or(""))));
    out.push_str(&format!("Author: {}\n", or_na(&metadata.author)));
    for (label, value) in [
        ("Description", &metadata.description),
        ("License", &metadata.license),
        ("Website", &metadata.website),
        ("Repository", &metadata.repository),
    ] {
        if !value.trim().is_empty() {
            out.push_str(&format!("{label}: {value}\n"));
        }
    }
    out.push_str(RULE);
    out
}

fn changelog(config: &ConsolidationConfig, repo_root: &Path) -> Option<String> {
    if !config.include_changelog {
        return None;
    }
    let relative = config
        .changelog_path
        .as_deref()
        .unwrap_or(Path::new(DEFAULT_CHANGELOG));
    let path = repo_root.join(relative);
    match fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Changelog not readable, omitting it");
            None
        }
    }
}

/// Renders `records` as one Markdown document. A relative changelog path is
/// resolved against `repo_root`.
pub fn consolidate(
    records: &[DocumentRecord],
    package: &PackageInfo<'_>,
    config: &ConsolidationConfig,
    metadata: &Metadata,
    repo_root: &Path,
) -> String {
    info!(records = records.len(), package = package.name, "Consolidating documentation");

    let exclusions: Vec<Exclusion> = config.exclude_patterns.iter().map(|p| Exclusion::parse(p)).collect();
    let kept: Vec<&DocumentRecord> = records
        .iter()
        .filter(|r| {
            let excluded = exclusions.iter().any(|x| x.matches(&r.filename));
            if excluded {
                debug!(filename = %r.filename, "Excluded by pattern");
            }
            !excluded
        })
        .collect();
    let groups = grouped(&kept, &config.custom_order);

    // Anchors are assigned in document order so the TOC matches the headings below.
    // Every TOC group heading precedes the first section heading.
    let headings: Vec<String> = groups.iter().map(|(doc_type, _)| type_heading(doc_type)).collect();
    let mut anchors = Anchors::default();
    anchors.next(package.name);
    anchors.next("Table of Contents");
    for heading in &headings {
        anchors.next(heading);
    }
    let mut sections = String::new();
    let mut toc = String::from("## Table of Contents\n\n");
    for ((_, members), heading) in groups.iter().zip(&headings) {
        toc.push_str(&format!("### {heading}\n\n"));
        let section_heading = format!("{heading} Documentation");
        anchors.next(&section_heading);
        sections.push_str(&format!("# {section_heading}\n\n"));
        for record in members {
            let anchor = anchors.next(&record.filename);
            let label = record.title.as_deref().unwrap_or(&record.filename);
            toc.push_str(&format!("- [{label}](#{anchor})\n"));
            sections.push_str(&format!("## {}\n\n", record.filename));
            sections.push_str(record.content.trim_end());
            sections.push('\n');
            sections.push_str(RULE);
        }
        toc.push('\n');
    }

    let mut out = header(package, metadata);
    out.push_str(&toc);
    out.push_str(RULE);
    out.push_str(&sections);
    if let Some(text) = changelog(config, repo_root) {
        out.push_str("# Changelog\n\n");
        out.push_str(text.trim_end());
        out.push('\n');
        out.push_str(RULE);
    }

    info!(
        kept = kept.len(),
        excluded = records.len() - kept.len(),
        groups = groups.len(),
        "Consolidation complete"
    );
    out
}
