//! Prebuilt documentation downloads from the GitHub contents API.
//!
//! The prebuilt repository holds one directory per package with one
//! `<version>.md` bundle per release.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::error::DocsError;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const PREBUILT_OWNER: &str = "0-hero";
pub const PREBUILT_REPO: &str = "docsforai-prebuilt";

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct FileContent {
    content: Option<String>,
}

pub struct PrebuiltDownloader {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

fn download_error(reason: impl Into<String>) -> DocsError {
    DocsError::Download {
        reason: reason.into(),
    }
}

/// Numeric components of a dotted version; `None` if any component is not a number.
fn version_key(version: &str) -> Option<Vec<u64>> {
    version.split('.').map(|part| part.parse().ok()).collect()
}

/// Highest `<version>.md` file in a package listing. Non-numeric names are ignored.
fn latest_version(entries: &[ContentEntry]) -> Option<String> {
    entries
        .iter()
        .filter(|e| e.kind == "file")
        .filter_map(|e| e.name.strip_suffix(".md"))
        .filter_map(|v| version_key(v).map(|key| (key, v)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, v)| v.to_string())
}

/// GitHub wraps base64 payloads at 60 columns.
fn decode_content(encoded: &str) -> Result<String, DocsError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| download_error(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|e| download_error(format!("content is not UTF-8: {e}")))
}

fn output_file(output_dir: &Path, package: &str, version: Option<&str>) -> PathBuf {
    match version {
        Some(v) => output_dir.join(format!("{package}_{v}.md")),
        None => output_dir.join(format!("{package}.md")),
    }
}

impl PrebuiltDownloader {
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            token,
        }
    }

    /// Public API, authenticated when `GITHUB_TOKEN` is set.
    pub fn new_from_env() -> Self {
        let token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        info!(token_set = token.is_some(), "Initialized PrebuiltDownloader from environment");
        Self::new(GITHUB_API_BASE, token)
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{PREBUILT_OWNER}/{PREBUILT_REPO}/contents/{path}",
            self.api_base.trim_end_matches('/')
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, DocsError> {
        debug!(url, "GitHub contents request");
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, "docsforai")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| {
            error!(error = ?e, url, "GitHub request failed");
            download_error(format!("request to {url} failed: {e}"))
        })?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(download_error(format!("not found: {url}")));
        }
        if !status.is_success() {
            error!(status = %status, url, "GitHub returned an error status");
            return Err(download_error(format!("GitHub returned {status} for {url}")));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| download_error(format!("unexpected response from {url}: {e}")))
    }

    async fn fetch_version(&self, package: &str, version: &str) -> Result<String, DocsError> {
        let url = self.contents_url(&format!("{package}/{version}.md"));
        let file: FileContent = self.get_json(&url).await?;
        let encoded = file
            .content
            .ok_or_else(|| download_error(format!("version {version} not found for {package}")))?;
        decode_content(&encoded)
    }

    async fn resolve_latest(&self, package: &str) -> Result<String, DocsError> {
        let url = self.contents_url(package);
        let entries: Vec<ContentEntry> = self.get_json(&url).await?;
        latest_version(&entries)
            .ok_or_else(|| download_error(format!("no documentation found for {package}")))
    }

    /// Writes the bundle for `package` (latest version unless `version` is set)
    /// into `output_dir` and returns its path.
    pub async fn download(
        &self,
        package: &str,
        version: Option<&str>,
        output_dir: &Path,
    ) -> Result<PathBuf, DocsError> {
        info!(package, version = version.unwrap_or("latest"), "Downloading prebuilt documentation");
        let content = match version {
            Some(v) => self.fetch_version(package, v).await?,
            None => {
                let latest = self.resolve_latest(package).await?;
                info!(package, latest = %latest, "Resolved latest version");
                self.fetch_version(package, &latest).await?
            }
        };

        fs::create_dir_all(output_dir).map_err(|e| DocsError::io(output_dir, e))?;
        let path = output_file(output_dir, package, version);
        fs::write(&path, content).map_err(|e| DocsError::io(&path, e))?;
        info!(path = %path.display(), "Documentation saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: &str) -> ContentEntry {
        ContentEntry {
            name: name.into(),
            kind: kind.into(),
        }
    }

    #[test]
    fn latest_uses_numeric_ordering() {
        let entries = vec![
            entry("1.9.0.md", "file"),
            entry("1.10.0.md", "file"),
            entry("2.0.md", "dir"),
            entry("nightly.md", "file"),
            entry("README", "file"),
        ];
        assert_eq!(latest_version(&entries).as_deref(), Some("1.10.0"));
        assert_eq!(latest_version(&[entry("notes.md", "file")]), None);
    }

    #[test]
    fn shorter_version_sorts_before_its_extension() {
        let a = version_key("1.2").unwrap();
        let b = version_key("1.2.1").unwrap();
        assert!(a < b);
    }

    #[test]
    fn wrapped_base64_decodes() {
        assert_eq!(decode_content("IyBEZW1v\nCg==\n").unwrap(), "# Demo\n");
        assert!(matches!(decode_content("!!!"), Err(DocsError::Download { .. })));
    }

    #[test]
    fn versioned_output_names() {
        let dir = Path::new("out");
        assert_eq!(output_file(dir, "requests", Some("2.31.0")), dir.join("requests_2.31.0.md"));
        assert_eq!(output_file(dir, "requests", None), dir.join("requests.md"));
    }

    #[test]
    fn contents_url_joins_cleanly() {
        let d = PrebuiltDownloader::new("http://localhost:9/", None);
        assert_eq!(
            d.contents_url("pkg/1.0.md"),
            "http://localhost:9/repos/0-hero/docsforai-prebuilt/contents/pkg/1.0.md"
        );
    }
}
