//! Repository acquisition: turn a [`SourceConfig`] into a local checkout.
//!
//! Local `path` sources are used in place. Remote sources are shallow-cloned
//! into a deterministic directory under the work dir, or pulled when that
//! checkout already exists.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use tracing::{debug, error, info};

use crate::config::SourceConfig;
use crate::error::DocsError;

/// Seam for fetching the repository a build runs against.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Returns the repository root. Remote sources are placed under `workdir`.
    async fn acquire(&self, source: &SourceConfig, workdir: &Path) -> Result<PathBuf, DocsError>;
}

/// Clones and updates with the `git` binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitRepositoryProvider;

/// `git_<url>_<branch>` with path separators and colons flattened.
pub fn checkout_dir_name(url: &str, branch: Option<&str>) -> String {
    format!("git_{}_{}", url, branch.unwrap_or("default"))
        .replace(['/', ':', '\\', '@'], "_")
}

fn acquisition_error(source_ref: &str, reason: impl Into<String>) -> DocsError {
    DocsError::RepositoryAcquisition {
        source_ref: source_ref.to_string(),
        reason: reason.into(),
    }
}

fn run_git(args: &[&str], cwd: Option<&Path>, source_ref: &str) -> Result<(), DocsError> {
    let mut command = Command::new("git");
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    debug!(args = ?args, cwd = ?cwd, "Running git");
    match command.output() {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr);
            error!(
                source = source_ref,
                code = ?out.status.code(),
                stderr = %stderr.trim(),
                "git exited with failure"
            );
            Err(acquisition_error(
                source_ref,
                format!("git {} exited with {}", args[0], out.status),
            ))
        }
        Err(e) => {
            error!(error = ?e, source = source_ref, "Failed to launch git process");
            Err(acquisition_error(source_ref, format!("could not launch git: {e}")))
        }
    }
}

fn use_local(path: &Path) -> Result<PathBuf, DocsError> {
    let source_ref = path.display().to_string();
    let root = fs::canonicalize(path).map_err(|e| acquisition_error(&source_ref, e.to_string()))?;
    if !root.is_dir() {
        return Err(acquisition_error(&source_ref, "not a directory"));
    }
    info!(path = %root.display(), "Using local repository in place");
    Ok(root)
}

fn clone_or_update(url: &str, branch: Option<&str>, workdir: &Path) -> Result<PathBuf, DocsError> {
    let target = workdir.join(checkout_dir_name(url, branch));

    if target.join(".git").is_dir() {
        info!(repo_url = url, path = %target.display(), "Updating existing checkout");
        run_git(&["pull", "--ff-only"], Some(&target), url)?;
        return Ok(target);
    }

    let occupied = fs::read_dir(&target)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);
    if occupied {
        return Err(acquisition_error(
            url,
            format!("target directory is not empty: {}", target.display()),
        ));
    }
    fs::create_dir_all(workdir).map_err(|e| DocsError::io(workdir, e))?;

    let target_arg = target.to_string_lossy().into_owned();
    let mut args = vec!["clone", "--depth", "1"];
    if let Some(branch) = branch {
        args.extend(["-b", branch]);
    }
    args.extend([url, target_arg.as_str()]);
    run_git(&args, None, url)?;
    info!(
        repo_url = url,
        branch = branch.unwrap_or("default"),
        path = %target.display(),
        "Cloned repository"
    );
    Ok(target)
}

#[async_trait]
impl RepositoryProvider for GitRepositoryProvider {
    async fn acquire(&self, source: &SourceConfig, workdir: &Path) -> Result<PathBuf, DocsError> {
        match (&source.path, &source.url) {
            (Some(path), _) => use_local(path),
            (None, Some(url)) => clone_or_update(url, source.branch.as_deref(), workdir),
            (None, None) => Err(acquisition_error(
                "<none>",
                "source needs either a url or a path",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn checkout_names_are_single_components() {
        assert_eq!(
            checkout_dir_name("https://github.com/org/repo.git", Some("main")),
            "git_https___github.com_org_repo.git_main"
        );
        assert_eq!(
            checkout_dir_name("git@github.com:org/repo.git", None),
            "git_git_github.com_org_repo.git_default"
        );
    }

    #[tokio::test]
    async fn local_path_is_used_in_place() {
        let repo = tempdir().unwrap();
        let source = SourceConfig {
            path: Some(repo.path().to_path_buf()),
            ..Default::default()
        };
        let root = GitRepositoryProvider
            .acquire(&source, Path::new("/nonexistent-workdir"))
            .await
            .unwrap();
        assert_eq!(root, fs::canonicalize(repo.path()).unwrap());
    }

    #[tokio::test]
    async fn missing_local_path_is_an_acquisition_error() {
        let source = SourceConfig {
            path: Some(PathBuf::from("/definitely/not/here")),
            ..Default::default()
        };
        let err = GitRepositoryProvider
            .acquire(&source, Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, DocsError::RepositoryAcquisition { .. }));
    }

    #[tokio::test]
    async fn occupied_target_is_refused_without_running_git() {
        let work = tempdir().unwrap();
        let url = "https://example.invalid/repo.git";
        let target = work.path().join(checkout_dir_name(url, None));
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stray.txt"), "x").unwrap();
        let source = SourceConfig {
            url: Some(url.into()),
            ..Default::default()
        };
        let err = GitRepositoryProvider
            .acquire(&source, work.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not empty"));
    }
}
