use std::{path::Path, time::Duration};

use {
    anyhow::{bail, Context},
    tokio::process::Command,
    tracing::{debug, info, warn},
};

use crate::sources::RepoSource;

// This module intentionally shells out to `git`: clones and pulls are the
// only VCS operations the pipeline needs, and the external binary handles
// every transport/auth configuration the user already has.

/// Upper bound for a single source's clone or pull, network included.
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-source outcome of a synchronization attempt. Failures are data, not
/// errors: the build loop collects outcomes uniformly and keeps going.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// `owner/repo`.
    pub repo: String,
    pub success: bool,
    /// Diagnostic for failures, clone/pull detail otherwise.
    pub detail: Option<String>,
}

impl SyncOutcome {
    fn ok(repo: String) -> Self {
        Self {
            repo,
            success: true,
            detail: None,
        }
    }

    fn failed(repo: String, detail: String) -> Self {
        Self {
            repo,
            success: false,
            detail: Some(detail),
        }
    }
}

/// Ensure a source's working copy exists and is current.
///
/// Missing copy: shallow single-branch clone into `<repos_root>/<owner>/<repo>`.
/// Existing copy: incremental `git pull` in place.
///
/// Never returns an error and never panics; any failure (network, auth,
/// conflict, timeout) is logged with the offending `owner/repo` and reported
/// in the outcome. Whether the copy is usable is determined afterwards by
/// checking that the directory exists.
pub async fn sync(source: &RepoSource, repos_root: &Path) -> SyncOutcome {
    let key = source.key();
    let target = source.local_path(repos_root);

    let attempt = async {
        if target.is_dir() {
            pull(&target).await
        } else {
            clone(source, repos_root).await
        }
    };

    match tokio::time::timeout(SYNC_TIMEOUT, attempt).await {
        Ok(Ok(())) => {
            debug!(repo = %key, "synchronized");
            SyncOutcome::ok(key)
        },
        Ok(Err(e)) => {
            warn!(repo = %key, error = %e, "sync failed");
            SyncOutcome::failed(key, e.to_string())
        },
        Err(_) => {
            warn!(repo = %key, timeout_secs = SYNC_TIMEOUT.as_secs(), "sync timed out");
            SyncOutcome::failed(key, format!("timed out after {}s", SYNC_TIMEOUT.as_secs()))
        },
    }
}

async fn clone(source: &RepoSource, repos_root: &Path) -> anyhow::Result<()> {
    let target = source.local_path(repos_root);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .context("failed to create repository parent directory")?;
    }

    let url = source.clone_url();
    let branch = match source.branch.clone() {
        Some(b) => Some(b),
        None => discover_default_branch(&url).await,
    };

    let mut cmd = Command::new("git");
    // Never let git block on an interactive credential prompt.
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    cmd.args(["clone", "--depth", "1", "--single-branch"]);
    if let Some(ref branch) = branch {
        cmd.args(["--branch", branch]);
    }
    cmd.arg(&url).arg(&target);

    let output = cmd.output().await.context("failed to run git clone")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git clone failed: {}", stderr.trim());
    }

    info!(repo = %source.key(), branch = ?branch, "cloned");
    Ok(())
}

async fn pull(target: &Path) -> anyhow::Result<()> {
    let output = Command::new("git")
        .env("GIT_TERMINAL_PROMPT", "0")
        .args(["pull", "--ff-only"])
        .current_dir(target)
        .output()
        .await
        .context("failed to run git pull")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git pull failed: {}", stderr.trim());
    }
    Ok(())
}

/// Probe the remote for its branch, trying `main` then `master`.
/// Returns `None` when neither exists or the probe itself fails; the clone
/// then proceeds without `--branch` and uses the remote's default.
pub async fn discover_default_branch(url: &str) -> Option<String> {
    let output = Command::new("git")
        .env("GIT_TERMINAL_PROMPT", "0")
        .args([
            "ls-remote",
            "--heads",
            url,
            "refs/heads/main",
            "refs/heads/master",
        ])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for candidate in ["main", "master"] {
        let suffix = format!("refs/heads/{candidate}");
        if stdout.lines().any(|line| line.ends_with(&suffix)) {
            return Some(candidate.to_string());
        }
    }
    None
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    // Build a local bare-ish origin so clone/pull run without network.
    async fn init_origin(dir: &Path, branch: &str) {
        let run = |args: Vec<String>| {
            let dir = dir.to_path_buf();
            async move {
                Command::new("git")
                    .args(&args)
                    .current_dir(&dir)
                    .output()
                    .await
                    .unwrap()
            }
        };
        let s = String::from;
        run(vec![s("init"), s("-b"), branch.into()]).await;
        run(vec![s("config"), s("user.email"), s("t@t.io")]).await;
        run(vec![s("config"), s("user.name"), s("t")]).await;
        std::fs::write(dir.join("SKILL.md"), "---\nname: demo\n---\nbody\n").unwrap();
        run(vec![s("add"), s(".")]).await;
        run(vec![s("commit"), s("-m"), s("init")]).await;
    }

    #[tokio::test]
    async fn sync_failure_is_reported_not_raised() {
        let tmp = tempfile::tempdir().unwrap();
        // Unresolvable host: clone fails, outcome carries the diagnostic.
        let source = RepoSource::new("nonexistent-owner-xyz", "nonexistent-repo-xyz");
        let outcome = sync(&source, tmp.path()).await;
        assert!(!outcome.success);
        assert_eq!(outcome.repo, "nonexistent-owner-xyz/nonexistent-repo-xyz");
        assert!(outcome.detail.is_some());
        assert!(!source.local_path(tmp.path()).exists());
    }

    #[tokio::test]
    async fn pull_runs_in_existing_working_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("local/origin");
        std::fs::create_dir_all(&target).unwrap();
        init_origin(&target, "main").await;

        // Existing copy takes the pull path; no upstream means pull fails,
        // but the failure is contained in the outcome.
        let outcome = sync(&RepoSource::new("local", "origin"), tmp.path()).await;
        assert_eq!(outcome.repo, "local/origin");
        assert!(!outcome.success);
        // The stale working copy is still there for the locator.
        assert!(target.exists());
    }

    #[tokio::test]
    async fn discover_branch_on_bad_remote_is_none() {
        assert!(discover_default_branch("file:///nonexistent/definitely-missing")
            .await
            .is_none());
    }
}
