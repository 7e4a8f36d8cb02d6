//! Operations that shell out to the system `git` binary.
//!
//! Commit, tag, fetch, merge and push go through `git` itself so they inherit
//! the user's hooks, SSH agent and credential store.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Run a git command in `workdir` and return its trimmed stdout.
pub fn run_git(workdir: &Path, args: &[&str], operation: &str) -> Result<String, GitError> {
    run_git_with_env(workdir, args, &[], operation)
}

/// Run a git command with extra environment variables.
pub fn run_git_with_env(
    workdir: &Path,
    args: &[&str],
    envs: &[(&str, &str)],
    operation: &str,
) -> Result<String, GitError> {
    debug!(?args, "Running git {}", operation);

    let output = Command::new("git")
        .args(args)
        .envs(envs.iter().copied())
        .current_dir(workdir)
        .output()
        .map_err(|e| GitError::SpawnFailed {
            operation: operation.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Upstream tracking branch of HEAD (e.g. `origin/main`), if configured.
pub fn upstream(workdir: &Path) -> Option<String> {
    run_git(
        workdir,
        &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
        "rev-parse upstream",
    )
    .ok()
    .filter(|s| !s.is_empty())
}

/// Fetch from the default remote.
pub fn fetch(workdir: &Path) -> Result<(), GitError> {
    run_git(workdir, &["fetch", "--quiet"], "fetch").map(|_| ())
}

/// Number of commits in `upstream` that `branch` does not have.
pub fn commits_behind(workdir: &Path, branch: &str, upstream: &str) -> Result<u64, GitError> {
    let range = format!("{}..{}", branch, upstream);
    let count = run_git(workdir, &["rev-list", "--count", &range], "rev-list")?;
    count.parse().map_err(|_| GitError::CommandFailed {
        operation: "rev-list".to_string(),
        stderr: format!("unexpected commit count '{}'", count),
    })
}

/// Fast-forward the current branch to `upstream`.
pub fn fast_forward(workdir: &Path, upstream: &str) -> Result<(), GitError> {
    run_git(workdir, &["merge", "--ff-only", upstream], "merge --ff-only").map(|_| ())
}

fn identity_env<'a>(name: &'a str, email: &'a str) -> [(&'static str, &'a str); 4] {
    [
        ("GIT_AUTHOR_NAME", name),
        ("GIT_AUTHOR_EMAIL", email),
        ("GIT_COMMITTER_NAME", name),
        ("GIT_COMMITTER_EMAIL", email),
    ]
}

/// Commit the staged changes with an explicit author and committer.
pub fn commit_as(workdir: &Path, message: &str, name: &str, email: &str) -> Result<(), GitError> {
    run_git_with_env(
        workdir,
        &["commit", "-m", message],
        &identity_env(name, email),
        "commit",
    )
    .map(|_| ())
}

/// Create an annotated tag on HEAD, tagged by the given identity.
pub fn create_annotated_tag(
    workdir: &Path,
    tag: &str,
    message: &str,
    name: &str,
    email: &str,
) -> Result<(), GitError> {
    run_git_with_env(
        workdir,
        &["tag", "-a", tag, "-m", message],
        &identity_env(name, email),
        "tag",
    )
    .map(|_| ())
}

/// Push `branch` to `remote` and set it as upstream.
pub fn push_branch(workdir: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
    run_git(workdir, &["push", "-u", remote, branch], "push").map(|_| ())
}

/// Push a single tag to `remote`.
pub fn push_tag(workdir: &Path, remote: &str, tag: &str) -> Result<(), GitError> {
    run_git(workdir, &["push", remote, tag], "push tag").map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_git_version_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_git(dir.path(), &["--version"], "version check").unwrap();
        assert!(out.starts_with("git version"));
    }

    #[test]
    fn test_run_git_invalid_command_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_git(dir.path(), &["not-a-real-command"], "invalid");
        assert!(matches!(result, Err(GitError::CommandFailed { .. })));
    }

    #[test]
    fn test_upstream_absent_in_fresh_repo() {
        let dir = tempfile::tempdir().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        assert!(upstream(dir.path()).is_none());
    }

    #[test]
    fn test_identity_env_sets_author_and_committer() {
        let env = identity_env("Ada", "ada@example.com");
        assert!(env.contains(&("GIT_AUTHOR_NAME", "Ada")));
        assert!(env.contains(&("GIT_COMMITTER_EMAIL", "ada@example.com")));
    }
}
