//! Repository reads and staging via git2.

use std::path::Path;

use chrono::{DateTime, Utc};
use git2::{
    ConfigLevel, DescribeFormatOptions, DescribeOptions, DiffFormat, DiffOptions, ErrorCode,
    IndexAddOption, Repository, StatusOptions, Tree,
};
use tracing::{debug, warn};

use crate::error::GitError;
use crate::version::TagLookup;

use super::config::{ConfigScope, ConfigStore};

/// A commit summary line for status displays.
#[derive(Debug, Clone)]
pub struct CommitLine {
    pub short_id: String,
    pub date: String,
    pub summary: String,
}

/// A configured remote.
#[derive(Debug, Clone)]
pub struct RemoteInfo {
    pub name: String,
    pub url: String,
}

/// The local repository gup operates on.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discover the repository containing `path`.
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::discover(path).map_err(GitError::OpenRepository)?;
        Ok(Self { repo })
    }

    /// Working directory, or `None` for bare repositories.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Whether HEAD points at a commit.
    pub fn has_commits(&self) -> bool {
        self.repo.head().and_then(|h| h.peel_to_commit()).is_ok()
    }

    /// Whether the working tree has no modified, staged or untracked files.
    pub fn is_clean(&self) -> Result<bool, GitError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(GitError::Index)?;
        Ok(statuses.is_empty())
    }

    /// Short name of the checked-out branch, or `None` when detached.
    ///
    /// Also works on an unborn branch, where HEAD is a dangling symbolic ref.
    pub fn current_branch(&self) -> Option<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head.shorthand().map(String::from),
            Ok(_) => None,
            Err(_) => self
                .repo
                .find_reference("HEAD")
                .ok()
                .and_then(|r| r.symbolic_target().map(String::from))
                .and_then(|t| t.strip_prefix("refs/heads/").map(String::from)),
        }
    }

    /// Nearest tag reachable from HEAD (like `git describe --tags --abbrev=0`).
    pub fn latest_tag(&self) -> Option<String> {
        let mut describe_opts = DescribeOptions::new();
        describe_opts.describe_tags();
        let describe = match self.repo.describe(&describe_opts) {
            Ok(d) => d,
            Err(e) => {
                debug!(error = %e, "No tag reachable from HEAD");
                return None;
            }
        };

        let mut format_opts = DescribeFormatOptions::new();
        format_opts.abbreviated_size(0);
        describe.format(Some(&format_opts)).ok()
    }

    /// Stage every working-tree change, including deletions (`git add -A`).
    pub fn stage_all(&self) -> Result<(), GitError> {
        let mut index = self.repo.index().map_err(GitError::Index)?;
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .map_err(GitError::Index)?;
        index
            .update_all(["*"].iter(), None)
            .map_err(GitError::Index)?;
        index.write().map_err(GitError::Index)?;
        Ok(())
    }

    /// Paths staged for the next commit.
    pub fn staged_files(&self) -> Result<Vec<String>, GitError> {
        let head_tree = self.head_tree()?;
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, None)
            .map_err(GitError::Diff)?;

        let mut files: Vec<String> = diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().to_string())
            })
            .collect();
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Unified diff of staged changes with zero context lines.
    pub fn staged_diff(&self) -> Result<String, GitError> {
        let head_tree = self.head_tree()?;
        let mut opts = DiffOptions::new();
        opts.context_lines(0);
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
            .map_err(GitError::Diff)?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            let origin = line.origin();
            if origin == '+' || origin == '-' || origin == ' ' {
                text.push(origin);
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })
        .map_err(GitError::Diff)?;

        Ok(text)
    }

    /// Configured remotes with their fetch URLs.
    pub fn remotes(&self) -> Result<Vec<RemoteInfo>, GitError> {
        let names = self
            .repo
            .remotes()
            .map_err(|e| GitError::Reference("remotes".into(), e))?;
        let mut remotes = Vec::new();
        for name in names.iter().flatten() {
            match self.repo.find_remote(name) {
                Ok(remote) => remotes.push(RemoteInfo {
                    name: name.to_string(),
                    url: remote.url().unwrap_or("").to_string(),
                }),
                Err(e) => warn!(remote = name, error = %e, "Could not load remote"),
            }
        }
        Ok(remotes)
    }

    /// The most recent `limit` commits reachable from HEAD.
    pub fn recent_commits(&self, limit: usize) -> Result<Vec<CommitLine>, GitError> {
        if !self.has_commits() {
            return Ok(Vec::new());
        }

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| GitError::Reference("HEAD".into(), e))?;
        revwalk
            .push_head()
            .map_err(|e| GitError::Reference("HEAD".into(), e))?;

        let mut lines = Vec::new();
        for oid in revwalk.take(limit) {
            let oid = oid.map_err(|e| GitError::Reference("HEAD".into(), e))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| GitError::Reference(oid.to_string(), e))?;
            let date = DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let id = oid.to_string();
            lines.push(CommitLine {
                short_id: id[..7.min(id.len())].to_string(),
                date,
                summary: commit.summary().unwrap_or("").to_string(),
            });
        }
        Ok(lines)
    }

    /// Resolve the HEAD tree, returning `None` for repos with no commits.
    fn head_tree(&self) -> Result<Option<Tree<'_>>, GitError> {
        let head = match self.repo.head() {
            Ok(r) => r,
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(None);
            }
            Err(e) => return Err(GitError::Diff(e)),
        };
        let tree = head.peel_to_tree().map_err(GitError::Diff)?;
        Ok(Some(tree))
    }
}

impl TagLookup for GitRepo {
    fn tag_exists(&self, tag: &str) -> Result<bool, GitError> {
        let refname = format!("refs/tags/{}", tag);
        match self.repo.find_reference(&refname) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(GitError::Reference(refname, e)),
        }
    }
}

impl ConfigStore for GitRepo {
    fn get(&self, scope: ConfigScope, key: &str) -> Option<String> {
        let levels: &[ConfigLevel] = match scope {
            ConfigScope::Repo => &[ConfigLevel::Local],
            ConfigScope::Global => &[ConfigLevel::Global, ConfigLevel::XDG],
        };

        let config = self.repo.config().ok()?;
        levels.iter().find_map(|level| {
            config
                .open_level(*level)
                .and_then(|c| c.get_string(key))
                .ok()
                .filter(|v| !v.trim().is_empty())
        })
    }

    fn set_repo(&self, key: &str, value: &str) -> Result<(), GitError> {
        let mut config = self
            .repo
            .config()
            .and_then(|c| c.open_level(ConfigLevel::Local))
            .map_err(GitError::Config)?;
        config.set_str(key, value).map_err(GitError::Config)?;
        debug!(key, "Wrote repository config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_repo_has_no_commits_and_no_tag() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepo::discover(dir.path()).unwrap();

        assert!(!repo.has_commits());
        assert!(repo.latest_tag().is_none());
        assert!(repo.recent_commits(3).unwrap().is_empty());
    }

    #[test]
    fn test_unborn_branch_name_resolves() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepo::discover(dir.path()).unwrap();

        let branch = repo.current_branch().unwrap();
        assert!(!branch.is_empty());
    }

    #[test]
    fn test_tag_exists_on_unknown_tag() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepo::discover(dir.path()).unwrap();

        assert!(!repo.tag_exists("v9.9.9").unwrap());
    }

    #[test]
    fn test_repo_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepo::discover(dir.path()).unwrap();

        assert!(repo.get(ConfigScope::Repo, "gup.model").is_none());
        repo.set_repo("gup.model", "gpt-4o-mini").unwrap();
        assert_eq!(
            repo.get(ConfigScope::Repo, "gup.model").as_deref(),
            Some("gpt-4o-mini")
        );
    }
}
