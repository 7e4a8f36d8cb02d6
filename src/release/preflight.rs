//! Preflight checks run before anything is staged.
//!
//! Validates that we are inside a non-bare repository and that the current
//! branch is not behind its upstream.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{GitError, GupError};
use crate::git::GitRepo;
use crate::git::command::{commits_behind, fast_forward, fetch, upstream};
use crate::ui::{self, Prompter};

/// Open the repository containing `path`.
pub fn open_repository(path: &Path) -> Result<GitRepo, GupError> {
    let repo = GitRepo::discover(path).map_err(|e| match e {
        GitError::OpenRepository(source) => GupError::NotARepository(source),
        other => GupError::Git(other),
    })?;

    if repo.workdir().is_none() {
        return Err(GupError::BareRepository);
    }

    Ok(repo)
}

/// Make sure `branch` is not behind its upstream.
///
/// Does nothing when the branch has no upstream. When it is behind, the
/// user may fast-forward; declining aborts the run.
pub fn ensure_up_to_date(
    prompter: &mut dyn Prompter,
    workdir: &Path,
    branch: Option<&str>,
) -> Result<(), GupError> {
    let Some(branch) = branch else {
        debug!("Detached HEAD, skipping upstream check");
        return Ok(());
    };
    let Some(upstream) = upstream(workdir) else {
        debug!("{} has no upstream, skipping freshness check", branch);
        return Ok(());
    };

    fetch(workdir).map_err(|source| GupError::Transport {
        operation: "Fetch",
        source,
    })?;

    let behind = match commits_behind(workdir, branch, &upstream) {
        Ok(n) => n,
        Err(e) => {
            warn!("Could not compare {} with {}: {}", branch, upstream, e);
            0
        }
    };
    if behind == 0 {
        return Ok(());
    }

    ui::warn(&format!(
        "Local branch is behind {} by {} commit(s).",
        upstream, behind
    ));
    if !prompter.confirm("Fetch and fast-forward before continuing?", false)? {
        return Err(GupError::BehindRemote { upstream, behind });
    }

    fast_forward(workdir, &upstream).map_err(|source| GupError::FastForwardFailed {
        upstream: upstream.clone(),
        source,
    })?;
    ui::success("Repository updated from remote.");
    Ok(())
}
