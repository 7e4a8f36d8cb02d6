//! Git operations for publishing a release: commit, tag and push.
//!
//! All operations shell out to the system `git` binary, inheriting the
//! user's hooks, SSH agent and credential store. There is no rollback: a
//! failure leaves whatever already succeeded in place.

use std::path::Path;

use tracing::info;

use crate::commit::{release_message, release_timestamp};
use crate::error::GupError;
use crate::git::GitRepo;
use crate::git::command::{commit_as, create_annotated_tag, push_branch, push_tag};
use crate::identity::Identity;

/// Branch pushed when HEAD is detached after committing.
const FALLBACK_BRANCH: &str = "main";

/// Commit the staged changes, tag the commit and push both.
///
/// Steps:
/// 1. `git commit -m <message + trailer>` as `identity`
/// 2. `git tag -a <tag> -m <message + trailer>`
/// 3. `git push -u <remote> <branch>`
/// 4. `git push <remote> <tag>`
pub fn commit_tag_push(
    repo: &GitRepo,
    workdir: &Path,
    identity: &Identity,
    message: &str,
    tag: &str,
    remote: &str,
) -> Result<(), GupError> {
    let final_message = release_message(message, tag, &release_timestamp());

    commit_as(workdir, &final_message, &identity.name, &identity.email)?;
    create_annotated_tag(workdir, tag, &final_message, &identity.name, &identity.email)?;
    info!("Created {}", tag);

    let branch = repo
        .current_branch()
        .unwrap_or_else(|| FALLBACK_BRANCH.to_string());

    push_branch(workdir, remote, &branch).map_err(|source| GupError::Transport {
        operation: "Push",
        source,
    })?;
    push_tag(workdir, remote, tag).map_err(|source| GupError::Transport {
        operation: "Tag push",
        source,
    })?;

    Ok(())
}
