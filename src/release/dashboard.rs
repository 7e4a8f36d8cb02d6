//! Repository status screen shown when there is nothing to release.
//!
//! Collection is best-effort: each section that fails to load renders as
//! "(unavailable)" instead of aborting.

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::{MODEL_KEY, TIMEOUT_KEY};
use crate::git::{CommitLine, GitRepo, RemoteInfo, get_layered};
use crate::identity::{Identity, resolve_identity};
use crate::ui;

const RECENT_COMMITS: usize = 3;
const UNAVAILABLE: &str = "(unavailable)";

/// Snapshot of the repository for display.
struct Status {
    identity: Identity,
    model: Option<String>,
    timeout: Option<String>,
    branch: Option<String>,
    tag: Option<String>,
    remotes: Result<Vec<RemoteInfo>>,
    clean: Result<bool>,
    commits: Result<Vec<CommitLine>>,
}

impl Status {
    fn collect(repo: &GitRepo) -> Self {
        Self {
            identity: resolve_identity(repo),
            model: get_layered(repo, MODEL_KEY),
            timeout: get_layered(repo, TIMEOUT_KEY),
            branch: repo.current_branch(),
            tag: repo.latest_tag(),
            remotes: repo.remotes().context("listing remotes"),
            clean: repo.is_clean().context("reading working tree status"),
            commits: repo
                .recent_commits(RECENT_COMMITS)
                .context("reading recent commits"),
        }
    }
}

/// Print the repository status screen.
pub fn show_dashboard(repo: &GitRepo) {
    render(&Status::collect(repo));
}

fn render(status: &Status) {
    ui::header("GUP :: REPOSITORY STATUS");

    ui::section("IDENTITY");
    ui::kv("Name", or_not_set(&status.identity.name));
    ui::kv("Email", or_not_set(&status.identity.email));
    ui::kv("Source", &status.identity.provenance.to_string());

    ui::section("AI CONFIG");
    ui::kv("Model", status.model.as_deref().unwrap_or("(not set)"));
    ui::kv(
        "Timeout",
        &status
            .timeout
            .as_ref()
            .map(|t| format!("{}s", t))
            .unwrap_or_else(|| "(default)".to_string()),
    );

    ui::section("REPO");
    ui::kv("Branch", status.branch.as_deref().unwrap_or("(detached)"));
    if let Some(tag) = &status.tag {
        ui::kv("Tag", tag);
    }

    ui::section("REMOTES");
    match &status.remotes {
        Ok(remotes) if remotes.is_empty() => ui::kv("None", "-"),
        Ok(remotes) => {
            for remote in remotes {
                ui::row(&format!("{}\t{}", remote.name, remote.url));
            }
        }
        Err(e) => unavailable(e),
    }

    ui::section("WORKING TREE");
    match &status.clean {
        Ok(true) => ui::kv("Status", "CLEAN"),
        Ok(false) => ui::kv("Status", "DIRTY"),
        Err(e) => {
            debug!("{:#}", e);
            ui::kv("Status", UNAVAILABLE);
        }
    }

    ui::section("RECENT COMMITS");
    match &status.commits {
        Ok(commits) if commits.is_empty() => ui::kv("None", "-"),
        Ok(commits) => {
            for c in commits {
                ui::row(&format!("{} | {} | {}", c.short_id, c.date, c.summary));
            }
        }
        Err(e) => unavailable(e),
    }
    println!();
}

fn or_not_set(value: &str) -> &str {
    if value.is_empty() { "(not set)" } else { value }
}

fn unavailable(err: &anyhow::Error) {
    debug!("{:#}", err);
    ui::row(UNAVAILABLE);
}
