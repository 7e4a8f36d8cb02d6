//! Release pipeline: stage, draft, review, commit, tag and push.
//!
//! Orchestrates preflight checks, version negotiation, identity resolution,
//! message drafting and the interactive review loop.

pub mod dashboard;
pub mod executor;
pub mod model;
pub mod preflight;
pub mod review;

use std::path::Path;

use tracing::debug;

use crate::commit::default_summary;
use crate::config::GupConfig;
use crate::error::GupError;
use crate::git::GitRepo;
use crate::identity::{Provenance, persist_identity, prompt_identity, resolve_identity};
use crate::llm::{CountdownExecutor, LlmExecutor};
use crate::ui::{self, Prompter};
use crate::version::{format_tag, next_free_version, parse_version_tag, zero_version};

use self::dashboard::show_dashboard;
use self::executor::commit_tag_push;
use self::model::choose_model;
use self::preflight::{ensure_up_to_date, open_repository};
use self::review::{ReviewContext, ReviewOutcome, Session, run_review};

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A commit and tag were created and pushed.
    Released { tag: String },
    /// The working tree was clean.
    NothingToCommit,
    /// The user cancelled at review.
    Cancelled,
}

/// Run the full release pipeline for the repository containing `path`.
pub async fn run_release(
    path: &Path,
    prompter: &mut dyn Prompter,
    executor: &dyn LlmExecutor,
) -> Result<RunOutcome, GupError> {
    // ── Stage 1: Preflight ──
    let repo = open_repository(path)?;
    let workdir = repo
        .workdir()
        .ok_or(GupError::BareRepository)?
        .to_path_buf();
    let config = GupConfig::load(&repo);
    debug!(?config, "Loaded configuration");

    let countdown = CountdownExecutor::new(executor);
    let executor: &dyn LlmExecutor = if config.features.countdown {
        &countdown
    } else {
        executor
    };

    ensure_up_to_date(prompter, &workdir, repo.current_branch().as_deref())?;

    let bootstrap = !repo.has_commits();
    if !bootstrap && repo.is_clean()? {
        ui::info("Nothing to commit.");
        if config.features.dashboard {
            show_dashboard(&repo);
        }
        return Ok(RunOutcome::NothingToCommit);
    }

    // ── Stage 2: Version negotiation ──
    let tag = next_free_version(&repo, &base_version(&repo, bootstrap)?)?;
    debug!("Next free tag is {}", tag);

    // ── Stage 3: Staging ──
    repo.stage_all()?;
    let files = repo.staged_files()?;
    if files.is_empty() {
        return Err(GupError::NoStagedChanges);
    }
    debug!("{} staged files", files.len());

    // ── Stage 4: Identity ──
    let mut identity = resolve_identity(&repo);
    if identity.provenance == Provenance::Unset {
        let (name, email) = prompt_identity(prompter, "", "")?;
        identity.name = name;
        identity.email = email;
        if identity.is_empty() {
            return Err(GupError::MissingIdentity);
        }
        if prompter.confirm("Save identity to this repository?", true)? {
            persist_identity(&repo, &mut identity)?;
        } else {
            identity.provenance = Provenance::Prompted;
        }
    }

    // ── Stage 5: Draft and review ──
    let models = executor.list_models().await;
    let model = choose_model(&config, &models, prompter, &repo)?;

    let session = Session {
        identity,
        message: default_summary(bootstrap, files.len()),
        tag,
        model,
        timeout: config.timeout(),
        diff: repo.staged_diff()?,
    };
    let ctx = ReviewContext {
        config: &config,
        models: &models,
        store: &repo,
    };

    let session = match run_review(session, &ctx, prompter, executor).await? {
        ReviewOutcome::Commit(session) => session,
        ReviewOutcome::Cancelled => {
            ui::warn("Cancelled.");
            return Ok(RunOutcome::Cancelled);
        }
    };

    // ── Stage 6: Commit, tag, push ──
    commit_tag_push(
        &repo,
        &workdir,
        &session.identity,
        &session.message,
        &session.tag,
        &config.remote,
    )?;
    ui::success(&format!("Released {}", session.tag));

    Ok(RunOutcome::Released { tag: session.tag })
}

/// Version the next tag is derived from.
///
/// No commits or no tag means `v0.0.0`. A latest tag that is not
/// `vMAJOR.MINOR.PATCH` stops the run.
fn base_version(repo: &GitRepo, bootstrap: bool) -> Result<semver::Version, GupError> {
    if bootstrap {
        return Ok(zero_version());
    }
    match repo.latest_tag() {
        None => Ok(zero_version()),
        Some(tag) => match parse_version_tag(&tag) {
            Some(version) => {
                debug!("Latest tag {} is {}", tag, format_tag(&version));
                Ok(version)
            }
            None => Err(GupError::NonSemanticTag(tag)),
        },
    }
}
