//! Interactive review loop between drafting and committing.

use std::time::Duration;

use tracing::debug;

use crate::commit::enforce_summary_limit;
use crate::config::{GupConfig, MODEL_KEY, TIMEOUT_KEY, clamp_timeout};
use crate::error::GupError;
use crate::git::ConfigStore;
use crate::identity::{Identity, persist_identity, prompt_identity};
use crate::llm::{LlmExecutor, ModelInfo, RefineRequest, refine_message};
use crate::ui::{self, Prompter};

use super::model::select_model;

/// Where the review loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Drafting,
    Reviewing,
    EditingIdentity,
    EditingMessage,
    ChangingModel,
    Committing,
    Cancelled,
}

/// A choice on the review screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Commit,
    EditIdentity,
    EditMessage,
    ChangeModel,
    Cancel,
}

impl ReviewAction {
    /// Menu order.
    pub const ALL: [ReviewAction; 5] = [
        ReviewAction::Commit,
        ReviewAction::EditIdentity,
        ReviewAction::EditMessage,
        ReviewAction::ChangeModel,
        ReviewAction::Cancel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReviewAction::Commit => "Commit & push",
            ReviewAction::EditIdentity => "Edit identity",
            ReviewAction::EditMessage => "Edit message",
            ReviewAction::ChangeModel => "Change model & timeout (regenerate)",
            ReviewAction::Cancel => "Cancel",
        }
    }

    fn next_state(&self) -> ReviewState {
        match self {
            ReviewAction::Commit => ReviewState::Committing,
            ReviewAction::EditIdentity => ReviewState::EditingIdentity,
            ReviewAction::EditMessage => ReviewState::EditingMessage,
            ReviewAction::ChangeModel => ReviewState::ChangingModel,
            ReviewAction::Cancel => ReviewState::Cancelled,
        }
    }
}

/// Everything the release commit needs, edited in place by the loop.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub message: String,
    /// Tag the release will be published under.
    pub tag: String,
    pub model: String,
    pub timeout: Duration,
    /// Staged diff, refined against on every draft.
    pub diff: String,
}

/// Read-only collaborators for the loop.
pub struct ReviewContext<'a> {
    pub config: &'a GupConfig,
    pub models: &'a [ModelInfo],
    pub store: &'a dyn ConfigStore,
}

/// How the loop ended.
#[derive(Debug)]
pub enum ReviewOutcome {
    Commit(Session),
    Cancelled,
}

/// Draft a message with the model, then let the user review it.
///
/// Cancelling leaves no side effects. Identity edits and model changes are
/// persisted to the repository config as they happen.
pub async fn run_review(
    mut session: Session,
    ctx: &ReviewContext<'_>,
    prompter: &mut dyn Prompter,
    executor: &dyn LlmExecutor,
) -> Result<ReviewOutcome, GupError> {
    let mut state = ReviewState::Drafting;
    let mut regenerating = false;

    loop {
        debug!(?state, "Review loop");
        state = match state {
            ReviewState::Drafting => {
                draft(&mut session, ctx.config, executor, regenerating).await;
                regenerating = true;
                ReviewState::Reviewing
            }
            ReviewState::Reviewing => {
                show_review(&session);
                let labels: Vec<String> = ReviewAction::ALL
                    .iter()
                    .map(|a| a.label().to_string())
                    .collect();
                let choice = prompter.select("Choice", &labels, 0)?;
                ReviewAction::ALL
                    .get(choice)
                    .map(ReviewAction::next_state)
                    .unwrap_or(ReviewState::Reviewing)
            }
            ReviewState::EditingIdentity => {
                edit_identity(&mut session.identity, ctx.store, prompter)?;
                ReviewState::Reviewing
            }
            ReviewState::EditingMessage => {
                let edited = prompter.edit(&session.message)?;
                let edited = edited.trim();
                if edited.is_empty() {
                    ui::warn("Empty message, keeping the previous one.");
                } else {
                    session.message = enforce_summary_limit(edited, ctx.config.summary_limit);
                }
                ReviewState::Reviewing
            }
            ReviewState::ChangingModel => {
                change_model(&mut session, ctx, prompter)?;
                ReviewState::Drafting
            }
            ReviewState::Committing => return Ok(ReviewOutcome::Commit(session)),
            ReviewState::Cancelled => return Ok(ReviewOutcome::Cancelled),
        };
    }
}

/// Run one refinement of the current message.
async fn draft(
    session: &mut Session,
    config: &GupConfig,
    executor: &dyn LlmExecutor,
    regenerating: bool,
) {
    let request = RefineRequest {
        draft: session.message.clone(),
        diff: session.diff.clone(),
        model: session.model.clone(),
        timeout: session.timeout,
        summary_limit: config.summary_limit,
        diff_budget: config.diff_budget,
        retry_diff_budget: config
            .features
            .auto_retry
            .then_some(config.retry_diff_budget),
    };

    let outcome = refine_message(executor, &request).await;
    session.message = outcome.message;

    if let Some(failure) = outcome.failure {
        if regenerating {
            ui::warn(&format!("AI regeneration failed: {}", failure));
        } else {
            ui::warn("AI commit message generation failed");
            ui::warn(&format!("Reason: {}", failure));
            ui::warn(&format!(
                "Model: {} | Timeout: {}s",
                session.model,
                session.timeout.as_secs()
            ));
        }
    }
}

fn edit_identity(
    identity: &mut Identity,
    store: &dyn ConfigStore,
    prompter: &mut dyn Prompter,
) -> Result<(), GupError> {
    let (name, email) = prompt_identity(prompter, &identity.name, &identity.email)?;
    if name.is_empty() && email.is_empty() {
        return Err(GupError::MissingIdentity);
    }
    identity.name = name;
    identity.email = email;
    persist_identity(store, identity)?;
    Ok(())
}

fn change_model(
    session: &mut Session,
    ctx: &ReviewContext<'_>,
    prompter: &mut dyn Prompter,
) -> Result<(), GupError> {
    let model = select_model(ctx.models, Some(&session.model), prompter)?;
    ctx.store.set_repo(MODEL_KEY, &model)?;

    let current = session.timeout.as_secs().to_string();
    let raw = prompter.input("Timeout seconds (1-60)", &current)?;
    let secs = clamp_timeout(&raw);
    ctx.store.set_repo(TIMEOUT_KEY, &secs.to_string())?;

    session.model = model;
    session.timeout = Duration::from_secs(secs);
    Ok(())
}

fn show_review(session: &Session) {
    ui::header("GUP :: REVIEW");

    ui::section("IDENTITY");
    ui::kv("Name", &session.identity.name);
    ui::kv("Email", &session.identity.email);
    ui::kv("Source", &session.identity.provenance.to_string());

    ui::section("RELEASE");
    ui::kv("Version", &session.tag);
    ui::kv(
        "Model",
        &format!("{} ({}s)", session.model, session.timeout.as_secs()),
    );

    ui::section("MESSAGE");
    println!();
    println!("{}", session.message);
    println!();
}
