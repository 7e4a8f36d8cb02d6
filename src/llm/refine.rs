//! AI refinement of a draft commit message.
//!
//! Refinement never fails the run: every collaborator error is absorbed into
//! a [`RefineFailure`] and the prior draft is kept.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::commit::enforce_summary_limit;
use crate::error::LlmError;
use crate::ui::with_countdown;

use super::models::{ModelInfo, list_models};
use super::prompt::build_refine_prompt;
use super::subprocess::run_llm;

/// Responses shorter than this (after trimming) count as empty.
const MIN_RESPONSE_CHARS: usize = 10;

/// Lower-cased phrases that mark a response as a refusal or a request for
/// more input instead of a commit message.
const REFUSAL_PHRASES: &[&str] = &[
    "what would you like me to",
    "please provide me",
    "i can't help with",
    "i cannot help with",
    "i'm sorry, but",
];

const COUNTDOWN_LABEL: &str = "AI generating commit message…";

/// Trait for executing the text-generation tool.
///
/// This abstraction allows mocking the `llm` subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmExecutor: Send + Sync {
    /// Run `model` on `prompt`, giving up after `timeout`.
    async fn run(&self, model: &str, prompt: &str, timeout: Duration) -> Result<String, LlmError>;

    /// Models available to [`LlmExecutor::run`]. Empty when unknown.
    async fn list_models(&self) -> Vec<ModelInfo>;
}

/// Executor that calls the real `llm` CLI.
pub struct DefaultExecutor;

#[async_trait]
impl LlmExecutor for DefaultExecutor {
    async fn run(&self, model: &str, prompt: &str, timeout: Duration) -> Result<String, LlmError> {
        run_llm(model, prompt, timeout).await
    }

    async fn list_models(&self) -> Vec<ModelInfo> {
        list_models().await
    }
}

/// Draws a live countdown while the wrapped executor runs.
pub struct CountdownExecutor<'a> {
    inner: &'a dyn LlmExecutor,
}

impl<'a> CountdownExecutor<'a> {
    pub fn new(inner: &'a dyn LlmExecutor) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LlmExecutor for CountdownExecutor<'_> {
    async fn run(&self, model: &str, prompt: &str, timeout: Duration) -> Result<String, LlmError> {
        with_countdown(COUNTDOWN_LABEL, timeout, self.inner.run(model, prompt, timeout)).await
    }

    async fn list_models(&self) -> Vec<ModelInfo> {
        self.inner.list_models().await
    }
}

/// Why a refinement attempt produced no usable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineFailure {
    TimedOut,
    EmptyOutput,
    Refused,
    Failed(String),
}

impl RefineFailure {
    /// Short machine-friendly code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            RefineFailure::TimedOut => "timeout",
            RefineFailure::EmptyOutput => "empty",
            RefineFailure::Refused => "refused",
            RefineFailure::Failed(_) => "exception",
        }
    }
}

impl fmt::Display for RefineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefineFailure::TimedOut => f.write_str("timed out"),
            RefineFailure::EmptyOutput => f.write_str("empty output"),
            RefineFailure::Refused => f.write_str("model refused"),
            RefineFailure::Failed(reason) => f.write_str(reason),
        }
    }
}

impl From<LlmError> for RefineFailure {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(_) => RefineFailure::TimedOut,
            other => RefineFailure::Failed(other.to_string()),
        }
    }
}

/// Inputs for one refinement.
#[derive(Debug, Clone)]
pub struct RefineRequest {
    pub draft: String,
    pub diff: String,
    pub model: String,
    pub timeout: Duration,
    pub summary_limit: usize,
    pub diff_budget: usize,
    /// Diff budget for the single automatic retry. `None` disables retrying.
    pub retry_diff_budget: Option<usize>,
}

/// Result of a refinement: always carries a usable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineOutcome {
    pub message: String,
    pub failure: Option<RefineFailure>,
}

/// Validate a raw model response.
pub fn classify_response(raw: &str, limit: usize) -> Result<String, RefineFailure> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_RESPONSE_CHARS {
        return Err(RefineFailure::EmptyOutput);
    }

    let lowered = trimmed.to_lowercase();
    if REFUSAL_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Err(RefineFailure::Refused);
    }

    Ok(enforce_summary_limit(trimmed, limit))
}

/// Ask the model to improve `request.draft`.
///
/// On failure the draft is returned unchanged along with the reason. When a
/// retry budget is set, one more attempt is made with the smaller diff.
pub async fn refine_message(executor: &dyn LlmExecutor, request: &RefineRequest) -> RefineOutcome {
    let mut result = attempt(executor, request, request.diff_budget).await;

    if let (Err(failure), Some(budget)) = (&result, request.retry_diff_budget) {
        warn!(
            "AI refinement failed ({}), retrying with {} diff chars",
            failure.code(),
            budget
        );
        result = attempt(executor, request, budget).await;
    }

    match result {
        Ok(message) => RefineOutcome {
            message,
            failure: None,
        },
        Err(failure) => {
            debug!("AI refinement gave up: {}", failure);
            RefineOutcome {
                message: request.draft.clone(),
                failure: Some(failure),
            }
        }
    }
}

async fn attempt(
    executor: &dyn LlmExecutor,
    request: &RefineRequest,
    budget: usize,
) -> Result<String, RefineFailure> {
    let prompt = build_refine_prompt(&request.draft, &request.diff, request.summary_limit, budget);
    let raw = executor
        .run(&request.model, &prompt, request.timeout)
        .await
        .map_err(RefineFailure::from)?;
    classify_response(&raw, request.summary_limit)
}
