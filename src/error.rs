//! Error types for gup modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to read or write git config: {0}")]
    Config(#[source] git2::Error),

    #[error("Failed to update the index: {0}")]
    Index(#[source] git2::Error),

    #[error("Failed to collect diff: {0}")]
    Diff(#[source] git2::Error),

    #[error("Failed to resolve reference '{0}': {1}")]
    Reference(String, #[source] git2::Error),

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },
}

/// Errors from the `llm` CLI.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("llm CLI not found. Install with: pipx install llm")]
    NotInstalled,

    #[error("Failed to spawn llm process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Failed to write prompt to llm: {0}")]
    PromptWriteFailed(#[source] std::io::Error),

    #[error("llm process timed out after {0} seconds")]
    Timeout(u64),

    #[error("llm CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

/// Errors from version negotiation.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("No free patch tag for v{major}.{minor}.x after {attempts} attempts")]
    TagSpaceExhausted {
        major: u64,
        minor: u64,
        attempts: usize,
    },

    #[error("Failed to look up existing tags: {0}")]
    Lookup(#[from] GitError),
}

/// Top-level errors that terminate a run.
///
/// Each variant maps to a process exit code via [`GupError::exit_code`].
#[derive(Error, Debug)]
pub enum GupError {
    #[error("Not inside a Git repository.")]
    NotARepository(#[source] git2::Error),

    #[error("Bare repositories are not supported.")]
    BareRepository,

    #[error("Aborted: local branch is behind {upstream} by {behind} commit(s).")]
    BehindRemote { upstream: String, behind: u64 },

    #[error("Fast-forward from {upstream} failed. Resolve manually and re-run gup.")]
    FastForwardFailed {
        upstream: String,
        #[source]
        source: GitError,
    },

    #[error("Existing tag {0} is not semantic (expected vMAJOR.MINOR.PATCH).")]
    NonSemanticTag(String),

    #[error("No staged changes.")]
    NoStagedChanges,

    #[error("Both author name and email are required.")]
    MissingIdentity,

    #[error("{operation} failed. Retry manually: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: GitError,
    },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl GupError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            GupError::NonSemanticTag(_) => 2,
            GupError::NoStagedChanges => 3,
            GupError::MissingIdentity => 4,
            GupError::NotARepository(_)
            | GupError::BareRepository
            | GupError::BehindRemote { .. }
            | GupError::FastForwardFailed { .. }
            | GupError::Transport { .. }
            | GupError::Git(_)
            | GupError::Version(_)
            | GupError::Prompt(_) => 1,
        }
    }
}
