//! gup - stage, describe, version-tag and push a release in one step.
//!
//! # Overview
//!
//! gup stages every change in the working tree, drafts a commit message
//! (optionally refined by the `llm` CLI), picks the next free
//! `vMAJOR.MINOR.PATCH` tag, and after an interactive review commits, tags
//! and pushes.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod identity;
pub mod llm;
pub mod release;
pub mod ui;
pub mod version;

// Re-export commonly used types
pub use config::{FeatureFlags, GupConfig};
pub use error::{GitError, GupError, LlmError, VersionError};
pub use identity::{Identity, Provenance};
pub use release::{RunOutcome, run_release};
