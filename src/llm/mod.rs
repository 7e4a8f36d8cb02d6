//! Text-generation collaborator: the `llm` CLI, its model catalogue and
//! commit message refinement.

pub mod models;
pub mod prompt;
pub mod refine;
pub mod subprocess;

pub use models::{ModelInfo, parse_models};
pub use prompt::{build_refine_prompt, truncate_diff};
pub use refine::{
    CountdownExecutor, DefaultExecutor, LlmExecutor, RefineFailure, RefineOutcome,
    RefineRequest, classify_response, refine_message,
};
