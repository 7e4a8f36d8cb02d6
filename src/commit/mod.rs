//! Commit message shaping: default summaries, summary-line limits and the
//! release trailer.

pub mod message;
pub mod summary;

pub use message::{
    SUMMARY_LIMIT, TIMESTAMP_FORMAT, enforce_summary_limit, release_message, release_timestamp,
};
pub use summary::default_summary;
