//! Semantic version tags and next-version negotiation.

pub mod negotiate;
pub mod semantic;

pub use negotiate::{MAX_TAG_PROBES, TagLookup, next_free_version};
pub use semantic::{format_tag, parse_version_tag, zero_version};
