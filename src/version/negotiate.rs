//! Next free patch tag selection.

use semver::Version;
use tracing::debug;

use crate::error::{GitError, VersionError};

use super::semantic::format_tag;

/// Upper bound on tag probes before giving up.
pub const MAX_TAG_PROBES: usize = 1000;

/// Membership test against the repository's existing tags.
///
/// Implementations must query fresh state on every call; the negotiator never
/// caches results.
#[cfg_attr(test, mockall::automock)]
pub trait TagLookup {
    fn tag_exists(&self, tag: &str) -> Result<bool, GitError>;
}

/// Find the first unused `vMAJOR.MINOR.K` tag with `K > base.patch`.
///
/// Only the patch component advances; minor and major never roll over.
pub fn next_free_version(lookup: &dyn TagLookup, base: &Version) -> Result<String, VersionError> {
    let exhausted = |attempts| VersionError::TagSpaceExhausted {
        major: base.major,
        minor: base.minor,
        attempts,
    };
    let mut patch = base.patch.checked_add(1).ok_or_else(|| exhausted(0))?;

    for attempt in 1..=MAX_TAG_PROBES {
        let tag = format_tag(&Version::new(base.major, base.minor, patch));
        if !lookup.tag_exists(&tag)? {
            return Ok(tag);
        }
        debug!(tag = %tag, "Tag already exists, trying next patch");
        patch = patch.checked_add(1).ok_or_else(|| exhausted(attempt))?;
    }

    Err(exhausted(MAX_TAG_PROBES))
}
