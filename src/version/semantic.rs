//! Parsing and formatting of `vMAJOR.MINOR.PATCH` release tags.

use std::sync::OnceLock;

use regex_lite::Regex;
use semver::Version;

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^v([0-9]+)\.([0-9]+)\.([0-9]+)$").expect("static tag pattern is valid")
    })
}

/// Parse a release tag of the exact form `vMAJOR.MINOR.PATCH`.
///
/// Pre-release suffixes, missing `v` prefixes and numbers that overflow `u64`
/// are rejected.
pub fn parse_version_tag(tag: &str) -> Option<Version> {
    let caps = tag_pattern().captures(tag.trim())?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps.get(3)?.as_str().parse().ok()?;
    Some(Version::new(major, minor, patch))
}

/// Format a version as a release tag.
pub fn format_tag(version: &Version) -> String {
    format!("v{}.{}.{}", version.major, version.minor, version.patch)
}

/// The version used when a repository has no release tag yet.
pub fn zero_version() -> Version {
    Version::new(0, 0, 0)
}
