//! Layered git configuration access.

use std::fmt;

use crate::error::GitError;

/// A git configuration scope that gup reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// `.git/config` of the current repository.
    Repo,
    /// The user's global configuration (`~/.gitconfig` or the XDG file).
    Global,
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigScope::Repo => write!(f, "repo"),
            ConfigScope::Global => write!(f, "global"),
        }
    }
}

/// Key-value access to git configuration.
///
/// Reads are scoped so callers can tell where a value came from; writes always
/// go to the repository scope.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore {
    /// Read a non-empty value from exactly one scope.
    fn get(&self, scope: ConfigScope, key: &str) -> Option<String>;

    /// Write a value to the repository scope.
    fn set_repo(&self, key: &str, value: &str) -> Result<(), GitError>;
}

/// Read `key` from the repository scope, falling back to the global scope.
pub fn get_layered(store: &dyn ConfigStore, key: &str) -> Option<String> {
    store
        .get(ConfigScope::Repo, key)
        .or_else(|| store.get(ConfigScope::Global, key))
}
