//! Commit author identity from layered git config or the user.

use std::fmt;

use tracing::debug;

use crate::error::GitError;
use crate::git::{ConfigScope, ConfigStore};
use crate::ui::{self, Prompter};

const NAME_KEY: &str = "user.name";
const EMAIL_KEY: &str = "user.email";

/// Where the identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Repo,
    Global,
    Prompted,
    Unset,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Repo => write!(f, "repo"),
            Provenance::Global => write!(f, "global"),
            Provenance::Prompted => write!(f, "prompted"),
            Provenance::Unset => write!(f, "none"),
        }
    }
}

/// Author and committer identity for the release commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub provenance: Provenance,
}

impl Identity {
    /// True when neither field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

/// Resolve the identity from the repository scope, then the global scope.
///
/// A scope wins if it sets either field. Half-filled identities are
/// returned as-is.
pub fn resolve_identity(store: &dyn ConfigStore) -> Identity {
    for (scope, provenance) in [
        (ConfigScope::Repo, Provenance::Repo),
        (ConfigScope::Global, Provenance::Global),
    ] {
        let name = store.get(scope, NAME_KEY).unwrap_or_default();
        let email = store.get(scope, EMAIL_KEY).unwrap_or_default();
        if !name.is_empty() || !email.is_empty() {
            debug!("Using {} identity", scope);
            return Identity {
                name,
                email,
                provenance,
            };
        }
    }

    Identity {
        name: String::new(),
        email: String::new(),
        provenance: Provenance::Unset,
    }
}

/// Ask for a name and email. Blank input keeps the pre-filled value.
pub fn prompt_identity(
    prompter: &mut dyn Prompter,
    name: &str,
    email: &str,
) -> Result<(String, String), dialoguer::Error> {
    ui::info("Enter commit identity (blank keeps current):");
    let name = prompter.input("Name", name)?;
    let email = prompter.input("Email", email)?;
    Ok((name, email))
}

/// Write the identity to the repository scope.
pub fn persist_identity(store: &dyn ConfigStore, identity: &mut Identity) -> Result<(), GitError> {
    store.set_repo(NAME_KEY, &identity.name)?;
    store.set_repo(EMAIL_KEY, &identity.email)?;
    identity.provenance = Provenance::Repo;
    Ok(())
}
