//! Git collaborator: git2 for reads and staging, the `git` binary for
//! history-writing and network operations.

pub mod command;
pub mod config;
pub mod repo;

pub use config::{ConfigScope, ConfigStore, get_layered};
pub use repo::{CommitLine, GitRepo, RemoteInfo};
