//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::process::Command;
use std::sync::{Mutex, Once, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use git2::{ConfigLevel, IndexAddOption, Oid, Repository, ResetType, Signature};

use gup::error::{GitError, LlmError};
use gup::git::{ConfigScope, ConfigStore};
use gup::llm::{LlmExecutor, ModelInfo};
use gup::ui::Prompter;

pub const TEST_NAME: &str = "Test User";
pub const TEST_EMAIL: &str = "test@example.com";

/// Point libgit2's global and XDG config lookup at an empty directory so a
/// developer's own `~/.gitconfig` identity cannot leak into a test.
///
/// Process-wide: call it first in every test of a file that relies on it.
pub fn isolate_global_config() {
    static EMPTY_HOME: OnceLock<tempfile::TempDir> = OnceLock::new();
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let home = EMPTY_HOME.get_or_init(|| tempfile::tempdir().expect("Failed to create home"));
        for level in [ConfigLevel::Global, ConfigLevel::XDG, ConfigLevel::System] {
            // SAFETY: runs once, before this test binary touches any repository.
            unsafe { git2::opts::set_search_path(level, home.path()) }
                .expect("Failed to set config search path");
        }
    });
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create an empty repository with a repo-scope identity.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open config");
            config.set_str("user.name", TEST_NAME).unwrap();
            config.set_str("user.email", TEST_EMAIL).unwrap();
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Set a repo-scope config value.
    pub fn set_config(&self, key: &str, value: &str) {
        let mut config = self.repo.config().expect("Failed to open config");
        config.set_str(key, value).expect("Failed to set config");
    }

    /// Read a repo-scope config value.
    pub fn local_config(&self, key: &str) -> Option<String> {
        self.repo
            .config()
            .and_then(|c| c.open_level(git2::ConfigLevel::Local))
            .and_then(|c| c.get_string(key))
            .ok()
    }

    /// Remove the repo-scope identity set by [`TestRepo::new`].
    pub fn clear_identity(&self) {
        let mut config = self
            .repo
            .config()
            .and_then(|c| c.open_level(ConfigLevel::Local))
            .expect("Failed to open local config");
        config.remove("user.name").expect("Failed to remove user.name");
        config.remove("user.email").expect("Failed to remove user.email");
    }

    /// Commit HEAD points at.
    pub fn head_commit(&self) -> git2::Commit<'_> {
        self.repo.head().unwrap().peel_to_commit().unwrap()
    }

    /// Turn off cosmetic features that draw on the terminal.
    pub fn quiet(&self) {
        self.set_config("gup.countdown", "false");
        self.set_config("gup.dashboard", "false");
    }

    /// Write a file relative to the working tree.
    pub fn write_file(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now(TEST_NAME, TEST_EMAIL).expect("Failed to create signature")
    }

    /// Stage everything and commit on HEAD. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        self.write_file("history.txt", &format!("{}\n{}", message, stamp));
        self.commit_to(Some("HEAD"), message)
    }

    /// Create a commit on top of HEAD without moving any ref.
    ///
    /// The result is unreachable from HEAD, like a tag left on an abandoned
    /// branch.
    pub fn detached_commit(&self, message: &str) -> Oid {
        self.write_file("detached.txt", message);
        let oid = self.commit_to(None, message);
        // Restore the index and working tree to HEAD.
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo
            .reset(head.as_object(), ResetType::Hard, None)
            .expect("Failed to reset");
        let _ = std::fs::remove_file(self.path().join("detached.txt"));
        oid
    }

    fn commit_to(&self, update_ref: Option<&str>, message: &str) -> Oid {
        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(update_ref, &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a lightweight tag pointing to the given OID.
    pub fn tag_lightweight(&self, name: &str, oid: Oid) {
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo
            .tag_lightweight(name, &obj, false)
            .expect("Failed to create lightweight tag");
    }

    /// Create an annotated tag pointing to the given OID.
    pub fn tag_annotated(&self, name: &str, oid: Oid, message: &str) {
        let sig = self.signature();
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo
            .tag(name, &obj, &sig, message, false)
            .expect("Failed to create annotated tag");
    }

    /// Short name of the checked-out branch.
    pub fn branch(&self) -> String {
        let head = self.repo.find_reference("HEAD").unwrap();
        head.symbolic_target()
            .and_then(|t| t.strip_prefix("refs/heads/"))
            .unwrap_or("master")
            .to_string()
    }

    /// Add a bare `origin` and push the current branch with upstream tracking.
    pub fn with_bare_remote(&self) -> BareRemote {
        let remote = BareRemote::new();
        self.repo
            .remote("origin", remote.path().to_str().expect("Invalid remote path"))
            .expect("Failed to add origin remote");
        if self.repo.head().is_ok() {
            self.git(&["push", "-u", "origin", &self.branch()]);
        }
        remote
    }

    /// Move HEAD and the working tree back `n` commits.
    pub fn reset_back(&self, n: usize) {
        let target = self
            .repo
            .revparse_single(&format!("HEAD~{}", n))
            .expect("Failed to resolve target");
        self.repo
            .reset(&target, ResetType::Hard, None)
            .expect("Failed to reset");
    }

    pub fn head_id(&self) -> Oid {
        self.repo.head().unwrap().peel_to_commit().unwrap().id()
    }

    /// Run the git binary in the working tree, panicking on failure.
    pub fn git(&self, args: &[&str]) -> String {
        run_git(self.path(), args)
    }
}

/// A bare repository standing in for the remote.
pub struct BareRemote {
    pub dir: tempfile::TempDir,
}

impl BareRemote {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create remote dir");
        Repository::init_bare(dir.path()).expect("Failed to init bare repo");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn open(&self) -> Repository {
        Repository::open_bare(self.path()).expect("Failed to open bare repo")
    }

    /// Full message of the commit an (annotated) tag points at.
    pub fn tagged_commit_message(&self, tag: &str) -> Option<String> {
        let repo = self.open();
        let reference = repo.find_reference(&format!("refs/tags/{}", tag)).ok()?;
        let commit = reference.peel_to_commit().ok()?;
        commit.message().map(String::from)
    }
}

fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", TEST_NAME)
        .env("GIT_AUTHOR_EMAIL", TEST_EMAIL)
        .env("GIT_COMMITTER_NAME", TEST_NAME)
        .env("GIT_COMMITTER_EMAIL", TEST_EMAIL)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

// ============================================
// Collaborator doubles
// ============================================

/// One scripted answer for [`ScriptedPrompter`].
#[derive(Debug, Clone)]
pub enum Answer {
    /// Typed text. An empty string accepts the default.
    Input(String),
    Confirm(bool),
    Select(usize),
    Edit(String),
}

/// Prompter that replays a fixed script and records every prompt shown.
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Answer {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("No scripted answer left for prompt '{}'", prompt))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str, default: &str) -> Result<String, dialoguer::Error> {
        match self.next(prompt) {
            Answer::Input(text) if text.trim().is_empty() => Ok(default.to_string()),
            Answer::Input(text) => Ok(text),
            other => panic!("Expected Input for '{}', got {:?}", prompt, other),
        }
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool, dialoguer::Error> {
        match self.next(prompt) {
            Answer::Confirm(yes) => Ok(yes),
            other => panic!("Expected Confirm for '{}', got {:?}", prompt, other),
        }
    }

    fn select(
        &mut self,
        prompt: &str,
        _items: &[String],
        _default: usize,
    ) -> Result<usize, dialoguer::Error> {
        match self.next(prompt) {
            Answer::Select(index) => Ok(index),
            other => panic!("Expected Select for '{}', got {:?}", prompt, other),
        }
    }

    fn edit(&mut self, _current: &str) -> Result<String, dialoguer::Error> {
        match self.next("editor") {
            Answer::Edit(text) => Ok(text),
            other => panic!("Expected Edit, got {:?}", other),
        }
    }
}

/// A recorded `LlmExecutor::run` call.
#[derive(Debug, Clone)]
pub struct LlmCall {
    pub model: String,
    pub prompt: String,
    pub timeout: Duration,
}

/// Executor that replays canned responses. Once they run out every call
/// times out.
pub struct CannedExecutor {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    models: Vec<ModelInfo>,
    pub calls: Mutex<Vec<LlmCall>>,
}

impl CannedExecutor {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            models: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// An executor whose every call times out.
    pub fn timing_out() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_models(mut self, ids: &[&str]) -> Self {
        self.models = ids
            .iter()
            .map(|id| ModelInfo {
                id: id.to_string(),
                label: format!("Test: {}", id),
            })
            .collect();
        self
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmExecutor for CannedExecutor {
    async fn run(&self, model: &str, prompt: &str, timeout: Duration) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(LlmCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            timeout,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::Timeout(timeout.as_secs())))
    }

    async fn list_models(&self) -> Vec<ModelInfo> {
        self.models.clone()
    }
}

/// In-memory `ConfigStore` that records writes.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<(String, String), String>>,
    pub writes: RefCell<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn with(entries: &[(ConfigScope, &str, &str)]) -> Self {
        let store = Self::default();
        for (scope, key, value) in entries {
            store
                .values
                .borrow_mut()
                .insert((scope.to_string(), key.to_string()), value.to_string());
        }
        store
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.borrow().clone()
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, scope: ConfigScope, key: &str) -> Option<String> {
        self.values
            .borrow()
            .get(&(scope.to_string(), key.to_string()))
            .cloned()
    }

    fn set_repo(&self, key: &str, value: &str) -> Result<(), GitError> {
        self.values.borrow_mut().insert(
            (ConfigScope::Repo.to_string(), key.to_string()),
            value.to_string(),
        );
        self.writes
            .borrow_mut()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}
