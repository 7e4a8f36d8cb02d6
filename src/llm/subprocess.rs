//! `llm` CLI spawning.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::LlmError;

const LLM_BINARY: &str = "llm";

/// Check if the `llm` CLI is on `PATH`.
///
/// Uses the `which` crate for cross-platform executable detection.
pub fn check_llm_installed() -> Result<(), LlmError> {
    which::which(LLM_BINARY)
        .map(|_| ())
        .map_err(|_| LlmError::NotInstalled)
}

/// Run `llm -m <model>` with `prompt` on stdin and return its stdout.
///
/// If `deadline` passes first the child is killed and
/// `LlmError::Timeout` is returned. Partial output is discarded.
pub async fn run_llm(model: &str, prompt: &str, deadline: Duration) -> Result<String, LlmError> {
    check_llm_installed()?;

    let mut cmd = Command::new(LLM_BINARY);
    cmd.arg("-m").arg(model);
    run_with_deadline(cmd, Some(prompt), deadline).await
}

/// Run `llm models` and return its raw listing.
pub async fn run_llm_models(deadline: Duration) -> Result<String, LlmError> {
    check_llm_installed()?;

    let mut cmd = Command::new(LLM_BINARY);
    cmd.arg("models");
    run_with_deadline(cmd, None, deadline).await
}

/// Spawn `cmd`, optionally feed `input` on stdin, and collect stdout.
///
/// The child is spawned with `kill_on_drop`, so dropping the wait future on
/// timeout terminates it.
pub(crate) async fn run_with_deadline(
    mut cmd: Command,
    input: Option<&str>,
    deadline: Duration,
) -> Result<String, LlmError> {
    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(LlmError::SpawnFailed)?;
    let stdin = child.stdin.take();
    let input = input.map(str::to_owned);

    let work = async move {
        if let (Some(mut pipe), Some(text)) = (stdin, input) {
            match pipe.write_all(text.as_bytes()).await {
                Ok(()) => {}
                // The child may exit without reading its input.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("child closed stdin before reading the prompt");
                }
                Err(e) => return Err(LlmError::PromptWriteFailed(e)),
            }
            drop(pipe);
        }
        child.wait_with_output().await.map_err(LlmError::SpawnFailed)
    };

    let output = timeout(deadline, work)
        .await
        .map_err(|_| LlmError::Timeout(deadline.as_secs()))??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(LlmError::NonZeroExit { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
