//! gup - CLI entry point.

use std::error::Error;
use std::path::Path;
use std::process;

use clap::Parser;

use gup::llm::DefaultExecutor;
use gup::ui::{self, DialoguerPrompter};
use gup::run_release;

/// Stage, describe, version-tag and push the current repository.
#[derive(Parser, Debug)]
#[command(name = "gup")]
#[command(about = "Stage, describe, version-tag and push the current repository")]
#[command(version)]
struct Cli {}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with the review screen.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let _cli = Cli::parse();

    let mut prompter = DialoguerPrompter::default();
    match run_release(Path::new("."), &mut prompter, &DefaultExecutor).await {
        Ok(outcome) => tracing::debug!(?outcome, "Run finished"),
        Err(e) => {
            ui::error(&e.to_string());

            let mut source = e.source();
            while let Some(err) = source {
                ui::error(&format!("  Caused by: {err}"));
                source = err.source();
            }

            process::exit(e.exit_code());
        }
    }
}
