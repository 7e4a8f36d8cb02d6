//! Interactive prompts.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Editor, Input, Select};

/// The interactive prompt collaborator.
///
/// The review loop only talks to the user through this trait so it can be
/// driven by scripted answers in tests.
pub trait Prompter {
    /// Read a line of text. Blank input returns `default`.
    fn input(&mut self, prompt: &str, default: &str) -> Result<String, dialoguer::Error>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, dialoguer::Error>;

    /// Pick one of `items`, returning its index.
    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<usize, dialoguer::Error>;

    /// Edit a multi-line text. Returns `current` when the edit is abandoned.
    fn edit(&mut self, current: &str) -> Result<String, dialoguer::Error>;
}

/// Prompter backed by dialoguer widgets on the controlling terminal.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&mut self, prompt: &str, default: &str) -> Result<String, dialoguer::Error> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .show_default(!default.is_empty())
            .allow_empty(true)
            .interact_text()?;
        let value = value.trim();
        Ok(if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        })
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, dialoguer::Error> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
    }

    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<usize, dialoguer::Error> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
    }

    fn edit(&mut self, current: &str) -> Result<String, dialoguer::Error> {
        Ok(Editor::new()
            .edit(current)?
            .unwrap_or_else(|| current.to_string()))
    }
}
