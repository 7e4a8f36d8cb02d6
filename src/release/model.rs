//! Picking the model used for refinement.

use tracing::debug;

use crate::config::{DEFAULT_MODEL, GupConfig, MODEL_KEY};
use crate::error::GupError;
use crate::git::ConfigStore;
use crate::llm::ModelInfo;
use crate::ui::{self, Prompter};

/// Decide which model to use for this run.
///
/// The configured model wins when `llm` lists it. With an empty catalogue the
/// configured model (or the default) is used as-is. Otherwise the user picks
/// one and the choice is saved to `gup.model`.
pub fn choose_model(
    config: &GupConfig,
    models: &[ModelInfo],
    prompter: &mut dyn Prompter,
    store: &dyn ConfigStore,
) -> Result<String, GupError> {
    if models.is_empty() {
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        debug!("No model catalogue, using {}", model);
        return Ok(model);
    }

    if let Some(configured) = config
        .model
        .as_ref()
        .filter(|c| models.iter().any(|m| &m.id == *c))
    {
        return Ok(configured.clone());
    }

    let model = select_model(models, None, prompter)?;
    store.set_repo(MODEL_KEY, &model)?;
    Ok(model)
}

/// Let the user pick from `models`, preselecting `current` when listed.
///
/// Falls back to free text input when the catalogue is empty.
pub fn select_model(
    models: &[ModelInfo],
    current: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<String, GupError> {
    if models.is_empty() {
        let model = prompter.input("Model id", current.unwrap_or(DEFAULT_MODEL))?;
        return Ok(model);
    }

    ui::section("AI MODEL SELECTION");
    let labels: Vec<String> = models.iter().map(|m| m.label.clone()).collect();
    let default = current
        .and_then(|c| models.iter().position(|m| m.id == c))
        .unwrap_or(0);
    let index = prompter.select("Select model", &labels, default)?;
    Ok(models[index.min(models.len() - 1)].id.clone())
}
