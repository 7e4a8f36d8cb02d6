//! Model catalogue from `llm models`.

use std::time::Duration;

use tracing::{debug, warn};

use super::subprocess::run_llm_models;

/// How long `llm models` may take before the catalogue is treated as empty.
const LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// One selectable model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Id passed to `llm -m`.
    pub id: String,
    /// Full listing line shown in menus.
    pub label: String,
}

/// Parse `llm models` output into model ids.
///
/// Listing lines look like `OpenAI Chat: gpt-4o-mini (aliases: 4o-mini)`.
/// Group headings (lines ending in `:`) and blank lines are skipped. The id
/// is the text after the last `:` and before any `(`. Duplicate ids keep
/// their first listing.
pub fn parse_models(text: &str) -> Vec<ModelInfo> {
    let mut models: Vec<ModelInfo> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.ends_with(':') {
            continue;
        }

        let core = line.split('(').next().unwrap_or(line);
        let id = core.rsplit(':').next().unwrap_or(core).trim();
        if !is_printable_id(id) || models.iter().any(|m| m.id == id) {
            continue;
        }

        models.push(ModelInfo {
            id: id.to_string(),
            label: line.to_string(),
        });
    }

    models
}

fn is_printable_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_graphic())
}

/// List available models. Any failure yields an empty catalogue.
pub async fn list_models() -> Vec<ModelInfo> {
    match run_llm_models(LIST_TIMEOUT).await {
        Ok(text) => {
            let models = parse_models(&text);
            debug!("llm lists {} models", models.len());
            models
        }
        Err(e) => {
            warn!("Could not list llm models: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
OpenAI Chat: gpt-4o (aliases: 4o)
OpenAI Chat: gpt-4o-mini (aliases: 4o-mini)

Anthropic Messages:
Anthropic Messages: anthropic/claude-3-5-haiku-latest (aliases: claude-3.5-haiku)
Default: gpt-4o-mini
";

    #[test]
    fn test_parse_models_extracts_ids() {
        let ids: Vec<String> = parse_models(LISTING).into_iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec!["gpt-4o", "gpt-4o-mini", "anthropic/claude-3-5-haiku-latest"]
        );
    }

    #[test]
    fn test_parse_models_keeps_full_label() {
        let models = parse_models(LISTING);
        assert_eq!(models[0].label, "OpenAI Chat: gpt-4o (aliases: 4o)");
    }

    #[test]
    fn test_parse_models_skips_ids_with_spaces() {
        let models = parse_models("Plugin: some model name\nLocal: llama3\n");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "llama3");
    }

    #[test]
    fn test_parse_models_empty() {
        assert!(parse_models("").is_empty());
        assert!(parse_models("\n  \nHeading:\n").is_empty());
    }

    #[test]
    fn test_parse_models_bare_id() {
        let models = parse_models("gemini-1.5-flash\n");
        assert_eq!(models[0].id, "gemini-1.5-flash");
    }
}
