//! Run configuration loaded once at startup from the `gup.*` git config
//! namespace.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::commit::SUMMARY_LIMIT;
use crate::git::{ConfigStore, get_layered};

/// Model used when none is configured and `llm models` lists nothing.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default AI request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 12;
pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 60;

/// Character budget for the staged diff embedded in the prompt.
pub const DIFF_BUDGET: usize = 15_000;

/// Character budget for the diff on the automatic retry.
pub const RETRY_DIFF_BUDGET: usize = 5_000;

pub const DEFAULT_REMOTE: &str = "origin";

/// Environment variable that overrides the configured timeout.
const TIMEOUT_ENV_VAR: &str = "GUP_TIMEOUT";

pub const MODEL_KEY: &str = "gup.model";
pub const TIMEOUT_KEY: &str = "gup.timeout";
pub const REMOTE_KEY: &str = "gup.remote";
pub const DASHBOARD_KEY: &str = "gup.dashboard";
pub const COUNTDOWN_KEY: &str = "gup.countdown";
pub const AUTO_RETRY_KEY: &str = "gup.autoretry";

/// Optional behaviors that differ between interactive and minimal runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Show the repository status screen when there is nothing to release.
    pub dashboard: bool,
    /// Draw a live countdown while waiting on the model.
    pub countdown: bool,
    /// Retry a failed refinement once with a smaller diff.
    pub auto_retry: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            dashboard: true,
            countdown: true,
            auto_retry: true,
        }
    }
}

/// Immutable configuration for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GupConfig {
    /// Model id from `gup.model`, if any.
    pub model: Option<String>,
    pub timeout_secs: u64,
    pub summary_limit: usize,
    pub diff_budget: usize,
    pub retry_diff_budget: usize,
    pub remote: String,
    pub features: FeatureFlags,
}

impl Default for GupConfig {
    fn default() -> Self {
        Self {
            model: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            summary_limit: SUMMARY_LIMIT,
            diff_budget: DIFF_BUDGET,
            retry_diff_budget: RETRY_DIFF_BUDGET,
            remote: DEFAULT_REMOTE.to_string(),
            features: FeatureFlags::default(),
        }
    }
}

impl GupConfig {
    /// Load from git config (repo scope first, then global) and environment.
    pub fn load(store: &dyn ConfigStore) -> Self {
        let defaults = Self::default();

        let timeout_secs = timeout_from_env().unwrap_or_else(|| {
            get_layered(store, TIMEOUT_KEY)
                .map(|raw| clamp_timeout(&raw))
                .unwrap_or(DEFAULT_TIMEOUT_SECS)
        });

        let flag = |key: &str, default: bool| {
            get_layered(store, key)
                .and_then(|raw| {
                    let parsed = parse_bool(&raw);
                    if parsed.is_none() {
                        warn!("Ignoring non-boolean {} value '{}'", key, raw);
                    }
                    parsed
                })
                .unwrap_or(default)
        };

        Self {
            model: get_layered(store, MODEL_KEY),
            timeout_secs,
            remote: get_layered(store, REMOTE_KEY).unwrap_or(defaults.remote),
            features: FeatureFlags {
                dashboard: flag(DASHBOARD_KEY, defaults.features.dashboard),
                countdown: flag(COUNTDOWN_KEY, defaults.features.countdown),
                auto_retry: flag(AUTO_RETRY_KEY, defaults.features.auto_retry),
            },
            ..defaults
        }
    }

    /// The AI request deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parse a timeout in seconds, clamped to 1..=60. Garbage yields the default.
pub fn clamp_timeout(raw: &str) -> u64 {
    match raw.trim().parse::<i64>() {
        Ok(secs) => secs.clamp(MIN_TIMEOUT_SECS as i64, MAX_TIMEOUT_SECS as i64) as u64,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    }
}

/// Read the timeout override from the environment.
///
/// Logs a warning if the environment variable is set but is not an integer.
fn timeout_from_env() -> Option<u64> {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.trim().is_empty() => {
            if v.trim().parse::<i64>().is_ok() {
                Some(clamp_timeout(&v))
            } else {
                warn!("Invalid {} value '{}', ignoring", TIMEOUT_ENV_VAR, v);
                None
            }
        }
        _ => None,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
