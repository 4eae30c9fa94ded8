//! Engine settings.
//!
//! Settings are loaded from (in priority order):
//! 1. Environment variables (RAMPART prefix, `__` separator)
//! 2. Config file (rampart.toml by default)
//! 3. Defaults

use serde::{Deserialize, Serialize};

use crate::error::RampartError;

/// Tunables for the risk engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// How many loopless paths to enumerate per crown-jewel target.
    pub default_k: usize,
    /// Remediation budget: maximum actions per plan.
    pub default_max_actions: usize,
    /// Directory for the serialized-graph cache. None disables caching.
    pub cache_dir: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_k: 10,
            default_max_actions: 6,
            cache_dir: None,
        }
    }
}

impl EngineSettings {
    /// Load settings from `<file_prefix>.toml` (optional) and the
    /// environment. Missing keys fall back to defaults.
    pub fn load(file_prefix: &str) -> Result<Self, RampartError> {
        let defaults = Self::default();

        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("RAMPART")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| RampartError::Config(e.to_string()))?;

        Ok(Self {
            default_k: cfg
                .get_int("engine.default_k")
                .map(|v| v as usize)
                .unwrap_or(defaults.default_k),
            default_max_actions: cfg
                .get_int("engine.default_max_actions")
                .map(|v| v as usize)
                .unwrap_or(defaults.default_max_actions),
            cache_dir: cfg.get_string("engine.cache_dir").ok(),
        })
    }
}
