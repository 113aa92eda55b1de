//! Application preferences stored in `settings.json`.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use budget_types::Currency;

/// Process-wide preferences, read once at startup and passed down explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub general: GeneralSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level for the persistence layer when `RUST_LOG` is unset
    pub debug_level: String,
    /// Display currency for amounts
    pub currency: Currency,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug_level: "debug".to_string(),
            currency: Currency::default(),
        }
    }
}

impl AppSettings {
    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Fallback log filter built from `debug_level`.
    pub fn log_filter(&self) -> String {
        format!("info,budget_repo={}", self.general.debug_level)
    }
}
