//! Configuration loading from environment.

use std::env;
use std::path::PathBuf;

/// Process configuration. Command-line flags take precedence.
pub struct Config {
    pub settings_path: PathBuf,
    pub project_dir: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let settings_path = env::var("BUDGET_SETTINGS_PATH")
            .unwrap_or_else(|_| "settings.json".to_string())
            .into();

        let project_dir = env::var_os("BUDGET_PROJECT_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Self {
            settings_path,
            project_dir,
        }
    }
}
