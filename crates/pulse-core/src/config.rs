use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ASSISTANT_LABEL: &str = "Pulse AI";

/// Input grows up to this many rows before it scrolls internally
pub const DEFAULT_MAX_INPUT_ROWS: u16 = 8;

pub fn default_example_queries() -> Vec<String> {
    vec![
        "I have a persistent cough and fever".to_string(),
        "I have a headache and feel nauseous".to_string(),
        "I feel fatigue and muscle weakness".to_string(),
    ]
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_url: Option<String>,
    pub max_input_rows: Option<u16>,
    pub example_queries: Option<Vec<String>>,
    pub assistant_label: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            server_url: None,
            max_input_rows: None,
            example_queries: None,
            assistant_label: None,
        }
    }

    /// Load from the standard location, returning defaults when no file exists
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// A config with every field filled in, suitable for writing as a template
    pub fn with_defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            max_input_rows: Some(DEFAULT_MAX_INPUT_ROWS),
            example_queries: Some(default_example_queries()),
            assistant_label: Some(DEFAULT_ASSISTANT_LABEL.to_string()),
        }
    }

    /// Server URL precedence: explicit override (flag or env), then file, then default
    pub fn server_url(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(str::to_string)
            .or_else(|| self.server_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    pub fn max_input_rows(&self) -> u16 {
        self.max_input_rows.unwrap_or(DEFAULT_MAX_INPUT_ROWS).max(1)
    }

    pub fn example_queries(&self) -> Vec<String> {
        self.example_queries
            .clone()
            .unwrap_or_else(default_example_queries)
    }

    pub fn assistant_label(&self) -> String {
        self.assistant_label
            .clone()
            .unwrap_or_else(|| DEFAULT_ASSISTANT_LABEL.to_string())
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;

        Ok(config_dir.join("pulse-chat").join("config.json"))
    }
}
