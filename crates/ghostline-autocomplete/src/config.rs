/// Configuration loading and validation for the autocomplete plugin
use crate::decoration::DEFAULT_GHOST_CLASS;
use crate::error::{AutocompleteError, AutocompleteResult};
use crate::keybind::KeyCombo;
use crate::word::DEFAULT_LOOKBACK_CHARS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Idle time after the last keystroke before a fetch is issued
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Request timeout for the HTTP suggestion endpoint
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Autocomplete plugin settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Debounce delay in milliseconds
    pub debounce_ms: u64,
    /// Characters read before the cursor on the first extraction pass
    pub lookback_chars: usize,
    /// Key that accepts the displayed suggestion
    pub accept_key: KeyCombo,
    /// Class attached to the ghost-text decoration
    pub ghost_class: String,
    /// Remote suggestion endpoint, if suggestions come over HTTP
    pub endpoint: Option<EndpointConfig>,
}

impl AutocompleteConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Check value ranges
    pub fn validate(&self) -> AutocompleteResult<()> {
        if self.lookback_chars == 0 {
            return Err(AutocompleteError::ConfigError(
                "lookback_chars must be at least 1".to_string(),
            ));
        }

        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.base_url.starts_with("http://")
                || endpoint.base_url.starts_with("https://"))
            {
                return Err(AutocompleteError::ConfigError(format!(
                    "endpoint base_url must be an http(s) URL, got '{}'",
                    endpoint.base_url
                )));
            }
            if endpoint.timeout_ms == 0 {
                return Err(AutocompleteError::ConfigError(
                    "endpoint timeout_ms must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            lookback_chars: DEFAULT_LOOKBACK_CHARS,
            accept_key: KeyCombo::default(),
            ghost_class: DEFAULT_GHOST_CLASS.to_string(),
            endpoint: None,
        }
    }
}

/// HTTP suggestion endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL; `/autocomplete` is appended
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

/// Loads [`AutocompleteConfig`] from files or strings
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub fn load_from_yaml(path: &Path) -> AutocompleteResult<AutocompleteConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Yaml)
    }

    /// Load configuration from a JSON file
    pub fn load_from_json(path: &Path) -> AutocompleteResult<AutocompleteConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Json)
    }

    /// Load configuration from a file, picking the format by extension
    pub fn load_from_path(path: &Path) -> AutocompleteResult<AutocompleteConfig> {
        match ConfigFormat::from_path(path) {
            Some(ConfigFormat::Yaml) => Self::load_from_yaml(path),
            Some(ConfigFormat::Json) => Self::load_from_json(path),
            None => Err(AutocompleteError::ConfigError(format!(
                "Unsupported configuration file: {}",
                path.display()
            ))),
        }
    }

    /// Load configuration from a string
    pub fn load_from_string(
        content: &str,
        format: ConfigFormat,
    ) -> AutocompleteResult<AutocompleteConfig> {
        let config: AutocompleteConfig = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }
}
