use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::retry::RetryConfig;

const CONFIGURE_HINT: &str = "Hint: run `skycast configure` and enter your API keys.";

/// Weather-provider section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for the weather provider. Required for live lookups.
    pub api_key: Option<String>,

    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_provider_base_url() -> String {
    "http://dataservice.accuweather.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_provider_base_url(),
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Weather-provider API key, or a hint to run the configure flow.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No weather provider API key configured.\n{CONFIGURE_HINT}"))
    }
}

/// Text-generation section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// API key for the text-generation service.
    pub api_key: Option<String>,

    #[serde(default = "default_summary_base_url")]
    pub base_url: String,

    #[serde(default = "default_summary_model")]
    pub model: String,

    /// Prompt length cap, in words, applied before sending.
    #[serde(default = "default_max_prompt_words")]
    pub max_prompt_words: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_summary_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_summary_model() -> String {
    "gemini-pro".to_string()
}

const fn default_max_prompt_words() -> usize {
    50
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_summary_base_url(),
            model: default_summary_model(),
            max_prompt_words: default_max_prompt_words(),
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

impl SummaryConfig {
    /// Text-generation API key, or a hint to run the configure flow.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No text-generation API key configured.\n{CONFIGURE_HINT}"))
    }
}

/// Top-level configuration stored on disk.
///
/// Loaded once at startup and treated as immutable for the lifetime of a
/// lookup; the only writer is `skycast configure`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub summary: SummaryConfig,
}

impl Config {
    /// Load config from an explicit path (resolved by the CLI), or return an
    /// empty default if the file doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_provider_api_key(&mut self, api_key: String) {
        self.provider.api_key = Some(api_key);
    }

    pub fn set_summary_api_key(&mut self, api_key: String) {
        self.summary.api_key = Some(api_key);
    }
}
