//! Configuration loading and management for linksum.
//!
//! Loads settings from `linksum.toml`; the API key may be overridden by the
//! `GROQ_API_KEY` environment variable. A missing file means defaults.

use crate::agent::{WordRange, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "linksum.toml";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("failed to render config: {0}")]
    RenderError(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Completion model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier (e.g., "llama-3.1-8b-instant")
    pub name: String,
    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,
}

/// Bounds for the requested summary length, in words
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub min_words: u32,
    pub max_words: u32,
    pub step: u32,
    pub default_words: u32,
}

/// Content fetching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Path or name of the yt-dlp executable
    pub yt_dlp: String,
}

/// API keys configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groq_key: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from the default location (linksum.toml in cwd or home)
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = Config::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse and validate TOML text, without looking at the environment
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.groq_key = Some(key);
            }
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("linksum")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Check that the summary bounds make sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.summary;
        if s.min_words == 0 || s.min_words > s.max_words {
            return Err(ConfigError::Invalid(format!(
                "summary.min_words ({}) must be between 1 and summary.max_words ({})",
                s.min_words, s.max_words
            )));
        }
        if s.step == 0 {
            return Err(ConfigError::Invalid("summary.step must be positive".into()));
        }
        if !self.word_range().contains(s.default_words) {
            return Err(ConfigError::Invalid(format!(
                "summary.default_words ({}) is outside {}..={}",
                s.default_words, s.min_words, s.max_words
            )));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn word_range(&self) -> WordRange {
        WordRange::new(self.summary.min_words, self.summary.max_words, self.summary.step)
    }

    /// Render as TOML with the API key left out
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        shown.api.groq_key = None;
        Ok(toml::to_string_pretty(&shown)?)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        let range = WordRange::default();
        Self {
            min_words: range.min,
            max_words: range.max,
            step: range.step,
            default_words: crate::agent::DEFAULT_TARGET_WORDS,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("linksum/", env!("CARGO_PKG_VERSION")).to_string(),
            yt_dlp: "yt-dlp".to_string(),
        }
    }
}
