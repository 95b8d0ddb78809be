use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_THRESHOLD: f32 = 0.2;
pub const DEFAULT_FALLBACK: &str = "Sorry, my knowledge is limited to quantum mechanics \
and I couldn't find an answer to that question in my knowledge base.";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub data_path: PathBuf,
    pub title_column: String,
    pub body_column: String,
    /// A match is returned only when its score is strictly above this value.
    pub threshold: f32,
    pub fallback_message: String,
    pub min_token_len: usize,
    pub stop_words: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/knowledge_base.csv"),
            title_column: "title".to_string(),
            body_column: "body".to_string(),
            threshold: DEFAULT_THRESHOLD,
            fallback_message: DEFAULT_FALLBACK.to_string(),
            min_token_len: 1,
            stop_words: false,
        }
    }
}

impl EngineConfig {
    pub fn with_data_path(path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: path.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if self.title_column.trim().is_empty() {
            return Err(ConfigError::EmptyColumn("title"));
        }
        if self.body_column.trim().is_empty() {
            return Err(ConfigError::EmptyColumn("body"));
        }
        if self.min_token_len == 0 {
            return Err(ConfigError::MinTokenLen);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub empty_message_reply: String,
    pub unavailable_reply: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            empty_message_reply: "Please write something.".to_string(),
            unavailable_reply: "Error: the dataset could not be loaded.".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub server: ServerConfig,
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    config
        .engine
        .validate()
        .with_context(|| format!("Invalid [engine] section in {}", path.display()))?;

    Ok(config)
}
