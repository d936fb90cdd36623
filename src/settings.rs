use async_openai::{Client, config::OpenAIConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::session::{Difficulty, TurnPolicy};

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

// Application settings, read from ~/detective/data/settings.json.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub api_key: Option<String>, // Overridden by GROQ_API_KEY.
    pub api_base: String,
    pub interrogation_model: String,
    pub story_model: String,
    pub transcription_model: String,
    pub difficulty: Difficulty,
    pub turn_policy: TurnPolicy,
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            interrogation_model: "llama-3.1-8b-instant".to_string(),
            story_model: "llama-3.3-70b-versatile".to_string(),
            transcription_model: "whisper-large-v3".to_string(),
            difficulty: Difficulty::Easy,
            turn_policy: TurnPolicy::ConsumeOnFailure,
            debug_mode: false,
        }
    }
}

pub fn data_dir() -> Result<PathBuf, ConfigError> {
    dir::home_dir()
        .map(|home| home.join("detective").join("data"))
        .ok_or(ConfigError::NoHomeDirectory)
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("settings.json"))
    }

    // Missing file means defaults; a broken file is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::info!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_settings_from_file(path)
    }

    pub fn load_settings_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    /// The credential to use, environment first. Missing credential is fatal.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        pick_api_key(from_env, self.api_key.clone()).ok_or_else(|| {
            let location = Self::default_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "settings.json".to_string());
            ConfigError::MissingCredential(location)
        })
    }

    pub fn openai_config(&self, api_key: &str) -> OpenAIConfig {
        OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&self.api_base)
    }

    pub fn client(&self, api_key: &str) -> Client<OpenAIConfig> {
        Client::with_config(self.openai_config(api_key))
    }

    // Asynchronously validate an API key against the models endpoint.
    pub async fn validate_api_key(&self, api_key: &str) -> bool {
        match self.client(api_key).models().list().await {
            Ok(_) => true,
            Err(e) => {
                log::warn!("API key validation failed: {e}");
                false
            }
        }
    }
}

fn pick_api_key(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
    [from_env, from_file]
        .into_iter()
        .flatten()
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}
