//! Service configuration read from the environment.
//!
//! Binaries load `.env` with `dotenvy` first, then call `from_env`. Tests
//! build configs with the `with_*` methods or [`AnalysisConfig::from_lookup`].

use crate::engines::DedupMode;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_ANALYSIS_PORT: u16 = 8000;
pub const DEFAULT_GAME_PORT: u16 = 8001;
pub const DEFAULT_ADAPTER_PATH: &str = "tone_lora_model";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(lookup, key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                message: format!("'{raw}': {e}"),
            })
        })
        .transpose()
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

// ============================================================================
// Analysis service
// ============================================================================

/// Settings for the analysis service and its model backends.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub host: String,
    pub port: u16,
    /// Word list for the tagger and spell checker; built-in list when unset.
    pub lexicon_path: Option<PathBuf>,
    pub dedup: DedupMode,
    /// Hugging Face style text-classification endpoint for NLI.
    pub nli_endpoint: Option<String>,
    /// Hugging Face style text2text endpoint serving the tone adapter.
    pub tone_endpoint: Option<String>,
    pub tone_adapter_path: PathBuf,
    pub tone_base_model: Option<String>,
    pub hf_api_token: Option<String>,
    pub model_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_ANALYSIS_PORT,
            lexicon_path: None,
            dedup: DedupMode::default(),
            nli_endpoint: None,
            tone_endpoint: None,
            tone_adapter_path: PathBuf::from(DEFAULT_ADAPTER_PATH),
            tone_base_model: None,
            hf_api_token: None,
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: non_empty(&lookup, "HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            lexicon_path: non_empty(&lookup, "LEXICON_PATH").map(PathBuf::from),
            dedup: parse_var(&lookup, "DEDUP_MODE")?.unwrap_or(defaults.dedup),
            nli_endpoint: non_empty(&lookup, "NLI_ENDPOINT"),
            tone_endpoint: non_empty(&lookup, "TONE_ENDPOINT"),
            tone_adapter_path: non_empty(&lookup, "TONE_ADAPTER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.tone_adapter_path),
            tone_base_model: non_empty(&lookup, "TONE_BASE_MODEL"),
            hf_api_token: non_empty(&lookup, "HF_API_TOKEN"),
            model_timeout: parse_var::<u64>(&lookup, "MODEL_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.model_timeout),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_lexicon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon_path = Some(path.into());
        self
    }

    pub fn with_dedup(mut self, dedup: DedupMode) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_nli_endpoint(mut self, url: impl Into<String>) -> Self {
        self.nli_endpoint = Some(url.into());
        self
    }

    pub fn with_tone_endpoint(mut self, url: impl Into<String>) -> Self {
        self.tone_endpoint = Some(url.into());
        self
    }

    pub fn with_tone_adapter_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tone_adapter_path = path.into();
        self
    }
}

// ============================================================================
// Game service
// ============================================================================

/// Settings for the game backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub host: String,
    pub port: u16,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_base_url: Option<String>,
    /// JSON snapshot loaded at startup and written at shutdown.
    pub state_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_GAME_PORT,
            groq_api_key: None,
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            groq_base_url: None,
            state_path: None,
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: non_empty(&lookup, "HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            groq_api_key: non_empty(&lookup, "GROQ_API_KEY"),
            groq_model: non_empty(&lookup, "GROQ_MODEL").unwrap_or(defaults.groq_model),
            groq_base_url: non_empty(&lookup, "GROQ_BASE_URL"),
            state_path: non_empty(&lookup, "GAME_STATE_PATH").map(PathBuf::from),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }
}
