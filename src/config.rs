use crate::summarization::ModelKind;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CHUNK_MAX_CHARS: usize = 800;
const DEFAULT_CHUNK_SUMMARY_MIN_LENGTH: usize = 80;
const DEFAULT_CHUNK_SUMMARY_MAX_LENGTH: usize = 200;
const DEFAULT_FINAL_MIN_LENGTH: usize = 100;
const DEFAULT_LANGUAGE_SAMPLE_CHARS: usize = 500;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summarization server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Backend family used to serve the summarization models.
    pub summarizer_provider: SummarizerProvider,
    /// Base URL of the Hugging Face compatible inference endpoint.
    pub hf_api_url: String,
    /// Optional bearer token for the inference endpoint.
    pub hf_api_token: Option<String>,
    /// Checkpoint identifier for the mBART-50 backend.
    pub mbart_model: String,
    /// Checkpoint identifier for the mT5 backend.
    pub mt5_model: String,
    /// Checkpoint identifier for the IndicBART backend.
    pub indicbart_model: String,
    /// Models treated as unavailable at startup.
    pub disabled_models: Vec<ModelKind>,
    /// Per-call timeout applied to backend requests.
    pub backend_timeout_secs: u64,
    /// Maximum characters per chunk handed to the backend.
    pub chunk_max_chars: usize,
    /// Minimum generation length for chunk-level summaries.
    pub chunk_summary_min_length: usize,
    /// Maximum generation length for chunk-level summaries.
    pub chunk_summary_max_length: usize,
    /// Minimum generation length for the final pass.
    pub final_min_length: usize,
    /// Number of leading characters inspected for language detection.
    pub language_sample_chars: usize,
    /// Language code reported for Latin-script input.
    pub default_latin_language: String,
    /// Upper bound on multipart request bodies.
    pub max_upload_bytes: usize,
}

/// Supported backend families.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerProvider {
    /// Hugging Face inference protocol over HTTP.
    HuggingFace,
    /// Local lead-sentence summarizer; no model server required.
    Extractive,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            server_port: parse_optional("SERVER_PORT")?,
            summarizer_provider: load_env_optional("SUMMARIZER_PROVIDER")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("SUMMARIZER_PROVIDER".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(SummarizerProvider::HuggingFace),
            hf_api_url: load_env_optional("HF_API_URL")
                .unwrap_or_else(|| DEFAULT_HF_API_URL.to_string()),
            hf_api_token: load_env_optional("HF_API_TOKEN"),
            mbart_model: load_env_optional("MBART_MODEL")
                .unwrap_or_else(|| ModelKind::MBart.default_checkpoint().to_string()),
            mt5_model: load_env_optional("MT5_MODEL")
                .unwrap_or_else(|| ModelKind::Mt5.default_checkpoint().to_string()),
            indicbart_model: load_env_optional("INDICBART_MODEL")
                .unwrap_or_else(|| ModelKind::IndicBart.default_checkpoint().to_string()),
            disabled_models: load_env_optional("DISABLED_MODELS")
                .map(|value| parse_model_list(&value))
                .transpose()?
                .unwrap_or_default(),
            backend_timeout_secs: parse_or("BACKEND_TIMEOUT_SECS", DEFAULT_BACKEND_TIMEOUT_SECS)?,
            chunk_max_chars: parse_or("CHUNK_MAX_CHARS", DEFAULT_CHUNK_MAX_CHARS)?,
            chunk_summary_min_length: parse_or(
                "CHUNK_SUMMARY_MIN_LENGTH",
                DEFAULT_CHUNK_SUMMARY_MIN_LENGTH,
            )?,
            chunk_summary_max_length: parse_or(
                "CHUNK_SUMMARY_MAX_LENGTH",
                DEFAULT_CHUNK_SUMMARY_MAX_LENGTH,
            )?,
            final_min_length: parse_or("FINAL_MIN_LENGTH", DEFAULT_FINAL_MIN_LENGTH)?,
            language_sample_chars: parse_or(
                "LANGUAGE_SAMPLE_CHARS",
                DEFAULT_LANGUAGE_SAMPLE_CHARS,
            )?,
            default_latin_language: load_env_optional("DEFAULT_LATIN_LANGUAGE")
                .unwrap_or_else(|| "en".to_string()),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        };

        if config.chunk_max_chars == 0 {
            return Err(ConfigError::InvalidValue("CHUNK_MAX_CHARS".into()));
        }
        if config.disabled_models.contains(&ModelKind::MBart) {
            // mBART is the designated fallback for every route.
            return Err(ConfigError::InvalidValue("DISABLED_MODELS".into()));
        }

        Ok(config)
    }

    /// Checkpoint configured for the given model family.
    pub fn checkpoint_for(&self, kind: ModelKind) -> &str {
        match kind {
            ModelKind::IndicBart => &self.indicbart_model,
            ModelKind::MBart => &self.mbart_model,
            ModelKind::Mt5 => &self.mt5_model,
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    Ok(parse_optional(key)?.unwrap_or(default))
}

fn parse_model_list(value: &str) -> Result<Vec<ModelKind>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse()
                .map_err(|()| ConfigError::InvalidValue(format!("DISABLED_MODELS ({item})")))
        })
        .collect()
}

impl FromStr for SummarizerProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "extractive" => Ok(Self::Extractive),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        provider = ?config.summarizer_provider,
        hf_api_url = %config.hf_api_url,
        server_port = ?config.server_port,
        disabled_models = ?config.disabled_models,
        chunk_max_chars = config.chunk_max_chars,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_lists_case_insensitively() {
        let models = parse_model_list(" MT5, indicbart ,").expect("model list");
        assert_eq!(models, vec![ModelKind::Mt5, ModelKind::IndicBart]);
    }

    #[test]
    fn rejects_unknown_models() {
        let error = parse_model_list("mt5,gpt").unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue(message) if message.contains("gpt")));
    }

    #[test]
    fn provider_parsing_accepts_aliases() {
        assert_eq!("HF".parse::<SummarizerProvider>(), Ok(SummarizerProvider::HuggingFace));
        assert_eq!("extractive".parse::<SummarizerProvider>(), Ok(SummarizerProvider::Extractive));
        assert!("ollama".parse::<SummarizerProvider>().is_err());
    }
}
