//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables holding provider credentials
pub const SERPER_API_KEY_ENV: &str = "SERPER_API_KEY";
pub const OMDB_API_KEY_ENV: &str = "OMDB_API_KEY";
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const NEBIUS_API_KEY_ENV: &str = "NEBIUS_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub providers: ProvidersConfig,
    pub recommendation: RecommendationConfig,
    pub chat: ChatConfig,
    pub transcription: TranscriptionConfig,
    pub image_generation: ImageGenerationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body, mostly relevant for audio uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// One upstream API: where it lives and the credential to present
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// The configured key, treating an empty string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    pub serper: ProviderConfig,
    pub omdb: ProviderConfig,
    pub groq: ProviderConfig,
    pub nebius: ProviderConfig,
}

/// Limits for the recommendation fan-out
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_hits_per_keyword")]
    pub hits_per_keyword: usize,
    #[serde(default = "default_actor_keywords")]
    pub actor_keywords: usize,
}

fn default_max_results() -> usize {
    5
}

fn default_hits_per_keyword() -> usize {
    3
}

fn default_actor_keywords() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_model")]
    pub default_model: String,
    #[serde(default = "default_chat_temperature")]
    pub default_temperature: f32,
    #[serde(default = "default_chat_max_tokens")]
    pub default_max_tokens: u32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_chat_model() -> String {
    "meta-llama/llama-4-scout-17b-16e-instruct".to_string()
}

fn default_chat_temperature() -> f32 {
    0.7
}

fn default_chat_max_tokens() -> u32 {
    1024
}

fn default_system_prompt() -> String {
    "You are a helpful assistant. Provide clear, accurate, and concise answers to user queries."
        .to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionConfig {
    #[serde(default = "default_transcription_model")]
    pub model: String,
    #[serde(default = "default_transcription_prompt")]
    pub prompt: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub temperature: f32,
}

fn default_transcription_model() -> String {
    "whisper-large-v3-turbo".to_string()
}

fn default_transcription_prompt() -> String {
    "Specify context or spelling".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageGenerationConfig {
    #[serde(default = "default_image_model")]
    pub model: String,
    #[serde(default = "default_image_side")]
    pub width: u32,
    #[serde(default = "default_image_side")]
    pub height: u32,
    #[serde(default = "default_inference_steps")]
    pub num_inference_steps: u32,
}

fn default_image_model() -> String {
    "black-forest-labs/flux-schnell".to_string()
}

fn default_image_side() -> u32 {
    1024
}

fn default_inference_steps() -> u32 {
    4
}

impl Settings {
    /// Load settings from `config/gateway.yaml`, `MEDIA_GATEWAY__*` overrides
    /// and the provider credential variables of the process environment
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/gateway.yaml", |name| std::env::var(name).ok())
    }

    /// Load settings from a specific file, resolving credentials through `lookup`
    pub fn load_from_path<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();

        let format = if path.extension().map_or(false, |ext| ext == "toml") {
            FileFormat::Toml
        } else {
            FileFormat::Yaml
        };

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("server.max_upload_bytes", default_max_upload_bytes() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .set_default("providers.serper.base_url", "https://google.serper.dev")?
            .set_default("providers.omdb.base_url", "http://www.omdbapi.com")?
            .set_default("providers.groq.base_url", "https://api.groq.com/openai/v1")?
            .set_default("providers.nebius.base_url", "https://api.studio.nebius.com/v1")?
            .set_default("recommendation.max_results", default_max_results() as i64)?
            .set_default("recommendation.hits_per_keyword", default_hits_per_keyword() as i64)?
            .set_default("recommendation.actor_keywords", default_actor_keywords() as i64)?
            .set_default("chat.default_model", default_chat_model())?
            .set_default("transcription.model", default_transcription_model())?
            .set_default("image_generation.model", default_image_model())?;

        if path.exists() {
            builder = builder.add_source(File::from(path).format(format));
        }

        // Blank variables leave file or prefixed-env keys in place
        let credential = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        builder = builder
            .add_source(
                Environment::with_prefix("MEDIA_GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("providers.serper.api_key", credential(SERPER_API_KEY_ENV))?
            .set_override_option("providers.omdb.api_key", credential(OMDB_API_KEY_ENV))?
            .set_override_option("providers.groq.api_key", credential(GROQ_API_KEY_ENV))?
            .set_override_option("providers.nebius.api_key", credential(NEBIUS_API_KEY_ENV))?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(config_error("Server port cannot be 0".to_string()));
        }

        let providers = [
            ("serper", &self.providers.serper),
            ("omdb", &self.providers.omdb),
            ("groq", &self.providers.groq),
            ("nebius", &self.providers.nebius),
        ];
        for (name, provider) in providers {
            if reqwest::Url::parse(&provider.base_url).is_err() {
                return Err(config_error(format!(
                    "Provider '{}' has an invalid base_url: '{}'",
                    name, provider.base_url
                )));
            }
        }

        if self.recommendation.max_results == 0 || self.recommendation.hits_per_keyword == 0 {
            return Err(config_error(
                "Recommendation limits must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn config_error(message: String) -> AppError {
    AppError::Config(config::ConfigError::Message(message))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                max_upload_bytes: default_max_upload_bytes(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            providers: ProvidersConfig {
                serper: ProviderConfig {
                    base_url: "https://google.serper.dev".to_string(),
                    api_key: None,
                },
                omdb: ProviderConfig {
                    base_url: "http://www.omdbapi.com".to_string(),
                    api_key: None,
                },
                groq: ProviderConfig {
                    base_url: "https://api.groq.com/openai/v1".to_string(),
                    api_key: None,
                },
                nebius: ProviderConfig {
                    base_url: "https://api.studio.nebius.com/v1".to_string(),
                    api_key: None,
                },
            },
            recommendation: RecommendationConfig {
                max_results: default_max_results(),
                hits_per_keyword: default_hits_per_keyword(),
                actor_keywords: default_actor_keywords(),
            },
            chat: ChatConfig {
                default_model: default_chat_model(),
                default_temperature: default_chat_temperature(),
                default_max_tokens: default_chat_max_tokens(),
                system_prompt: default_system_prompt(),
            },
            transcription: TranscriptionConfig {
                model: default_transcription_model(),
                prompt: default_transcription_prompt(),
                language: default_language(),
                temperature: 0.0,
            },
            image_generation: ImageGenerationConfig {
                model: default_image_model(),
                width: default_image_side(),
                height: default_image_side(),
                num_inference_steps: default_inference_steps(),
            },
        }
    }
}
