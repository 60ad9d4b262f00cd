//! Configuration loading and validation

pub mod settings;

pub use settings::{
    ChatConfig, ImageGenerationConfig, LoggingConfig, ProviderConfig, ProvidersConfig,
    RecommendationConfig, ServerConfig, Settings, TranscriptionConfig,
};
