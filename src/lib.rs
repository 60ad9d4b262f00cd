//! Media API Gateway
//!
//! A Rust-based gateway that forwards image search, movie metadata, chat,
//! transcription and image generation requests to third-party APIs and
//! reshapes their responses, plus a movie recommendation fan-out.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod recommend;

pub use error::{AppError, Result};

use reqwest::Client;
use std::sync::Arc;

use crate::backend::{GroqClient, MovieCatalog, NebiusClient, OmdbClient, SerperClient};
use crate::config::Settings;
use crate::recommend::Recommender;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<Settings>,
    pub images: SerperClient,
    pub movies: Arc<OmdbClient>,
    pub recommender: Recommender,
    pub groq: GroqClient,
    pub nebius: NebiusClient,
}

impl AppState {
    /// Build every upstream client from the settings, sharing one connection pool
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let providers = &settings.providers;
        let movies = Arc::new(OmdbClient::new(client.clone(), &providers.omdb));
        let catalog: Arc<dyn MovieCatalog> = movies.clone();

        Ok(Self {
            images: SerperClient::new(client.clone(), &providers.serper),
            recommender: Recommender::new(catalog, settings.recommendation.clone()),
            movies,
            groq: GroqClient::new(client.clone(), &providers.groq, settings.transcription.clone()),
            nebius: NebiusClient::new(client, &providers.nebius, settings.image_generation.clone()),
            settings: Arc::new(settings),
        })
    }
}
