//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::backend::MovieRecord;

/// Free-text search request, used by the image and poster searches
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ImageUrlData {
    /// First matching image, `null` when nothing matched
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ImageSearchResponse {
    pub data: ImageUrlData,
}

impl ImageSearchResponse {
    pub fn new(image_url: Option<String>) -> Self {
        Self {
            data: ImageUrlData { image_url },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MovieRequest {
    pub title: String,
}

/// Movie fields returned by the lookup and recommendation endpoints
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MovieResponse {
    pub title: String,
    pub year: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    pub genre: String,
    pub actors: String,
    pub plot: String,
    pub poster: Option<String>,
}

impl From<MovieRecord> for MovieResponse {
    fn from(record: MovieRecord) -> Self {
        Self {
            title: record.title,
            year: record.year,
            imdb_rating: record.rating,
            genre: record.genre,
            actors: record.actors,
            plot: record.plot,
            poster: record.poster,
        }
    }
}

/// Chat query request; omitted options fall back to configured defaults
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct QueryResponse {
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct QueryHealthResponse {
    pub status: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GeneratedImageResponse {
    pub image_b64: String,
}

/// Multipart upload accepted by the transcription endpoint
#[derive(Debug, ToSchema)]
pub struct AudioUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

impl WelcomeResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
