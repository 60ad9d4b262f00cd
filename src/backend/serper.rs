//! Serper (Google image search) client

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::settings::{ProviderConfig, SERPER_API_KEY_ENV};
use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
struct ImageSearchRequest<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageSearchResponse {
    /// Outer `None` when the field is absent, inner `None` when it is `null`
    #[serde(default, deserialize_with = "present")]
    images: Option<Option<Vec<ImageResult>>>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct ImageResult {
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
}

pub struct SerperClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SerperClient {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
        }
    }

    /// URL of the first image result, `None` when the search found nothing
    pub async fn first_image_url(&self, query: &str) -> Result<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::MissingApiKey(SERPER_API_KEY_ENV))?;

        let url = format!("{}/images", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", api_key)
            .json(&ImageSearchRequest { q: query })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(error = %e, "Serper image search failed");
                AppError::Upstream(format!("Error from Serper API: {}", e))
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Error from Serper API: {}", e)))?;

        let first = parse_first_image(&body)?;
        debug!(found = first.is_some(), "Serper image search completed");
        Ok(first)
    }
}

fn parse_first_image(body: &str) -> Result<Option<String>> {
    let parsed: ImageSearchResponse = serde_json::from_str(body)
        .map_err(|_| AppError::InvalidResponse("Invalid JSON response from Serper API".to_string()))?;

    let images = parsed.images.ok_or_else(|| {
        AppError::InvalidResponse("Unexpected response format from Serper API".to_string())
    })?;

    Ok(images
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|img| img.image_url))
}
