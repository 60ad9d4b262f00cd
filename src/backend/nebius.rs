//! Nebius AI Studio image generation client (OpenAI compatible)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::settings::{ImageGenerationConfig, ProviderConfig, NEBIUS_API_KEY_ENV};
use crate::error::{AppError, Result};

/// `/images/generations` body, including the Nebius extensions
#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    response_format: &'static str,
    response_extension: &'static str,
    width: u32,
    height: u32,
    num_inference_steps: u32,
    negative_prompt: &'static str,
    seed: i64,
    loras: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    b64_json: Option<String>,
}

pub struct NebiusClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    options: ImageGenerationConfig,
}

impl NebiusClient {
    pub fn new(client: Client, config: &ProviderConfig, options: ImageGenerationConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            options,
        }
    }

    /// Generate one PNG and return it base64 encoded
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::MissingApiKey(NEBIUS_API_KEY_ENV))?;

        let url = format!("{}/images/generations", self.base_url);
        let request = ImageGenerationRequest {
            model: &self.options.model,
            prompt,
            response_format: "b64_json",
            response_extension: "png",
            width: self.options.width,
            height: self.options.height,
            num_inference_steps: self.options.num_inference_steps,
            negative_prompt: "",
            seed: -1,
            loras: None,
        };

        debug!(model = %request.model, "Sending image generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach Nebius API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("Nebius API returned {}: {}", status, body)));
        }

        let body = response.json::<ImageGenerationResponse>().await.map_err(|e| {
            AppError::InvalidResponse(format!("Failed to parse image generation response: {}", e))
        })?;

        body.data
            .into_iter()
            .next()
            .and_then(|image| image.b64_json)
            .ok_or_else(|| {
                AppError::InvalidResponse("Image generation response contained no image".to_string())
            })
    }
}
