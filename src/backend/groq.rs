//! Groq client: OpenAI compatible chat completions and Whisper transcription

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    multipart::{Form, Part},
    Client,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::config::settings::{ProviderConfig, TranscriptionConfig, GROQ_API_KEY_ENV};
use crate::error::{AppError, Result};

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

/// Chat completion request (OpenAI compatible)
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

/// Chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text of the first choice
    pub fn answer(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::InvalidResponse("Chat completion response contained no answer".to_string())
            })
    }
}

/// Verbose transcription with word and segment timestamps.
/// Fields this type does not name are passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    #[serde(default)]
    pub words: Vec<TranscribedWord>,
    #[serde(default)]
    pub segments: Vec<TranscribedSegment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribedWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribedSegment {
    #[serde(default)]
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Audio handed over by a client upload
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    transcription: TranscriptionConfig,
}

impl GroqClient {
    pub fn new(client: Client, config: &ProviderConfig, transcription: TranscriptionConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            transcription,
        }
    }

    /// Get headers with authentication
    fn get_headers(&self) -> Result<HeaderMap> {
        let token = self
            .api_key
            .as_deref()
            .ok_or(AppError::MissingApiKey(GROQ_API_KEY_ENV))?;

        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| AppError::Internal(format!("Invalid Groq API key: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    pub async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let headers = self.get_headers()?;
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, messages = request.messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach Groq API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("Groq API returned {}: {}", status, body)));
        }

        response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(error = %e, "Failed to parse chat completion response");
            AppError::InvalidResponse(format!("Failed to parse chat completion response: {}", e))
        })
    }

    pub async fn transcribe(&self, audio: AudioUpload) -> Result<Transcription> {
        let headers = self.get_headers()?;
        let url = format!("{}/audio/transcriptions", self.base_url);

        debug!(
            file_name = %audio.file_name,
            bytes = audio.bytes.len(),
            model = %self.transcription.model,
            "Sending transcription request"
        );

        let mut part = Part::bytes(audio.bytes).file_name(audio.file_name);
        if let Some(content_type) = audio.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| AppError::InvalidRequest(format!("Invalid content type: {}", e)))?;
        }

        let form = Form::new()
            .part("file", part)
            .text("model", self.transcription.model.clone())
            .text("prompt", self.transcription.prompt.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word")
            .text("timestamp_granularities[]", "segment")
            .text("language", self.transcription.language.clone())
            .text("temperature", self.transcription.temperature.to_string());

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach Groq API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("Groq API returned {}: {}", status, body)));
        }

        response.json::<Transcription>().await.map_err(|e| {
            error!(error = %e, "Failed to parse transcription response");
            AppError::InvalidResponse(format!("Failed to parse transcription response: {}", e))
        })
    }
}
