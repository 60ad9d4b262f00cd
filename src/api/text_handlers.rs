//! Chat and speech-to-text handlers

use crate::api::models::{QueryHealthResponse, QueryRequest, QueryResponse};
use crate::backend::{
    AudioUpload, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Transcription,
};
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

/// Answer a free-text query with the chat model
#[utoipa::path(
    post,
    path = "/query/",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Model answer", body = QueryResponse),
        (status = 500, description = "Any processing error", body = crate::error::ErrorBody)
    ),
    tag = "Chat"
)]
pub async fn process_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let defaults = &state.settings.chat;

    let backend_request = ChatCompletionRequest {
        model: request.model.unwrap_or_else(|| defaults.default_model.clone()),
        messages: vec![
            ChatMessage::system(defaults.system_prompt.clone()),
            ChatMessage::user(request.query),
        ],
        temperature: request.temperature.unwrap_or(defaults.default_temperature),
        max_tokens: request.max_tokens.unwrap_or(defaults.default_max_tokens),
        stream: false,
    };

    info!(
        model = %backend_request.model,
        temperature = backend_request.temperature,
        max_tokens = backend_request.max_tokens,
        "Received chat query"
    );

    let answer = state
        .groq
        .chat_completion(backend_request)
        .await
        .and_then(ChatCompletionResponse::answer)
        .map_err(|e| e.into_internal("Error processing query: "))?;

    Ok(Json(QueryResponse { answer }))
}

/// Check if the query endpoint is healthy
#[utoipa::path(
    get,
    path = "/query/health",
    responses((status = 200, description = "Always healthy", body = QueryHealthResponse)),
    tag = "Chat"
)]
pub async fn query_health() -> Json<QueryHealthResponse> {
    Json(QueryHealthResponse {
        status: "healthy".to_string(),
        endpoint: "query".to_string(),
    })
}

/// Transcribe an uploaded audio file with word and segment timestamps
#[utoipa::path(
    post,
    path = "/speechtotext/transcribe-audio/",
    request_body(content = crate::api::models::AudioUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Verbose transcription with word and segment timestamps"),
        (status = 400, description = "No file part in the upload", body = crate::error::ErrorBody),
        (status = 500, description = "Processing error", body = crate::error::ErrorBody)
    ),
    tag = "Speech"
)]
pub async fn transcribe_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Transcription>, AppError> {
    let upload = read_audio_upload(multipart).await?;

    info!(
        file_name = %upload.file_name,
        bytes = upload.bytes.len(),
        "Received transcription request"
    );

    let transcription = state
        .groq
        .transcribe(upload)
        .await
        .map_err(|e| e.into_internal(""))?;

    info!(
        words = transcription.words.len(),
        segments = transcription.segments.len(),
        "Transcription completed"
    );

    Ok(Json(transcription))
}

/// Pull the `file` part out of a multipart body
async fn read_audio_upload(mut multipart: Multipart) -> Result<AudioUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("audio").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("Failed to read upload: {}", e)))?;

        return Ok(AudioUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::InvalidRequest("Missing 'file' part in upload".to_string()))
}
