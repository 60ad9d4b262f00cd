//! HTTP route definitions

use crate::api::models::*;
use crate::api::{handlers, text_handlers};
use crate::error::ErrorBody;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Media API Gateway",
        description = "Image search, movie metadata and recommendations, chat, transcription and image generation behind one API.",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        handlers::search_images,
        handlers::search_poster,
        handlers::fetch_movie,
        handlers::recommend_movies,
        handlers::generate_image,
        text_handlers::process_query,
        text_handlers::query_health,
        text_handlers::transcribe_audio,
    ),
    components(schemas(
        SearchRequest,
        ImageUrlData,
        ImageSearchResponse,
        MovieRequest,
        MovieResponse,
        QueryRequest,
        QueryResponse,
        QueryHealthResponse,
        PromptRequest,
        GeneratedImageResponse,
        AudioUploadForm,
        ErrorBody,
    )),
    tags(
        (name = "Images", description = "Image search and generation endpoints"),
        (name = "Movies", description = "Movie lookup and recommendation endpoints"),
        (name = "Chat", description = "Chat completion endpoints"),
        (name = "Speech", description = "Speech to text endpoints"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    let max_upload_bytes = state.settings.server.max_upload_bytes;

    // Clients call these with and without the trailing slash
    let speech_upload = post(text_handlers::transcribe_audio)
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/", get(handlers::root))
        .route("/image-search", get(handlers::image_search_root))
        .route("/image-search/", get(handlers::image_search_root))
        .route("/image-search/search", post(handlers::search_images))
        .route("/poster-search", get(handlers::poster_search_root))
        .route("/poster-search/", get(handlers::poster_search_root))
        .route("/poster-search/search", post(handlers::search_poster))
        .route("/omdb/movie", post(handlers::fetch_movie))
        .route("/omdb/recommendations", post(handlers::recommend_movies))
        .route("/query", post(text_handlers::process_query))
        .route("/query/", post(text_handlers::process_query))
        .route("/query/health", get(text_handlers::query_health))
        .route("/speechtotext/transcribe-audio", speech_upload.clone())
        .route("/speechtotext/transcribe-audio/", speech_upload)
        .route("/image-gen/generate-image", post(handlers::generate_image))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Allow any origin, method and header
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
