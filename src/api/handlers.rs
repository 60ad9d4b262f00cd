//! HTTP request handlers for the movie and image endpoints

use crate::api::models::{
    GeneratedImageResponse, ImageSearchResponse, MovieRequest, MovieResponse, PromptRequest,
    SearchRequest, WelcomeResponse,
};
use crate::backend::{Lookup, MovieCatalog};
use crate::error::AppError;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse::new("Welcome to the API"))
}

pub async fn image_search_root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse::new("Welcome to the Image Search API"))
}

pub async fn poster_search_root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse::new("Welcome to the OMDb Poster Search API"))
}

/// Search for an image and return the first result's URL
#[utoipa::path(
    post,
    path = "/image-search/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "First image URL, or null", body = ImageSearchResponse),
        (status = 400, description = "SERPER_API_KEY is not configured", body = crate::error::ErrorBody),
        (status = 500, description = "Upstream or format error", body = crate::error::ErrorBody)
    ),
    tag = "Images"
)]
pub async fn search_images(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ImageSearchResponse>, AppError> {
    info!(query = %request.query, "Received image search request");

    let image_url = state.images.first_image_url(&request.query).await?;

    Ok(Json(ImageSearchResponse::new(image_url)))
}

/// Look up a movie poster by title
#[utoipa::path(
    post,
    path = "/poster-search/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Poster URL, or null when the movie has none", body = ImageSearchResponse),
        (status = 400, description = "OMDB_API_KEY is not configured", body = crate::error::ErrorBody),
        (status = 404, description = "No movie with that title", body = crate::error::ErrorBody),
        (status = 500, description = "Upstream error", body = crate::error::ErrorBody)
    ),
    tag = "Images"
)]
pub async fn search_poster(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ImageSearchResponse>, AppError> {
    info!(query = %request.query, "Received poster search request");

    match state.movies.lookup("t", request.query.trim()).await? {
        Lookup::Found(record) => Ok(Json(ImageSearchResponse::new(record.poster))),
        Lookup::Missing(reason) => Err(AppError::NotFound(
            reason.unwrap_or_else(|| "Movie not found".to_string()),
        )),
    }
}

/// Fetch a single movie by exact title
#[utoipa::path(
    post,
    path = "/omdb/movie",
    request_body = MovieRequest,
    responses(
        (status = 200, description = "Movie details", body = MovieResponse),
        (status = 404, description = "Movie not found", body = crate::error::ErrorBody)
    ),
    tag = "Movies"
)]
pub async fn fetch_movie(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MovieRequest>,
) -> Result<Json<MovieResponse>, AppError> {
    info!(title = %request.title, "Received movie lookup request");

    let record = state
        .movies
        .find_by_title(&request.title)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    Ok(Json(MovieResponse::from(record)))
}

/// Movies sharing a genre or lead actor with the given title
#[utoipa::path(
    post,
    path = "/omdb/recommendations",
    request_body = MovieRequest,
    responses(
        (status = 200, description = "Up to five related movies, in discovery order", body = [MovieResponse]),
        (status = 404, description = "Base movie not found", body = crate::error::ErrorBody)
    ),
    tag = "Movies"
)]
pub async fn recommend_movies(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MovieRequest>,
) -> Result<Json<Vec<MovieResponse>>, AppError> {
    info!(title = %request.title, "Received recommendation request");

    let records = state.recommender.recommend(&request.title).await?;

    Ok(Json(records.into_iter().map(MovieResponse::from).collect()))
}

/// Generate an image from a prompt
#[utoipa::path(
    post,
    path = "/image-gen/generate-image",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Base64 encoded PNG", body = GeneratedImageResponse),
        (status = 500, description = "Missing key or upstream error", body = crate::error::ErrorBody)
    ),
    tag = "Images"
)]
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<GeneratedImageResponse>, AppError> {
    info!(prompt_len = request.prompt.len(), "Received image generation request");

    let image_b64 = state
        .nebius
        .generate_image(&request.prompt)
        .await
        .map_err(|e| e.into_internal(""))?;

    info!(bytes = image_b64.len(), "Image generation completed");

    Ok(Json(GeneratedImageResponse { image_b64 }))
}
