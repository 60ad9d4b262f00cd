//! OMDb movie database client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::backend::catalog::{MovieCatalog, MovieRecord, SearchHit};
use crate::config::settings::{ProviderConfig, OMDB_API_KEY_ENV};
use crate::error::{AppError, Result};

/// Title or id lookup response. `Response` is the string "True" or "False".
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(flatten)]
    record: MovieRecord,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<SearchHit>,
}

/// Outcome of a lookup that the database answered
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(MovieRecord),
    /// The database's explanation, e.g. "Movie not found!"
    Missing(Option<String>),
}

pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OmdbClient {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(AppError::MissingApiKey(OMDB_API_KEY_ENV))
    }

    /// Issue a `t=` or `i=` lookup and report whether the database matched
    pub async fn lookup(&self, param: &str, value: &str) -> Result<Lookup> {
        let api_key = self.api_key()?;
        let url = format!("{}/", self.base_url);

        debug!(param = %param, value = %value, "Sending OMDb lookup");

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", api_key), (param, value)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(error = %e, "OMDb lookup failed");
                AppError::Upstream(format!("Error connecting to OMDb API: {}", e))
            })?;

        let body = response.json::<LookupResponse>().await.map_err(|e| {
            AppError::InvalidResponse(format!("Invalid JSON response from OMDb API: {}", e))
        })?;

        if body.response == "True" {
            Ok(Lookup::Found(body.record))
        } else {
            Ok(Lookup::Missing(body.error))
        }
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    async fn find_by_title(&self, title: &str) -> Result<Option<MovieRecord>> {
        match self.lookup("t", title).await? {
            Lookup::Found(record) => Ok(Some(record)),
            Lookup::Missing(_) => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MovieRecord>> {
        match self.lookup("i", id).await? {
            Lookup::Found(record) => Ok(Some(record)),
            Lookup::Missing(_) => Ok(None),
        }
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        let api_key = self.api_key()?;
        let url = format!("{}/", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", api_key), ("s", keyword), ("type", "movie")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Upstream(format!("Error connecting to OMDb API: {}", e)))?;

        let body = response.json::<SearchResponse>().await.map_err(|e| {
            AppError::InvalidResponse(format!("Invalid JSON response from OMDb API: {}", e))
        })?;

        if body.response == "True" {
            Ok(body.search)
        } else {
            Ok(Vec::new())
        }
    }
}
