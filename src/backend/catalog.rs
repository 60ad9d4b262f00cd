//! Movie catalog abstraction used by the recommendation engine

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Full movie record as reported by the movie database
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MovieRecord {
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbRating", default)]
    pub rating: String,
    /// Comma separated category list, e.g. "Action, Sci-Fi"
    #[serde(rename = "Genre", default)]
    pub genre: String,
    /// Comma separated cast list, lead actors first
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Poster", default, deserialize_with = "poster_reference")]
    pub poster: Option<String>,
}

/// One entry of a keyword search
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchHit {
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
}

/// The movie database reports a missing poster as "N/A"
fn poster_reference<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let poster = Option::<String>::deserialize(deserializer)?;
    Ok(poster.filter(|p| !p.is_empty() && p != "N/A"))
}

/// Lookup and search operations over a movie database
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Exact-title lookup; `Ok(None)` when the database has no match
    async fn find_by_title(&self, title: &str) -> Result<Option<MovieRecord>>;

    /// Lookup by the database's own identifier
    async fn find_by_id(&self, id: &str) -> Result<Option<MovieRecord>>;

    /// Keyword search restricted to movies, in the database's own order
    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>>;
}
