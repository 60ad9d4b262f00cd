//! Recommendation fan-out over a movie catalog
//!
//! A seed movie is resolved by title, its genres and lead actors become
//! search keywords, every keyword is searched concurrently, and each unseen
//! candidate is fetched concurrently in full. Failed branches contribute
//! nothing; only a missing seed fails the request.

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::catalog::{MovieCatalog, MovieRecord};
use crate::config::RecommendationConfig;
use crate::error::{AppError, Result};

const DELIMITER: &str = ", ";

pub struct Recommender {
    catalog: Arc<dyn MovieCatalog>,
    limits: RecommendationConfig,
}

impl Recommender {
    pub fn new(catalog: Arc<dyn MovieCatalog>, limits: RecommendationConfig) -> Self {
        Self { catalog, limits }
    }

    /// Recommendations for the movie matching `title` exactly
    pub async fn recommend(&self, title: &str) -> Result<Vec<MovieRecord>> {
        let seed = self
            .catalog
            .find_by_title(title)
            .await?
            .ok_or_else(|| AppError::NotFound("Base movie not found".to_string()))?;

        Ok(self.recommend_for(&seed).await)
    }

    /// Recommendations for an already resolved seed, in discovery order
    pub async fn recommend_for(&self, seed: &MovieRecord) -> Vec<MovieRecord> {
        let keywords = derive_keywords(seed, self.limits.actor_keywords);

        let searches = join_all(keywords.iter().map(|keyword| self.catalog.search(keyword))).await;

        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<String> = Vec::new();

        for (keyword, result) in keywords.iter().zip(searches) {
            let hits = match result {
                Ok(hits) => hits,
                Err(e) => {
                    debug!(keyword = %keyword, error = %e, "Keyword search dropped");
                    continue;
                }
            };

            for hit in hits.into_iter().take(self.limits.hits_per_keyword) {
                if hit.imdb_id.is_empty() || hit.imdb_id == seed.imdb_id {
                    continue;
                }
                if seen.insert(hit.imdb_id.clone()) {
                    candidates.push(hit.imdb_id);
                }
            }
        }

        let fetches = join_all(candidates.iter().map(|id| self.catalog.find_by_id(id))).await;

        let records: Vec<MovieRecord> = candidates
            .iter()
            .zip(fetches)
            .filter_map(|(id, result)| match result {
                Ok(Some(record)) => Some(record),
                Ok(None) => {
                    debug!(imdb_id = %id, "Candidate not resolvable");
                    None
                }
                Err(e) => {
                    debug!(imdb_id = %id, error = %e, "Candidate fetch dropped");
                    None
                }
            })
            .take(self.limits.max_results)
            .collect();

        info!(
            seed = %seed.imdb_id,
            keywords = keywords.len(),
            candidates = candidates.len(),
            returned = records.len(),
            "Recommendation fan-out completed"
        );

        records
    }
}

/// Every genre term followed by the first `actor_limit` actors.
/// Keywords are not deduplicated.
pub fn derive_keywords(seed: &MovieRecord, actor_limit: usize) -> Vec<String> {
    let genres = seed.genre.split(DELIMITER);
    let actors = seed.actors.split(DELIMITER).take(actor_limit);

    genres
        .chain(actors)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}
