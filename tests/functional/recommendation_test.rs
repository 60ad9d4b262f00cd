//! Functional tests for the recommendation fan-out

use async_trait::async_trait;
use media_api_gateway::backend::{MovieCatalog, MovieRecord, SearchHit};
use media_api_gateway::config::RecommendationConfig;
use media_api_gateway::recommend::Recommender;
use media_api_gateway::{AppError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

/// In-memory catalog that records every call it receives
#[derive(Default)]
struct FakeCatalog {
    titles: HashMap<String, MovieRecord>,
    records: HashMap<String, MovieRecord>,
    searches: HashMap<String, Vec<&'static str>>,
    failing_searches: HashSet<String>,
    failing_fetches: HashSet<String>,
    search_barrier: Option<Barrier>,
    fetch_barrier: Option<Barrier>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn with_seed(mut self, seed: MovieRecord) -> Self {
        self.titles.insert(seed.title.clone(), seed);
        self
    }

    fn with_record(mut self, id: &str) -> Self {
        self.records.insert(id.to_string(), movie(id, &format!("Movie {}", id), "", ""));
        self
    }

    fn with_search(mut self, keyword: &str, ids: Vec<&'static str>) -> Self {
        self.searches.insert(keyword.to_string(), ids);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    async fn find_by_title(&self, title: &str) -> Result<Option<MovieRecord>> {
        self.record_call(format!("t={}", title));
        Ok(self.titles.get(title).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MovieRecord>> {
        self.record_call(format!("i={}", id));
        if let Some(barrier) = &self.fetch_barrier {
            barrier.wait().await;
        }
        if self.failing_fetches.contains(id) {
            return Err(AppError::Upstream("connection reset".to_string()));
        }
        Ok(self.records.get(id).cloned())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        self.record_call(format!("s={}", keyword));
        if let Some(barrier) = &self.search_barrier {
            barrier.wait().await;
        }
        if self.failing_searches.contains(keyword) {
            return Err(AppError::Upstream("timed out".to_string()));
        }
        Ok(self
            .searches
            .get(keyword)
            .map(|ids| {
                ids.iter()
                    .map(|id| SearchHit {
                        imdb_id: id.to_string(),
                        title: format!("Movie {}", id),
                        year: "2000".to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn movie(id: &str, title: &str, genre: &str, actors: &str) -> MovieRecord {
    MovieRecord {
        imdb_id: id.to_string(),
        title: title.to_string(),
        year: "1999".to_string(),
        rating: "7.0".to_string(),
        genre: genre.to_string(),
        actors: actors.to_string(),
        plot: "Plot.".to_string(),
        poster: None,
    }
}

fn limits() -> RecommendationConfig {
    RecommendationConfig {
        max_results: 5,
        hits_per_keyword: 3,
        actor_keywords: 2,
    }
}

fn seed() -> MovieRecord {
    movie("tt0", "Seed", "Action, Sci-Fi", "A, B, C")
}

fn ids(records: &[MovieRecord]) -> Vec<&str> {
    records.iter().map(|r| r.imdb_id.as_str()).collect()
}

#[tokio::test]
async fn test_unknown_seed_is_not_found_without_further_calls() {
    let catalog = Arc::new(FakeCatalog::default());
    let recommender = Recommender::new(catalog.clone(), limits());

    let result = recommender.recommend("Nothing").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(catalog.calls(), vec!["t=Nothing".to_string()]);
}

#[tokio::test]
async fn test_searches_genres_then_two_lead_actors() {
    let catalog = Arc::new(FakeCatalog::default().with_seed(seed()));
    let recommender = Recommender::new(catalog.clone(), limits());

    let result = recommender.recommend("Seed").await.unwrap();
    assert!(result.is_empty());

    let searched: HashSet<String> = catalog
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("s="))
        .collect();
    let expected: HashSet<String> = ["s=Action", "s=Sci-Fi", "s=A", "s=B"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(searched, expected);
}

#[tokio::test]
async fn test_discovery_order_dedup_and_seed_exclusion() {
    let catalog = Arc::new(
        FakeCatalog::default()
            .with_seed(seed())
            .with_search("Action", vec!["tt1", "tt0", "tt2", "tt9"])
            .with_search("Sci-Fi", vec!["tt2", "tt3"])
            .with_search("A", vec!["tt4", "tt1"])
            .with_search("B", vec!["tt5"])
            .with_record("tt1")
            .with_record("tt2")
            .with_record("tt3")
            .with_record("tt4")
            .with_record("tt5")
            .with_record("tt9"),
    );
    let recommender = Recommender::new(catalog.clone(), limits());

    let result = recommender.recommend("Seed").await.unwrap();

    // tt9 is the fourth hit for "Action" and falls outside the per-keyword cap
    assert_eq!(ids(&result), vec!["tt1", "tt2", "tt3", "tt4", "tt5"]);

    let fetched: Vec<String> = catalog
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("i="))
        .collect();
    assert_eq!(fetched.len(), 5);
    assert!(!fetched.contains(&"i=tt0".to_string()));
    assert!(!fetched.contains(&"i=tt9".to_string()));
}

#[tokio::test]
async fn test_result_is_capped_at_five() {
    let catalog = Arc::new(
        FakeCatalog::default()
            .with_seed(seed())
            .with_search("Action", vec!["tt1", "tt2", "tt3"])
            .with_search("Sci-Fi", vec!["tt4", "tt5", "tt6"])
            .with_search("A", vec!["tt7"])
            .with_record("tt1")
            .with_record("tt2")
            .with_record("tt3")
            .with_record("tt4")
            .with_record("tt5")
            .with_record("tt6")
            .with_record("tt7"),
    );
    let recommender = Recommender::new(catalog, limits());

    let result = recommender.recommend("Seed").await.unwrap();

    assert_eq!(ids(&result), vec!["tt1", "tt2", "tt3", "tt4", "tt5"]);
}

#[tokio::test]
async fn test_failed_branches_are_dropped() {
    let mut catalog = FakeCatalog::default()
        .with_seed(seed())
        .with_search("Action", vec!["tt1", "tt2"])
        .with_search("Sci-Fi", vec!["tt3"])
        .with_search("A", vec!["tt4"])
        .with_record("tt1")
        .with_record("tt2")
        .with_record("tt4");
    catalog.failing_searches.insert("Sci-Fi".to_string());
    catalog.failing_fetches.insert("tt2".to_string());
    let recommender = Recommender::new(Arc::new(catalog), limits());

    let result = recommender.recommend("Seed").await.unwrap();

    assert_eq!(ids(&result), vec!["tt1", "tt4"]);
}

#[tokio::test]
async fn test_unresolvable_candidates_are_dropped() {
    let catalog = FakeCatalog::default()
        .with_seed(seed())
        .with_search("Action", vec!["tt1", "tt2"])
        .with_record("tt2");
    let recommender = Recommender::new(Arc::new(catalog), limits());

    let result = recommender.recommend("Seed").await.unwrap();

    assert_eq!(ids(&result), vec!["tt2"]);
}

#[tokio::test]
async fn test_keyword_searches_run_concurrently() {
    // Every search waits until all four are in flight; a sequential
    // fan-out would never get past the first one.
    let mut catalog = FakeCatalog::default()
        .with_seed(seed())
        .with_search("B", vec!["tt1"])
        .with_record("tt1");
    catalog.search_barrier = Some(Barrier::new(4));
    let recommender = Recommender::new(Arc::new(catalog), limits());

    let result = tokio::time::timeout(Duration::from_secs(5), recommender.recommend("Seed"))
        .await
        .expect("keyword searches did not run concurrently")
        .unwrap();

    assert_eq!(ids(&result), vec!["tt1"]);
}

#[tokio::test]
async fn test_candidate_fetches_run_concurrently() {
    // Three candidates; each fetch waits until all three are in flight.
    let mut catalog = FakeCatalog::default()
        .with_seed(seed())
        .with_search("Action", vec!["tt1", "tt2"])
        .with_search("A", vec!["tt3"])
        .with_record("tt1")
        .with_record("tt2")
        .with_record("tt3");
    catalog.fetch_barrier = Some(Barrier::new(3));
    let recommender = Recommender::new(Arc::new(catalog), limits());

    let result = tokio::time::timeout(Duration::from_secs(5), recommender.recommend("Seed"))
        .await
        .expect("candidate fetches did not run concurrently")
        .unwrap();

    assert_eq!(ids(&result), vec!["tt1", "tt2", "tt3"]);
}

#[tokio::test]
async fn test_results_never_repeat_or_include_seed() {
    let scenarios: Vec<Vec<(&str, Vec<&'static str>)>> = vec![
        vec![("Action", vec!["tt0", "tt0", "tt0"])],
        vec![("Action", vec!["tt1", "tt1", "tt1"]), ("Sci-Fi", vec!["tt1", "tt0"])],
        vec![
            ("Action", vec!["tt1", "tt2", "tt3"]),
            ("Sci-Fi", vec!["tt3", "tt2", "tt1"]),
            ("A", vec!["tt0", "tt4", "tt5"]),
            ("B", vec!["tt5", "tt6", "tt7"]),
        ],
    ];

    for searches in scenarios {
        let mut catalog = FakeCatalog::default().with_seed(seed());
        for id in ["tt0", "tt1", "tt2", "tt3", "tt4", "tt5", "tt6", "tt7"] {
            catalog = catalog.with_record(id);
        }
        for (keyword, hits) in searches {
            catalog = catalog.with_search(keyword, hits);
        }
        let recommender = Recommender::new(Arc::new(catalog), limits());

        let result = recommender.recommend("Seed").await.unwrap();
        let result_ids = ids(&result);
        let unique: HashSet<&str> = result_ids.iter().copied().collect();

        assert!(result.len() <= 5);
        assert_eq!(unique.len(), result_ids.len());
        assert!(!unique.contains("tt0"));
    }
}
