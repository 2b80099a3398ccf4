use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::recommendation::ranker::DEFAULT_TOP_K;

/// pgvector accepts `hnsw.ef_search` in `1..=1000`.
pub const MAX_NUM_CANDIDATES: u32 = 1000;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub recommendation: RecommendationConfig,
}

/// Retrieval and shortlist sizing for the recommendation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationConfig {
    /// ANN search breadth inside the index.
    pub num_candidates: u32,
    /// Maximum pool size handed to the reranker.
    pub pool_limit: u32,
    pub top_k: usize,
    pub retrieval_timeout: Duration,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            num_candidates: 100,
            pool_limit: 50,
            top_k: DEFAULT_TOP_K,
            retrieval_timeout: Duration::from_millis(5000),
        }
    }
}

impl RecommendationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            bail!("RECOMMEND_TOP_K must be at least 1");
        }
        if self.pool_limit == 0 {
            bail!("RECOMMEND_POOL_LIMIT must be at least 1");
        }
        if self.num_candidates > MAX_NUM_CANDIDATES {
            bail!(
                "RECOMMEND_NUM_CANDIDATES ({}) must be <= {MAX_NUM_CANDIDATES}",
                self.num_candidates
            );
        }
        if self.num_candidates < self.pool_limit {
            bail!(
                "RECOMMEND_NUM_CANDIDATES ({}) must be >= RECOMMEND_POOL_LIMIT ({})",
                self.num_candidates,
                self.pool_limit
            );
        }
        if self.retrieval_timeout.is_zero() {
            bail!("RETRIEVAL_TIMEOUT_MS must be greater than 0");
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = RecommendationConfig::default();
        let recommendation = RecommendationConfig {
            num_candidates: parse_env("RECOMMEND_NUM_CANDIDATES", defaults.num_candidates)?,
            pool_limit: parse_env("RECOMMEND_POOL_LIMIT", defaults.pool_limit)?,
            top_k: parse_env("RECOMMEND_TOP_K", defaults.top_k)?,
            retrieval_timeout: Duration::from_millis(parse_env(
                "RETRIEVAL_TIMEOUT_MS",
                defaults.retrieval_timeout.as_millis() as u64,
            )?),
        };
        recommendation.validate()?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            recommendation,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
