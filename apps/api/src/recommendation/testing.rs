//! In-memory collaborators and fixtures for service and handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::config::RecommendationConfig;
use crate::recommendation::fields::{EmbeddingField, FieldWeights, DEFAULT_WEIGHT_TABLE};
use crate::recommendation::models::{CandidateRecord, EmbeddingSet, JobRequirement};
use crate::recommendation::ranker::HybridRanker;
use crate::recommendation::service::RecommendationService;
use crate::recommendation::store::{CandidateRetriever, JobStore, StoreError};

#[derive(Default)]
pub struct FakeJobStore {
    jobs: HashMap<Uuid, JobRequirement>,
    fail: bool,
}

impl FakeJobStore {
    pub fn with_job(job: JobRequirement) -> Self {
        let mut jobs = HashMap::new();
        jobs.insert(job.id, job);
        Self { jobs, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            jobs: HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl JobStore for FakeJobStore {
    async fn find_job_by_id(&self, job_id: Uuid) -> Result<Option<JobRequirement>, StoreError> {
        if self.fail {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.jobs.get(&job_id).cloned())
    }
}

type SearchRequest = (Vec<f32>, u32, u32);

pub struct FakeRetriever {
    pool: Vec<CandidateRecord>,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<SearchRequest>>,
}

impl FakeRetriever {
    pub fn with_pool(pool: Vec<CandidateRecord>) -> Self {
        Self {
            pool,
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_pool(vec![])
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SearchRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CandidateRetriever for FakeRetriever {
    async fn vector_search(
        &self,
        query: &[f32],
        num_candidates: u32,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((query.to_vec(), num_candidates, limit));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(self.pool.iter().take(limit as usize).cloned().collect())
    }
}

pub fn job_with(embeddings: Vec<(EmbeddingField, Vec<f32>)>) -> JobRequirement {
    JobRequirement {
        id: Uuid::new_v4(),
        embeddings: Some(embeddings.into_iter().collect()),
    }
}

pub fn candidate(filename: &str, embeddings: EmbeddingSet) -> CandidateRecord {
    CandidateRecord {
        id: Uuid::new_v4(),
        filename: filename.to_string(),
        parsed_data: json!({ "name": filename.trim_end_matches(".pdf") }),
        embeddings,
        retrieval_score: 0.5,
    }
}

pub fn test_service(
    jobs: FakeJobStore,
    retriever: Arc<dyn CandidateRetriever>,
) -> RecommendationService {
    let weights = FieldWeights::new(&DEFAULT_WEIGHT_TABLE).expect("default weights are valid");
    RecommendationService::new(
        Arc::new(jobs),
        retriever,
        HybridRanker::new(Arc::new(weights)),
        RecommendationConfig::default(),
    )
}
