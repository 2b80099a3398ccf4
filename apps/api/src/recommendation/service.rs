//! Recommendation Service — orchestrates one recommendation request.
//!
//! Flow: find job → require a `full_text` embedding → vector search (with timeout)
//!       → hybrid rerank on the blocking pool → top-K shortlist.
//!
//! The service holds no mutable state. Any failure aborts the request; partial
//! shortlists are never returned.

use std::sync::Arc;

use anyhow::anyhow;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RecommendationConfig;
use crate::recommendation::models::ScoredCandidate;
use crate::recommendation::ranker::HybridRanker;
use crate::recommendation::store::{CandidateRetriever, JobStore};

const MISSING_EMBEDDINGS: &str =
    "Job embeddings are missing. Please re-generate the job analysis.";

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Job {job_id} not found")]
    NotFound { job_id: Uuid },

    #[error("Job {job_id}: {reason}")]
    InvalidState { job_id: Uuid, reason: String },

    #[error("Candidate retrieval failed for job {job_id}: {message}")]
    Retrieval { job_id: Uuid, message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct RecommendationService {
    jobs: Arc<dyn JobStore>,
    retriever: Arc<dyn CandidateRetriever>,
    ranker: HybridRanker,
    config: RecommendationConfig,
}

impl RecommendationService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        retriever: Arc<dyn CandidateRetriever>,
        ranker: HybridRanker,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            jobs,
            retriever,
            ranker,
            config,
        }
    }

    pub async fn get_recommendations(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ScoredCandidate>, RecommendError> {
        let job = self
            .jobs
            .find_job_by_id(job_id)
            .await
            .map_err(|e| anyhow!("job lookup failed for {job_id}: {e}"))?
            .ok_or(RecommendError::NotFound { job_id })?;

        let query = match job.full_text_embedding() {
            Some(v) => v.to_vec(),
            None => {
                warn!(%job_id, "recommendation requested for job without full_text embedding");
                return Err(RecommendError::InvalidState {
                    job_id,
                    reason: MISSING_EMBEDDINGS.to_string(),
                });
            }
        };

        let search = self.retriever.vector_search(
            &query,
            self.config.num_candidates,
            self.config.pool_limit,
        );
        let pool = match tokio::time::timeout(self.config.retrieval_timeout, search).await {
            Ok(Ok(pool)) => pool,
            Ok(Err(e)) => {
                return Err(RecommendError::Retrieval {
                    job_id,
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(RecommendError::Retrieval {
                    job_id,
                    message: format!(
                        "vector search timed out after {}ms",
                        self.config.retrieval_timeout.as_millis()
                    ),
                })
            }
        };

        let pool_size = pool.len();
        if pool_size == 0 {
            info!(%job_id, "retrieval returned no candidates");
            return Ok(Vec::new());
        }
        debug!(
            %job_id,
            pool_size,
            best_retrieval_score = pool.first().map(|c| c.retrieval_score),
            "candidate pool retrieved"
        );

        // CPU-bound rerank — spawn_blocking keeps it off the async executor.
        let ranker = self.ranker.clone();
        let top_k = self.config.top_k;
        let job_embeddings = job.embeddings.unwrap_or_default();
        let shortlist =
            tokio::task::spawn_blocking(move || ranker.rank(&job_embeddings, pool, top_k))
                .await
                .map_err(|e| anyhow!("rerank task failed for job {job_id}: {e}"))?;

        info!(
            %job_id,
            pool_size,
            shortlisted = shortlist.len(),
            top_score = shortlist.first().map(|c| c.match_score),
            "recommendations ranked"
        );

        Ok(shortlist)
    }
}
