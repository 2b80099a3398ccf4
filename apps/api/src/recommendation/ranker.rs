//! Hybrid Ranker — reranks a retrieval pool by weighted multi-field similarity.
//!
//! Algorithm, per candidate:
//! 1. `score_fields` → cosine similarity for every embedding field
//! 2. final = Σ(weight[f] × similarity[f]) over all fields
//! 3. matchScore = round(max(0, final) × 100)
//! 4. matchDetails = the same clamp-and-round applied to phrases, full_text,
//!    skills and experience individually
//!
//! The pool is then sorted by matchScore descending and truncated to top-K.
//! Equal scores keep their retrieval order (stable sort).

use std::sync::Arc;

use crate::recommendation::fields::{
    score_fields, EmbeddingField, FieldSimilarities, FieldWeights,
};
use crate::recommendation::models::{CandidateRecord, EmbeddingSet, MatchDetails, ScoredCandidate};

pub const DEFAULT_TOP_K: usize = 10;

/// Converts a similarity into an integer percentage. Negative values clamp to 0.
pub fn to_percentage(score: f64) -> u8 {
    // f64::max drops NaN in favour of 0.0
    (score.max(0.0) * 100.0).round().min(100.0) as u8
}

#[derive(Debug, Clone)]
pub struct HybridRanker {
    weights: Arc<FieldWeights>,
}

impl HybridRanker {
    pub fn new(weights: Arc<FieldWeights>) -> Self {
        Self { weights }
    }

    /// Scores a single candidate without touching ordering.
    pub fn score(&self, job: &EmbeddingSet, candidate: CandidateRecord) -> ScoredCandidate {
        let similarities = score_fields(job, &candidate.embeddings);
        let final_score = self.weights.weighted_sum(&similarities);

        ScoredCandidate {
            id: candidate.id,
            filename: candidate.filename,
            parsed_data: candidate.parsed_data,
            match_score: to_percentage(final_score),
            match_details: match_details(&similarities),
        }
    }

    /// Scores the whole pool, sorts by `match_score` descending, keeps the first `top_k`.
    pub fn rank(
        &self,
        job: &EmbeddingSet,
        pool: Vec<CandidateRecord>,
        top_k: usize,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = pool
            .into_iter()
            .map(|candidate| self.score(job, candidate))
            .collect();

        // Vec::sort_by is stable: ties stay in retrieval order.
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        scored.truncate(top_k);
        scored
    }
}

fn match_details(similarities: &FieldSimilarities) -> MatchDetails {
    MatchDetails {
        phrases: to_percentage(similarities.get(EmbeddingField::Phrases)),
        full_text: to_percentage(similarities.get(EmbeddingField::FullText)),
        skills: to_percentage(similarities.get(EmbeddingField::Skills)),
        experience: to_percentage(similarities.get(EmbeddingField::Experience)),
    }
}
