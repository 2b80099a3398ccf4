//! Collaborator boundaries for the recommendation engine.
//!
//! The engine depends only on `JobStore` and `CandidateRetriever`. `AppState` carries
//! them as `Arc<dyn ...>`; the PostgreSQL implementations below are the production
//! backends and tests substitute in-memory fakes.
//!
//! # Storage layout
//! - `job_requirements.embeddings` — JSONB `{ field_name: [f32, ..] }`, nullable
//! - `parsed_resumes.embeddings` — same JSONB shape
//! - `parsed_resumes.full_text_embedding` — pgvector column with an HNSW cosine index,
//!   the retrieval vector

use async_trait::async_trait;
use pgvector::Vector;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::job::JobRequirementRow;
use crate::models::resume::ParsedResumeMatchRow;
use crate::recommendation::models::{CandidateRecord, EmbeddingSet, JobRequirement};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed embeddings on record {id}: {source}")]
    MalformedEmbeddings {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_job_by_id(&self, job_id: Uuid) -> Result<Option<JobRequirement>, StoreError>;
}

/// Approximate nearest-neighbour search over resume `full_text` embeddings.
///
/// `num_candidates` is the search breadth inside the index; at most `limit`
/// records come back, best first, each with its retrieval similarity attached.
#[async_trait]
pub trait CandidateRetriever: Send + Sync {
    async fn vector_search(
        &self,
        query: &[f32],
        num_candidates: u32,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL backends
// ────────────────────────────────────────────────────────────────────────────

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_job_by_id(&self, job_id: Uuid) -> Result<Option<JobRequirement>, StoreError> {
        let row = sqlx::query_as::<_, JobRequirementRow>(
            "SELECT id, embeddings FROM job_requirements WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> Result<JobRequirement, StoreError> {
            let embeddings = row
                .embeddings
                .map(|value| parse_embeddings(row.id, value))
                .transpose()?;
            Ok(JobRequirement {
                id: row.id,
                embeddings,
            })
        })
        .transpose()
    }
}

pub struct PgCandidateRetriever {
    pool: PgPool,
}

impl PgCandidateRetriever {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateRetriever for PgCandidateRetriever {
    async fn vector_search(
        &self,
        query: &[f32],
        num_candidates: u32,
        limit: u32,
    ) -> Result<Vec<CandidateRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // HNSW candidate list size, scoped to this transaction.
        sqlx::query("SELECT set_config('hnsw.ef_search', $1, true)")
            .bind(num_candidates.to_string())
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query_as::<_, ParsedResumeMatchRow>(
            r#"
            SELECT id, filename, parsed_data, embeddings,
                   1 - (full_text_embedding <=> $1) AS score
            FROM parsed_resumes
            WHERE full_text_embedding IS NOT NULL
            ORDER BY full_text_embedding <=> $1
            LIMIT $2
            "#,
        )
        .bind(query_vector(query))
        .bind(i64::from(limit))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            returned = rows.len(),
            num_candidates, limit, "vector search completed"
        );

        Ok(rows.into_iter().map(candidate_from_row).collect())
    }
}

fn query_vector(query: &[f32]) -> Vector {
    Vector::from(query.to_vec())
}

/// A resume whose embeddings column is unreadable stays in the pool with no
/// embeddings, so it scores 0 instead of failing the whole search.
fn candidate_from_row(row: ParsedResumeMatchRow) -> CandidateRecord {
    let embeddings = match row.embeddings {
        Some(value) => parse_embeddings(row.id, value).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable candidate embeddings");
            EmbeddingSet::default()
        }),
        None => EmbeddingSet::default(),
    };
    CandidateRecord {
        id: row.id,
        filename: row.filename,
        parsed_data: row.parsed_data,
        embeddings,
        retrieval_score: row.score,
    }
}

/// Fails only when the column is not a JSON object. Bad individual fields are
/// dropped by `EmbeddingSet`'s conversion.
fn parse_embeddings(id: Uuid, value: Value) -> Result<EmbeddingSet, StoreError> {
    serde_json::from_value(value).map_err(|source| StoreError::MalformedEmbeddings { id, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::fields::EmbeddingField;
    use serde_json::json;

    #[test]
    fn test_query_vector_keeps_components_in_order() {
        let query = [1.0_f32, -0.5, 0.25];
        assert_eq!(query_vector(&query).as_slice(), &query[..]);
        assert!(query_vector(&[]).as_slice().is_empty());
    }

    #[test]
    fn test_parse_embeddings_ok() {
        let set = parse_embeddings(Uuid::nil(), json!({ "skills": [0.5, 0.5] })).unwrap();
        assert_eq!(set.get(EmbeddingField::Skills), Some(&[0.5_f32, 0.5][..]));
    }

    #[test]
    fn test_parse_embeddings_malformed_carries_record_id() {
        let id = Uuid::new_v4();
        let err = parse_embeddings(id, json!("not an object")).unwrap_err();
        assert!(matches!(err, StoreError::MalformedEmbeddings { id: bad, .. } if bad == id));
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_parse_embeddings_keeps_good_fields_next_to_bad_ones() {
        let set = parse_embeddings(
            Uuid::nil(),
            json!({ "full_text": [1.0, 0.0], "certifications": "n/a", "skills": [1.0, null] }),
        )
        .unwrap();
        assert_eq!(set.get(EmbeddingField::FullText), Some(&[1.0_f32, 0.0][..]));
        assert_eq!(set.get(EmbeddingField::Certifications), None);
        assert_eq!(set.get(EmbeddingField::Skills), None);
    }

    fn match_row(embeddings: Option<Value>) -> ParsedResumeMatchRow {
        ParsedResumeMatchRow {
            id: Uuid::new_v4(),
            filename: "cv.pdf".to_string(),
            parsed_data: json!({ "name": "Ada" }),
            embeddings,
            score: 0.8,
        }
    }

    #[test]
    fn test_unreadable_candidate_embeddings_stay_in_pool_empty() {
        let row = match_row(Some(json!(["not", "an", "object"])));
        let id = row.id;

        let record = candidate_from_row(row);
        assert_eq!(record.id, id);
        assert_eq!(record.embeddings, EmbeddingSet::default());
        assert_eq!(record.retrieval_score, 0.8);
    }

    #[test]
    fn test_candidate_row_without_embeddings() {
        let record = candidate_from_row(match_row(None));
        assert_eq!(record.embeddings.get(EmbeddingField::FullText), None);
        assert_eq!(record.parsed_data["name"], "Ada");
    }
}
