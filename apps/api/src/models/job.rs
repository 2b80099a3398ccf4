use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// The `job_requirements` columns the recommender reads. Jobs are written elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRequirementRow {
    pub id: Uuid,
    /// `{ field_name: [f32, ..] }`, NULL until the job analysis has been embedded.
    pub embeddings: Option<Value>,
}
