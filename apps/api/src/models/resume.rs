use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A `parsed_resumes` row as projected by the vector search query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParsedResumeMatchRow {
    pub id: Uuid,
    pub filename: String,
    pub parsed_data: Value,
    pub embeddings: Option<Value>,
    /// `1 - cosine_distance` on `full_text_embedding`.
    pub score: f64,
}
