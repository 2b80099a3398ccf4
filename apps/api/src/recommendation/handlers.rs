//! Axum route handlers for the Recommendation API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::recommendation::models::ScoredCandidate;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ScoredCandidate>,
}

/// GET /api/recommendations/:job_id
///
/// Top-K candidates for a job, best match first.
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let data = state.recommendations.get_recommendations(job_id).await?;

    Ok(Json(RecommendationsResponse {
        success: true,
        count: data.len(),
        data,
    }))
}
