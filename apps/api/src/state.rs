use crate::recommendation::service::RecommendationService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Job store and candidate retriever are trait objects inside the service,
    /// so tests can swap in in-memory fakes.
    pub recommendations: RecommendationService,
}
