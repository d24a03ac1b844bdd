//! Axum server and routes.

use crate::config::Config;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use titan_admission::{AdmissionService, JobRecordBuilder, QueryService, RandomSuffixGenerator};
use titan_types::{
    ErrorResponse, JobError, JobStatusView, JobSubmission, RecordStore, SubmitResponse,
};
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub admission: AdmissionService,
    pub query: QueryService,
}

impl AppState {
    /// Wires both services onto one store handle.
    pub fn from_config(store: Arc<dyn RecordStore + Send + Sync>, config: &Config) -> Self {
        let admission = AdmissionService::new(
            Arc::clone(&store),
            Arc::new(RandomSuffixGenerator::new(config.id_suffix_len)),
            JobRecordBuilder::new(config.namespace.clone()),
        )
        .with_max_attempts(config.submit_attempts)
        .with_store_timeout(config.store_timeout);
        let query = QueryService::new(store).with_store_timeout(config.store_timeout);
        Self { admission, query }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/jobs", post(handle_submit).get(handle_list))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JobError rendered as `{kind, message}` with a status code per kind.
pub struct ApiError(pub JobError);

impl From<JobError> for ApiError {
    fn from(e: JobError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            JobError::InvalidSpec(_) => StatusCode::BAD_REQUEST,
            JobError::AdmissionExhausted { .. } => StatusCode::CONFLICT,
            JobError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            JobError::StoreRejected(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

async fn handle_submit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JobSubmission>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(submission) = payload.map_err(|e| JobError::InvalidSpec(e.body_text()))?;
    let admitted = state.admission.submit(&submission).await?;
    Ok(Json(admitted.into()))
}

async fn handle_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<JobStatusView>>, ApiError> {
    Ok(Json(state.query.list().await?))
}

async fn handle_health() -> &'static str {
    "ok"
}
