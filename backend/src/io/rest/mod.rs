//! # REST API Interface Layer
//!
//! HTTP endpoints for the attendance tracker, mounted under `/api`.
//! Handlers validate input, call the domain services held in `AppState`
//! and translate outcomes into status codes. Error bodies have the shape
//! `{"error": "...", "code": "..."}`.

pub mod analysis_apis;
pub mod attendance_apis;
pub mod calendar_apis;
pub mod student_apis;

#[cfg(test)]
pub mod test_utils;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use shared::HealthResponse;
use tracing::info;

use crate::AppState;

/// All API routes, to be nested under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/students", student_apis::router())
        .nest("/attendance", attendance_apis::router())
        .nest("/calendar", calendar_apis::router())
        .nest("/analysis", analysis_apis::router())
        .route("/health", get(health))
}

/// Liveness check with current collection sizes
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/health");

    let (students, records) = state
        .attendance_service
        .read(|book| (book.students().len(), book.records().len()))
        .await;

    Json(HealthResponse {
        status: "ok".to_string(),
        students,
        records,
    })
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>, code: &str) -> Response {
    let body = json!({
        "error": message.into(),
        "code": code,
    });
    (status, Json(body)).into_response()
}
