use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::error_response;
use crate::AppState;

// Query parameters for calendar month API
#[derive(Debug, Deserialize)]
pub struct CalendarMonthQuery {
    pub student_id: String,
    pub month: u32,
    pub year: u32,
}

/// Create a router for calendar related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/month", get(get_calendar_month))
}

/// Get one month of attendance for a student
async fn get_calendar_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> impl IntoResponse {
    info!("GET /api/calendar/month - query: {:?}", query);

    let calendar_service = state.calendar_service.clone();
    let result = state
        .attendance_service
        .read(|book| {
            if !book.has_student(&query.student_id) {
                return None;
            }
            Some(calendar_service.student_month(&query.student_id, query.year, query.month, book))
        })
        .await;

    match result {
        Some(Ok(calendar)) => (StatusCode::OK, Json(calendar)).into_response(),
        Some(Err(e)) => {
            warn!("Rejected calendar request: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_MONTH")
        }
        None => error_response(StatusCode::NOT_FOUND, "Student not found", "STUDENT_NOT_FOUND"),
    }
}
