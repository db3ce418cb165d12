//! # REST API for Daily Attendance
//!
//! Endpoints for reading attendance records and marking a student on a day.

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
use crate::domain::aggregator::{self, DateRange};
use crate::domain::validation::validate_date;
use crate::mappers::AttendanceMapper;
use crate::AppState;
use shared::{AttendanceListResponse, AttendanceStatus, SetAttendanceRequest, SetAttendanceResponse};

/// Query parameters for the attendance list endpoint
#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub student_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Create a router for attendance related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_attendance).put(set_attendance))
}

/// List stored records, optionally narrowed by student and date range
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> impl IntoResponse {
    info!("GET /api/attendance - query: {:?}", query);

    let range = match DateRange::open(query.start_date.as_deref(), query.end_date.as_deref()) {
        Ok(range) => range,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_DATE_RANGE"),
    };

    let records = state
        .attendance_service
        .read(|book| {
            aggregator::select(book.records(), &range, query.student_id.as_deref())
                .into_iter()
                .map(AttendanceMapper::to_dto)
                .collect::<Vec<_>>()
        })
        .await;

    (StatusCode::OK, Json(AttendanceListResponse { records })).into_response()
}

/// Mark, re-mark or unmark one student on one day
pub async fn set_attendance(
    State(state): State<AppState>,
    Json(request): Json<SetAttendanceRequest>,
) -> impl IntoResponse {
    info!("PUT /api/attendance - request: {:?}", request);

    if let Err(e) = validate_date(&request.date) {
        return error_response(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_DATE");
    }

    // Unmarking never needs the student; it is a no-op when nothing is recorded
    if request.status != AttendanceStatus::Unmarked
        && state.attendance_service.get_student(&request.student_id).await.is_none()
    {
        warn!("Attendance for unknown student {}", request.student_id);
        return error_response(StatusCode::NOT_FOUND, "Student not found", "STUDENT_NOT_FOUND");
    }

    let (change, record) = state
        .attendance_service
        .set_attendance(&request.date, &request.student_id, request.status)
        .await;

    (StatusCode::OK, Json(SetAttendanceResponse { change, record })).into_response()
}
