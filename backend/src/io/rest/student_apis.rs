//! # REST API for the Class Roster
//!
//! Endpoints for listing, adding and removing students.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use super::error_response;
use crate::AppState;
use shared::{AddStudentRequest, RemoveStudentResponse, StudentListResponse, StudentResponse};

/// Create a router for roster related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(add_student))
        .route("/:student_id", get(get_student).delete(remove_student))
}

/// List all students in insertion order
pub async fn list_students(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/students");

    let students = state.attendance_service.list_students().await;
    (StatusCode::OK, Json(StudentListResponse { students }))
}

/// Add a student. A blank name is accepted and ignored.
pub async fn add_student(
    State(state): State<AppState>,
    Json(request): Json<AddStudentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students - request: {:?}", request);

    let name = request.name.trim();
    if name.is_empty() {
        let response = StudentResponse {
            student: None,
            success_message: "Student name is empty, nothing was added".to_string(),
        };
        return (StatusCode::OK, Json(response)).into_response();
    }

    let student = state.attendance_service.add_student(name).await;
    let response = StudentResponse {
        success_message: format!("Student '{}' added", student.name),
        student: Some(student),
    };
    (StatusCode::CREATED, Json(response)).into_response()
}

/// Get a student by ID
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/students/{}", student_id);

    match state.attendance_service.get_student(&student_id).await {
        Some(student) => (StatusCode::OK, Json(student)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Student not found", "STUDENT_NOT_FOUND"),
    }
}

/// Remove a student together with their attendance history
pub async fn remove_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/students/{}", student_id);

    let removal = state.attendance_service.remove_student(&student_id).await;
    (
        StatusCode::OK,
        Json(RemoveStudentResponse {
            removed: removal.removed,
            removed_records: removal.removed_records,
        }),
    )
}
