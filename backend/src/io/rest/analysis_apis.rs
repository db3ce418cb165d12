//! # REST API for Attendance Analysis
//!
//! Monthly trend and headline totals for a period, plus the AI-written
//! summary of the same selection.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::error_response;
use crate::domain::aggregator::{self, DateRange};
use crate::domain::validation::ValidationError;
use crate::mappers::{AttendanceMapper, StudentMapper};
use crate::AppState;
use shared::{AnalysisResponse, SummaryRequest, SummaryResponse};

/// Query parameters for the analysis endpoint
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub student_id: Option<String>,
}

/// Create a router for analysis related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_analysis))
        .route("/summary", post(create_summary))
}

/// With no bounds at all the analysis covers the last six months
fn analysis_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, ValidationError> {
    match (start, end) {
        (None, None) => Ok(DateRange::last_six_months(Utc::now().date_naive())),
        _ => DateRange::open(start, end),
    }
}

/// Monthly present rates and status totals
pub async fn get_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> impl IntoResponse {
    info!("GET /api/analysis - query: {:?}", query);

    let range = match analysis_range(query.start_date.as_deref(), query.end_date.as_deref()) {
        Ok(range) => range,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_DATE_RANGE"),
    };

    let student_id = query.student_id.as_deref();
    let analysis = state
        .attendance_service
        .read(|book| {
            if student_id.map_or(false, |id| !book.has_student(id)) {
                return None;
            }
            Some(aggregator::analyze(book.records(), &range, student_id))
        })
        .await;

    match analysis {
        Some(analysis) => {
            let response = AnalysisResponse {
                start_date: range.start,
                end_date: range.end,
                student_id: query.student_id,
                monthly: analysis.monthly,
                totals: analysis.totals,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "Student not found", "STUDENT_NOT_FOUND"),
    }
}

/// Ask the text generator for a report on the selected students and records.
///
/// Only one summary may be outstanding at a time; a second request while one
/// is pending gets 409.
pub async fn create_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> impl IntoResponse {
    info!("POST /api/analysis/summary - request: {:?}", request);

    let range = match analysis_range(request.start_date.as_deref(), request.end_date.as_deref()) {
        Ok(range) => range,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_DATE_RANGE"),
    };

    // A half-open request keeps the caller's bounds as the period text
    let period = match (request.start_date.as_deref(), request.end_date.as_deref()) {
        (None, None) => (Some(range.start.as_str()), Some(range.end.as_str())),
        bounds => bounds,
    };

    let Some(_guard) = state.summary_service.try_begin() else {
        warn!("Summary requested while another one is pending");
        return error_response(
            StatusCode::CONFLICT,
            "A summary is already being generated",
            "SUMMARY_IN_PROGRESS",
        );
    };

    let student_id = request.student_id.as_deref();
    let selection = state
        .attendance_service
        .read(|book| {
            let students = match student_id {
                Some(id) => vec![StudentMapper::to_dto(book.student(id)?)],
                None => book.student_dtos(),
            };
            let records = aggregator::select(book.records(), &range, student_id)
                .into_iter()
                .map(AttendanceMapper::to_dto)
                .collect::<Vec<_>>();
            Some((students, records))
        })
        .await;

    let Some((students, records)) = selection else {
        return error_response(StatusCode::NOT_FOUND, "Student not found", "STUDENT_NOT_FOUND");
    };

    let summary = state
        .summary_service
        .summarize(&students, &records, period.0, period.1)
        .await;

    (StatusCode::OK, Json(SummaryResponse { summary })).into_response()
}

#[cfg(test)]
mod tests {
    use crate::domain::summary_service::NO_DATA_MESSAGE;
    use crate::io::rest::test_utils::TestApp;
    use axum::http::{Method, StatusCode};
    use chrono::Utc;
    use serde_json::json;

    async fn seed(app: &TestApp) -> (String, String) {
        let alice = app.add_student("Alice").await;
        let bob = app.add_student("Bob").await;
        for (date, student, status) in [
            ("2024-01-05", &alice, "present"),
            ("2024-01-06", &alice, "absent"),
            ("2024-02-01", &alice, "present"),
            ("2024-01-05", &bob, "leave"),
        ] {
            app.request(
                Method::PUT,
                "/api/attendance",
                Some(json!({ "date": date, "student_id": student, "status": status })),
            )
            .await;
        }
        (alice, bob)
    }

    #[tokio::test]
    async fn test_analysis_for_one_student() {
        let app = TestApp::new().await;
        let (alice, _) = seed(&app).await;

        let uri = format!(
            "/api/analysis?start_date=2024-01-01&end_date=2024-12-31&student_id={}",
            alice
        );
        let (status, body) = app.request(Method::GET, &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["monthly"],
            json!([
                { "month": "2024-01", "total": 2, "rate": 50.0 },
                { "month": "2024-02", "total": 1, "rate": 100.0 },
            ])
        );
        assert_eq!(
            body["totals"],
            json!({ "present": 2, "leave": 0, "absent": 1, "total": 3, "rate": 67 })
        );
    }

    #[tokio::test]
    async fn test_analysis_for_class() {
        let app = TestApp::new().await;
        seed(&app).await;

        let (status, body) = app
            .request(Method::GET, "/api/analysis?start_date=2024-01-01&end_date=2024-01-31", None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totals"]["total"], 3);
        assert_eq!(body["totals"]["leave"], 1);
        assert_eq!(body["start_date"], "2024-01-01");
    }

    #[tokio::test]
    async fn test_analysis_rejects_bad_range_and_unknown_student() {
        let app = TestApp::new().await;

        let (status, _) = app
            .request(Method::GET, "/api/analysis?start_date=2024-03-01&end_date=2024-01-01", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.request(Method::GET, "/api/analysis?student_id=ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_default_range_is_recent() {
        let app = TestApp::new().await;

        let (status, body) = app.request(Method::GET, "/api/analysis", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["start_date"].as_str().unwrap() < body["end_date"].as_str().unwrap());
        assert!(body["monthly"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_without_students_skips_generator() {
        let app = TestApp::new().await;

        let (status, body) = app.request(Method::POST, "/api/analysis/summary", Some(json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], NO_DATA_MESSAGE);
        assert_eq!(app.generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_summary_returns_generated_text() {
        let app = TestApp::new().await;
        let (alice, _) = seed(&app).await;

        let request = json!({ "start_date": "2024-01-01", "end_date": "2024-01-31", "student_id": alice });
        let (status, body) = app.request(Method::POST, "/api/analysis/summary", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "## Attendance report");
        assert_eq!(app.generator.calls(), 1);
        assert!(app.generator.last_prompt().unwrap().contains("from 2024-01-01 to 2024-01-31"));
        assert!(!app.state.summary_service.is_busy());
    }

    #[tokio::test]
    async fn test_default_summary_covers_last_six_months() {
        let app = TestApp::new().await;
        let alice = app.add_student("Alice").await;
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        for (date, status) in [("2015-01-05", "absent"), (today.as_str(), "present")] {
            app.request(
                Method::PUT,
                "/api/attendance",
                Some(json!({ "date": date, "student_id": alice, "status": status })),
            )
            .await;
        }

        let (status, _) = app.request(Method::POST, "/api/analysis/summary", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);

        let prompt = app.generator.last_prompt().unwrap();
        assert!(!prompt.contains("2015-01-05"));
        assert!(prompt.contains(&format!("{}_{}", today, alice)));
        assert!(prompt.contains(&format!(" to {}", today)));

        // Analysis over the same default window agrees
        let (_, body) = app.request(Method::GET, "/api/analysis", None).await;
        assert_eq!(body["totals"]["total"], 1);
    }

    #[tokio::test]
    async fn test_summary_is_not_reentrant() {
        let app = TestApp::new().await;
        seed(&app).await;

        let guard = app.state.summary_service.try_begin().unwrap();
        let (status, body) = app.request(Method::POST, "/api/analysis/summary", Some(json!({}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "SUMMARY_IN_PROGRESS");
        assert_eq!(app.generator.calls(), 0);

        drop(guard);
        let (status, _) = app.request(Method::POST, "/api/analysis/summary", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_summary_for_unknown_student() {
        let app = TestApp::new().await;
        seed(&app).await;

        let (status, _) = app
            .request(Method::POST, "/api/analysis/summary", Some(json!({ "student_id": "ghost" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!app.state.summary_service.is_busy());
    }
}
