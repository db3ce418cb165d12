//! # Attendance Tracker Backend
//!
//! Contains all non-UI logic for the attendance tracker.
//!
//! ## Architecture
//!
//! ```text
//! UI (browser)
//!     ↓
//! IO Layer (REST API, text generation client)
//!     ↓
//! Domain Layer (attendance book, aggregation, calendar, summaries)
//!     ↓
//! Storage Layer (record store over a SQLite key-value table)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod mappers;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{default_database_path, AppConfig, SummaryConfig};
use crate::domain::{AttendanceService, CalendarService, SummaryService, TextGenerator};
use crate::io::GeminiClient;
use crate::storage::{DbConnection, RecordStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub attendance_service: AttendanceService<DbConnection>,
    pub calendar_service: CalendarService,
    pub summary_service: SummaryService,
}

impl AppState {
    /// Build the services over an open database and a text generator
    pub async fn with_storage(
        db_conn: DbConnection,
        generator: Arc<dyn TextGenerator>,
        summary: &SummaryConfig,
    ) -> Self {
        let attendance_service = AttendanceService::load(RecordStore::new(db_conn)).await;
        let summary_service = SummaryService::new(
            generator,
            summary.language.clone(),
            Duration::from_secs(summary.timeout_secs),
        );

        Self {
            attendance_service,
            calendar_service: CalendarService::new(),
            summary_service,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = match &config.database_url {
        Some(url) => DbConnection::new(url).await?,
        None => DbConnection::open_file(&default_database_path()).await?,
    };

    info!("Setting up text generation client for model {}", config.summary.model);
    if config.summary.api_key.is_none() {
        info!("No API key configured, attendance summaries will report the service as unavailable");
    }
    let generator = GeminiClient::new(&config.summary).context("Failed to build text generation client")?;

    info!("Setting up application state");
    Ok(AppState::with_storage(db_conn, Arc::new(generator), &config.summary).await)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    // CORS setup to allow frontend to make requests
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let mut router = Router::new()
        .nest("/api", io::rest::router())
        .with_state(app_state);

    if let Some(static_dir) = &config.static_dir {
        info!("Serving static files from {}", static_dir.display());
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    Ok(router.layer(cors).layer(TraceLayer::new_for_http()))
}
