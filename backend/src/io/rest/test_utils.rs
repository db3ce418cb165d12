//! Shared helpers for REST handler tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

use crate::config::AppConfig;
use crate::domain::summary_service::{GenerationError, TextGenerator};
use crate::storage::test_utils::TestEnvironment;
use crate::{create_router, AppState};

/// Generator that answers every prompt with the same text
pub struct CannedGenerator {
    reply: String,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl CannedGenerator {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        Ok(Some(self.reply.clone()))
    }
}

/// Full router over an isolated database
pub struct TestApp {
    pub env: TestEnvironment,
    pub state: AppState,
    pub router: Router,
    pub generator: Arc<CannedGenerator>,
}

impl TestApp {
    pub async fn new() -> Self {
        let env = TestEnvironment::new().await.expect("Failed to create test environment");
        let generator = CannedGenerator::new("## Attendance report");
        let config = AppConfig::default();
        let state = AppState::with_storage(env.connection.clone(), generator.clone(), &config.summary).await;
        let router = create_router(state.clone(), &config).expect("Failed to build router");

        Self {
            env,
            state,
            router,
            generator,
        }
    }

    /// Send a request and decode the body as JSON (plain text becomes a JSON string)
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, json)
    }

    /// Add a student through the API and return its id
    pub async fn add_student(&self, name: &str) -> String {
        let (status, body) = self
            .request(Method::POST, "/api/students", Some(serde_json::json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["student"]["id"].as_str().unwrap().to_string()
    }
}
