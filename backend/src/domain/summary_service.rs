//! AI-written attendance reports.
//!
//! `SummaryService` turns a selection of students and records into a prompt,
//! hands it to a `TextGenerator` and always comes back with displayable text.
//! Provider failures are logged and replaced by a fixed message.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub const NO_DATA_MESSAGE: &str = "No student data is available for analysis.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "Unable to generate an attendance summary.";
pub const UNAVAILABLE_MESSAGE: &str = "The AI service is currently unavailable. Please try again later.";

/// Failure talking to the text generation provider
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("No API key configured for the text generation service")]
    MissingApiKey,
    #[error("Request to text generation service failed: {0}")]
    Transport(String),
    #[error("Text generation timed out")]
    Timeout,
    #[error("Text generation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Could not decode text generation response: {0}")]
    Decode(String),
}

/// Something that turns a prompt into free text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// `Ok(None)` means the provider answered without any text
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerationError>;
}

/// Held while a summary request is outstanding
#[derive(Debug)]
pub struct SummaryGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SummaryGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct SummaryService {
    generator: Arc<dyn TextGenerator>,
    language: String,
    timeout: Duration,
    in_flight: Arc<AtomicBool>,
}

impl SummaryService {
    pub fn new(generator: Arc<dyn TextGenerator>, language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            generator,
            language: language.into(),
            timeout,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claim the single summary slot. Returns `None` while another request holds it.
    pub fn try_begin(&self) -> Option<SummaryGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SummaryGuard {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn build_prompt(
        &self,
        students: &[shared::Student],
        records: &[shared::AttendanceRecord],
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> String {
        let period = match (start_date, end_date) {
            (Some(start), Some(end)) => format!("from {} to {}", start, end),
            _ => "all recorded history".to_string(),
        };
        let students_json = serde_json::to_string(students).unwrap_or_else(|_| "[]".to_string());
        let records_json = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());

        format!(
            "Using the student attendance data below, write a professional and detailed \
             attendance report for the teacher covering {period}.\n\
             \n\
             Focus on:\n\
             1. The overall attendance rate.\n\
             2. Students with frequent leave or absence, and the details of each case.\n\
             3. Attendance patterns (for example a low rate on Mondays, or unusual absences in a specific period).\n\
             4. Suggestions for the teacher on improvements or on caring for students.\n\
             \n\
             Students: {students_json}\n\
             Attendance records: {records_json}\n\
             \n\
             Answer in {language}, keeping the tone warm and professional. Format the output as Markdown.",
            period = period,
            students_json = students_json,
            records_json = records_json,
            language = self.language,
        )
    }

    /// Produce a report for the given selection. Never fails: every error
    /// path resolves to one of the fixed messages.
    pub async fn summarize(
        &self,
        students: &[shared::Student],
        records: &[shared::AttendanceRecord],
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> String {
        if students.is_empty() {
            info!("Summary requested with no students, skipping generation");
            return NO_DATA_MESSAGE.to_string();
        }

        let prompt = self.build_prompt(students, records, start_date, end_date);
        info!(
            "Requesting attendance summary for {} students and {} records",
            students.len(),
            records.len()
        );

        let outcome = match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout),
        };

        match outcome {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Text generation returned no content");
                EMPTY_RESPONSE_MESSAGE.to_string()
            }
            Err(e) => {
                error!("Attendance summary failed: {}", e);
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }
}
