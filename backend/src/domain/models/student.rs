use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Domain model representing a student on the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub added_at: DateTime<Utc>,
}

impl Student {
    /// Create a student with a freshly generated ID
    pub fn new(name: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        Self {
            id: Self::generate_id(),
            name: name.into(),
            added_at,
        }
    }

    /// Generate a unique ID for a student
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}
