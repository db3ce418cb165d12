//! # Record Store
//!
//! Persists the roster and the attendance records as two independent
//! whole-collection JSON snapshots:
//!
//! ```text
//! key_values
//! ├── sa_students  → [{"id": "...", "name": "...", "addedAt": 1704067200000}, ...]
//! └── sa_records   → [{"id": "2024-01-05_<id>", "date": "2024-01-05", "studentId": "<id>", "status": "present"}, ...]
//! ```
//!
//! Each save rewrites the full collection. Loading never fails: a missing,
//! unreadable or malformed snapshot is treated as an empty collection.

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{AttendanceRecord, Student};
use tracing::{debug, info, warn};

use super::traits::KeyValueStorage;

/// Storage key holding the student collection
pub const STUDENTS_KEY: &str = "sa_students";
/// Storage key holding the attendance record collection
pub const RECORDS_KEY: &str = "sa_records";

/// Both persisted collections as read from storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub students: Vec<Student>,
    pub records: Vec<AttendanceRecord>,
}

/// Snapshot persistence over any key-value backend
#[derive(Clone)]
pub struct RecordStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load both collections, substituting empty ones for anything unusable
    pub async fn load(&self) -> Snapshot {
        let students: Vec<Student> = self.load_collection(STUDENTS_KEY).await;
        let records: Vec<AttendanceRecord> = self.load_collection(RECORDS_KEY).await;

        info!(
            "Loaded {} students and {} attendance records from storage",
            students.len(),
            records.len()
        );

        Snapshot { students, records }
    }

    /// Persist the whole student collection
    pub async fn save_students(&self, students: &[Student]) -> Result<()> {
        self.save_collection(STUDENTS_KEY, students).await
    }

    /// Persist the whole attendance record collection
    pub async fn save_records(&self, records: &[AttendanceRecord]) -> Result<()> {
        self.save_collection(RECORDS_KEY, records).await
    }

    /// Persist both collections
    pub async fn save(&self, students: &[Student], records: &[AttendanceRecord]) -> Result<()> {
        self.save_students(students).await?;
        self.save_records(records).await
    }

    async fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.storage.get_value(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Discarding malformed snapshot under {}: {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No snapshot stored under {}", key);
                Vec::new()
            }
            Err(e) => {
                warn!("Could not read snapshot under {}: {:#}", key, e);
                Vec::new()
            }
        }
    }

    async fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.storage.put_value(key, &json).await?;
        debug!("Saved {} items under {}", items.len(), key);
        Ok(())
    }
}
