use anyhow::Result;
use chrono::Utc;
use shared::{AttendanceChange, AttendanceStatus};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::domain::attendance_book::{AttendanceBook, StudentRemoval};
use crate::domain::models::AttendanceKey;
use crate::mappers::{AttendanceMapper, StudentMapper};
use crate::storage::{KeyValueStorage, RecordStore};

/// Service for managing the roster and daily attendance
///
/// Owns the `AttendanceBook` behind an async mutex. Every mutation holds the
/// lock until the changed collection has been written, so user actions are
/// applied and persisted one at a time.
#[derive(Clone)]
pub struct AttendanceService<S: KeyValueStorage> {
    book: Arc<Mutex<AttendanceBook>>,
    store: RecordStore<S>,
}

impl<S: KeyValueStorage> AttendanceService<S> {
    /// Create the service from whatever the store currently holds
    pub async fn load(store: RecordStore<S>) -> Self {
        let snapshot = store.load().await;
        let book = AttendanceBook::from_snapshot(snapshot.students, snapshot.records);

        info!(
            "Attendance book ready: {} students, {} records",
            book.students().len(),
            book.records().len()
        );

        Self {
            book: Arc::new(Mutex::new(book)),
            store,
        }
    }

    /// Run a read-only computation against the current book
    pub async fn read<R>(&self, f: impl FnOnce(&AttendanceBook) -> R) -> R {
        let book = self.book.lock().await;
        f(&book)
    }

    /// List all students in insertion order
    pub async fn list_students(&self) -> Vec<shared::Student> {
        self.read(|book| book.student_dtos()).await
    }

    /// Get a student by ID
    pub async fn get_student(&self, student_id: &str) -> Option<shared::Student> {
        self.read(|book| book.student(student_id).map(StudentMapper::to_dto))
            .await
    }

    /// Add a student. Blank names must be filtered out by the caller.
    pub async fn add_student(&self, name: &str) -> shared::Student {
        let mut book = self.book.lock().await;
        let student = book.add_student(name, Utc::now());
        info!("Added student: {} with ID: {}", student.name, student.id);

        self.persist_students(&book).await;
        StudentMapper::to_dto(&student)
    }

    /// Remove a student and every attendance record that references them
    pub async fn remove_student(&self, student_id: &str) -> StudentRemoval {
        let mut book = self.book.lock().await;
        let removal = book.remove_student(student_id);

        if removal.removed {
            info!(
                "Removed student {} and {} attendance records",
                student_id, removal.removed_records
            );
            self.persist_students(&book).await;
            self.persist_records(&book).await;
        } else {
            info!("Remove requested for unknown student {}", student_id);
        }

        removal
    }

    /// Mark, re-mark or unmark one student on one day.
    ///
    /// Returns what happened and the stored record afterwards.
    pub async fn set_attendance(
        &self,
        date: &str,
        student_id: &str,
        status: AttendanceStatus,
    ) -> (AttendanceChange, Option<shared::AttendanceRecord>) {
        let mut book = self.book.lock().await;
        let change = book.set_attendance(date, student_id, status);

        if change != AttendanceChange::Unchanged {
            info!("Attendance {}_{} -> {} ({:?})", date, student_id, status, change);
            self.persist_records(&book).await;
        }

        let record = book
            .record(&AttendanceKey::new(date, student_id))
            .map(AttendanceMapper::to_dto);
        (change, record)
    }

    /// Stored status for a day, `Unmarked` when there is no record
    pub async fn status_for(&self, date: &str, student_id: &str) -> AttendanceStatus {
        self.read(|book| book.status_for(date, student_id)).await
    }

    /// Write both collections, used at shutdown
    pub async fn flush(&self) -> Result<()> {
        let book = self.book.lock().await;
        self.store
            .save(&book.student_dtos(), &book.record_dtos())
            .await?;
        info!("Flushed attendance book to storage");
        Ok(())
    }

    async fn persist_students(&self, book: &AttendanceBook) {
        if let Err(e) = self.store.save_students(&book.student_dtos()).await {
            error!("Failed to save students: {:#}", e);
        }
    }

    async fn persist_records(&self, book: &AttendanceBook) {
        if let Err(e) = self.store.save_records(&book.record_dtos()).await {
            error!("Failed to save attendance records: {:#}", e);
        }
    }
}
