//! In-memory owner of the roster and the attendance records.
//!
//! All mutation rules live here:
//! - students keep insertion order
//! - removing a student removes every record that references it
//! - at most one record exists per `(date, student_id)` key
//! - "unmarked" deletes the record instead of being stored
//!
//! The book does no I/O; `AttendanceService` persists it after each change.

use chrono::{DateTime, Utc};
use shared::{AttendanceChange, AttendanceStatus};
use std::collections::HashSet;
use tracing::warn;

use crate::domain::models::{AttendanceKey, AttendanceRecord, MarkedStatus, Student};
use crate::mappers::{AttendanceMapper, StudentMapper};

/// Result of removing a student
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentRemoval {
    pub removed: bool,
    pub removed_records: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceBook {
    students: Vec<Student>,
    records: Vec<AttendanceRecord>,
}

impl AttendanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from persisted DTOs, dropping anything that would break
    /// an invariant (unmarked or duplicate records, orphans, bad students).
    pub fn from_snapshot(
        students: Vec<shared::Student>,
        records: Vec<shared::AttendanceRecord>,
    ) -> Self {
        let mut book = Self::new();

        let mut student_ids = HashSet::new();
        for dto in students {
            match StudentMapper::to_domain(dto) {
                Ok(student) => {
                    if student_ids.insert(student.id.clone()) {
                        book.students.push(student);
                    } else {
                        warn!("Dropping duplicate student {}", student.id);
                    }
                }
                Err(e) => warn!("Dropping unreadable student: {:#}", e),
            }
        }

        let mut keys = HashSet::new();
        for dto in records {
            match AttendanceMapper::to_domain(dto) {
                Ok(record) => {
                    if !student_ids.contains(record.student_id()) {
                        warn!("Dropping record {} for unknown student", record.key);
                    } else if !keys.insert(record.key.clone()) {
                        warn!("Dropping duplicate record {}", record.key);
                    } else {
                        book.records.push(record);
                    }
                }
                Err(e) => warn!("Dropping unreadable attendance record: {:#}", e),
            }
        }

        book
    }

    /// Students in insertion order
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    pub fn has_student(&self, student_id: &str) -> bool {
        self.student(student_id).is_some()
    }

    pub fn record(&self, key: &AttendanceKey) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| &r.key == key)
    }

    /// Stored status for a day, or `Unmarked` when no record exists
    pub fn status_for(&self, date: &str, student_id: &str) -> AttendanceStatus {
        self.record(&AttendanceKey::new(date, student_id))
            .map(|r| r.status.as_status())
            .unwrap_or(AttendanceStatus::Unmarked)
    }

    /// Append a new student. The caller is responsible for rejecting blank names.
    pub fn add_student(&mut self, name: &str, added_at: DateTime<Utc>) -> Student {
        let mut student = Student::new(name, added_at);
        while self.has_student(&student.id) {
            student.id = Student::generate_id();
        }
        self.students.push(student.clone());
        student
    }

    /// Remove a student together with all of their attendance records
    pub fn remove_student(&mut self, student_id: &str) -> StudentRemoval {
        let before = self.students.len();
        self.students.retain(|s| s.id != student_id);
        let removed = self.students.len() != before;

        let records_before = self.records.len();
        self.records.retain(|r| r.student_id() != student_id);
        let removed_records = records_before - self.records.len();

        StudentRemoval {
            removed,
            removed_records,
        }
    }

    /// Upsert or delete the record keyed by `(date, student_id)`.
    ///
    /// An existing record keeps its position; only its status changes.
    /// Marking an unknown student leaves the book untouched.
    pub fn set_attendance(
        &mut self,
        date: &str,
        student_id: &str,
        status: AttendanceStatus,
    ) -> AttendanceChange {
        let key = AttendanceKey::new(date, student_id);
        let position = self.records.iter().position(|r| r.key == key);

        match (MarkedStatus::from_status(status), position) {
            (None, Some(index)) => {
                self.records.remove(index);
                AttendanceChange::Removed
            }
            (None, None) => AttendanceChange::Unchanged,
            (Some(marked), Some(index)) => {
                let record = &mut self.records[index];
                if record.status == marked {
                    AttendanceChange::Unchanged
                } else {
                    record.status = marked;
                    AttendanceChange::Updated
                }
            }
            (Some(marked), None) => {
                if !self.has_student(student_id) {
                    warn!("Ignoring attendance for unknown student {}", student_id);
                    return AttendanceChange::Unchanged;
                }
                self.records.push(AttendanceRecord::new(key, marked));
                AttendanceChange::Inserted
            }
        }
    }

    pub fn student_dtos(&self) -> Vec<shared::Student> {
        self.students.iter().map(StudentMapper::to_dto).collect()
    }

    pub fn record_dtos(&self) -> Vec<shared::AttendanceRecord> {
        self.records.iter().map(AttendanceMapper::to_dto).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with(names: &[&str]) -> (AttendanceBook, Vec<String>) {
        let mut book = AttendanceBook::new();
        let ids = names
            .iter()
            .map(|name| book.add_student(name, Utc::now()).id)
            .collect();
        (book, ids)
    }

    fn assert_invariants(book: &AttendanceBook) {
        let mut keys = HashSet::new();
        for record in book.records() {
            assert!(keys.insert(record.key.clone()), "duplicate key {}", record.key);
            assert!(book.has_student(record.student_id()), "orphan record {}", record.key);
        }
    }

    #[test]
    fn test_add_student_preserves_insertion_order() {
        let (book, ids) = book_with(&["Zoe", "Adam", "Mia"]);

        let names: Vec<&str> = book.students().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Adam", "Mia"]);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 3);
    }

    #[test]
    fn test_mark_then_change_updates_in_place() {
        let (mut book, ids) = book_with(&["Ada"]);
        let s = &ids[0];

        assert_eq!(book.set_attendance("2024-01-04", s, AttendanceStatus::Leave), AttendanceChange::Inserted);
        assert_eq!(book.set_attendance("2024-01-05", s, AttendanceStatus::Present), AttendanceChange::Inserted);
        assert_eq!(book.set_attendance("2024-01-05", s, AttendanceStatus::Absent), AttendanceChange::Updated);

        assert_eq!(book.records().len(), 2);
        // Position is kept
        assert_eq!(book.records()[1].date(), "2024-01-05");
        assert_eq!(book.records()[1].status, MarkedStatus::Absent);
        assert_eq!(book.status_for("2024-01-05", s), AttendanceStatus::Absent);
    }

    #[test]
    fn test_same_status_is_unchanged() {
        let (mut book, ids) = book_with(&["Ada"]);

        book.set_attendance("2024-01-05", &ids[0], AttendanceStatus::Present);
        assert_eq!(
            book.set_attendance("2024-01-05", &ids[0], AttendanceStatus::Present),
            AttendanceChange::Unchanged
        );
        assert_eq!(book.records().len(), 1);
    }

    #[test]
    fn test_unmark_removes_record_and_is_idempotent() {
        let (mut book, ids) = book_with(&["Ada"]);
        let s = &ids[0];

        book.set_attendance("2024-01-05", s, AttendanceStatus::Present);
        assert_eq!(book.set_attendance("2024-01-05", s, AttendanceStatus::Unmarked), AttendanceChange::Removed);
        assert_eq!(book.set_attendance("2024-01-05", s, AttendanceStatus::Unmarked), AttendanceChange::Unchanged);

        assert!(book.record(&AttendanceKey::new("2024-01-05", s.as_str())).is_none());
        assert_eq!(book.status_for("2024-01-05", s), AttendanceStatus::Unmarked);
    }

    #[test]
    fn test_unknown_student_is_not_marked() {
        let (mut book, _) = book_with(&["Ada"]);

        assert_eq!(
            book.set_attendance("2024-01-05", "ghost", AttendanceStatus::Present),
            AttendanceChange::Unchanged
        );
        assert!(book.records().is_empty());
    }

    #[test]
    fn test_remove_student_cascades() {
        let (mut book, ids) = book_with(&["Ada", "Bob"]);
        for date in ["2024-01-01", "2024-01-02", "2024-01-03"] {
            book.set_attendance(date, &ids[0], AttendanceStatus::Present);
        }
        book.set_attendance("2024-01-01", &ids[1], AttendanceStatus::Absent);

        let removal = book.remove_student(&ids[0]);

        assert_eq!(removal, StudentRemoval { removed: true, removed_records: 3 });
        assert!(!book.has_student(&ids[0]));
        assert!(book.records().iter().all(|r| r.student_id() != ids[0]));
        assert_eq!(book.records().len(), 1);
    }

    #[test]
    fn test_remove_unknown_student_is_noop() {
        let (mut book, _) = book_with(&["Ada"]);

        let removal = book.remove_student("ghost");
        assert_eq!(removal, StudentRemoval { removed: false, removed_records: 0 });
        assert_eq!(book.students().len(), 1);
    }

    #[test]
    fn test_arbitrary_sequences_keep_invariants() {
        let (mut book, ids) = book_with(&["Ada", "Bob"]);
        let statuses = [
            AttendanceStatus::Present,
            AttendanceStatus::Leave,
            AttendanceStatus::Absent,
            AttendanceStatus::Unmarked,
        ];
        let dates = ["2024-01-01", "2024-01-02", "2024-02-01"];

        // Deterministic walk over many (date, student, status) combinations
        for step in 0..200usize {
            let date = dates[(step * 7) % dates.len()];
            let student = &ids[(step * 3) % ids.len()];
            let status = statuses[(step * 5 + step / 3) % statuses.len()];
            book.set_attendance(date, student, status);
            assert_invariants(&book);
        }
        assert!(book.records().len() <= dates.len() * ids.len());
    }

    #[test]
    fn test_from_snapshot_drops_invalid_entries() {
        let students = vec![
            shared::Student { id: "s1".into(), name: "Ada".into(), added_at: 1704067200000 },
            shared::Student { id: "s1".into(), name: "Ada again".into(), added_at: 1704067200000 },
        ];
        let record = |date: &str, student: &str, status| shared::AttendanceRecord {
            id: format!("{}_{}", date, student),
            date: date.into(),
            student_id: student.into(),
            status,
        };
        let records = vec![
            record("2024-01-05", "s1", AttendanceStatus::Present),
            record("2024-01-05", "s1", AttendanceStatus::Absent),
            record("2024-01-06", "s1", AttendanceStatus::Unmarked),
            record("2024-01-07", "ghost", AttendanceStatus::Present),
            record("2024-01-08", "s1", AttendanceStatus::Leave),
        ];

        let book = AttendanceBook::from_snapshot(students, records);

        assert_eq!(book.students().len(), 1);
        assert_eq!(book.students()[0].name, "Ada");
        let kept: Vec<(&str, MarkedStatus)> = book.records().iter().map(|r| (r.date(), r.status)).collect();
        assert_eq!(kept, vec![("2024-01-05", MarkedStatus::Present), ("2024-01-08", MarkedStatus::Leave)]);
    }
}
