//! Domain model for attendance records.
//!
//! A record is identified by its `(date, student_id)` pair. The string ID
//! used on the wire and in storage is only a projection of that key.

use shared::AttendanceStatus;
use std::fmt;

/// Natural key of an attendance record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttendanceKey {
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub student_id: String,
}

impl AttendanceKey {
    pub fn new(date: impl Into<String>, student_id: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            student_id: student_id.into(),
        }
    }

    /// String form of the key: "<date>_<student_id>"
    pub fn id(&self) -> String {
        shared::AttendanceRecord::generate_id(&self.date, &self.student_id)
    }

    /// Month key (YYYY-MM) taken from the date prefix
    pub fn month(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }
}

impl fmt::Display for AttendanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.date, self.student_id)
    }
}

/// A status that can actually be stored. "Unmarked" is the absence of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkedStatus {
    Present,
    Leave,
    Absent,
}

impl MarkedStatus {
    /// `None` for `Unmarked`
    pub fn from_status(status: AttendanceStatus) -> Option<Self> {
        match status {
            AttendanceStatus::Present => Some(MarkedStatus::Present),
            AttendanceStatus::Leave => Some(MarkedStatus::Leave),
            AttendanceStatus::Absent => Some(MarkedStatus::Absent),
            AttendanceStatus::Unmarked => None,
        }
    }

    pub fn as_status(self) -> AttendanceStatus {
        match self {
            MarkedStatus::Present => AttendanceStatus::Present,
            MarkedStatus::Leave => AttendanceStatus::Leave,
            MarkedStatus::Absent => AttendanceStatus::Absent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub key: AttendanceKey,
    pub status: MarkedStatus,
}

impl AttendanceRecord {
    pub fn new(key: AttendanceKey, status: MarkedStatus) -> Self {
        Self { key, status }
    }

    pub fn date(&self) -> &str {
        &self.key.date
    }

    pub fn student_id(&self) -> &str {
        &self.key.student_id
    }

    pub fn month(&self) -> &str {
        self.key.month()
    }
}
