use serde::{Deserialize, Serialize};
use std::fmt;

/// Attendance state of a student on a given day.
///
/// `Unmarked` means "no record exists" and is never written to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Leave,
    Absent,
    Unmarked,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Leave => "leave",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Unmarked => "unmarked",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student on the class roster.
///
/// Serialized in camelCase so persisted snapshots keep the
/// `{id, name, addedAt}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Creation time in epoch milliseconds
    pub added_at: i64,
}

/// Attendance record ID in format: "<YYYY-MM-DD>_<student id>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    /// Calendar date (YYYY-MM-DD, no timezone)
    pub date: String,
    pub student_id: String,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Build the record ID from its natural key
    pub fn generate_id(date: &str, student_id: &str) -> String {
        format!("{}_{}", date, student_id)
    }
}

/// Response containing the roster in insertion order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}

/// Request for adding a student to the roster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddStudentRequest {
    pub name: String,
}

/// Response after adding a student. `student` is `None` when the name was blank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentResponse {
    pub student: Option<Student>,
    pub success_message: String,
}

/// Response after removing a student and their attendance history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoveStudentResponse {
    pub removed: bool,
    pub removed_records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceListResponse {
    pub records: Vec<AttendanceRecord>,
}

/// Request for marking (or unmarking) one student on one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetAttendanceRequest {
    pub date: String,
    pub student_id: String,
    pub status: AttendanceStatus,
}

/// What a set-attendance call did to the record collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceChange {
    Inserted,
    Updated,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetAttendanceResponse {
    pub change: AttendanceChange,
    /// The stored record after the change, `None` when the day is unmarked
    pub record: Option<AttendanceRecord>,
}

/// Attendance rate for one calendar month, used by the trend chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRate {
    /// Month key (YYYY-MM)
    pub month: String,
    pub total: u32,
    /// Present percentage in [0, 100], unrounded
    pub rate: f64,
}

/// Headline counts for a period
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusTotals {
    pub present: u32,
    pub leave: u32,
    pub absent: u32,
    pub total: u32,
    /// Present percentage rounded to an integer
    pub rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResponse {
    pub start_date: String,
    pub end_date: String,
    pub student_id: Option<String>,
    pub monthly: Vec<MonthlyRate>,
    pub totals: StatusTotals,
}

/// Request for an AI-written attendance report
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryResponse {
    /// Markdown text, or a fixed user-facing message when no report could be produced
    pub summary: String,
}

/// Type of calendar cell for explicit rendering logic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CalendarDayType {
    /// Empty padding cell before the first day of the month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
}

/// A single cell of a student's attendance calendar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    pub day: u32,
    /// Date key (YYYY-MM-DD), `None` for padding cells
    pub date: Option<String>,
    pub status: AttendanceStatus,
    pub day_type: CalendarDayType,
}

/// One month of attendance for one student
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonth {
    pub student_id: String,
    pub month: u32,
    pub year: u32,
    pub first_day_of_week: u32, // 0 = Sunday, 1 = Monday, etc.
    pub days: Vec<CalendarDay>,
    pub previous: MonthRef,
    pub next: MonthRef,
}

/// A year/month pair the calendar can navigate to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthRef {
    pub year: u32,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub students: usize,
    pub records: usize,
}
