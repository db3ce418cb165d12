//! # Domain Module
//!
//! Business rules for the attendance tracker.
//!
//! - `attendance_book`: the in-memory roster and record collection with the
//!   one-record-per-day and cascade-on-remove rules
//! - `attendance_service`: serializes mutations and persists after each one
//! - `aggregator`: monthly rates and headline totals over a date range
//! - `calendar`: per-student month grids
//! - `summary_service`: AI-written reports behind the `TextGenerator` trait
//!
//! Nothing here knows about HTTP. Storage is reached only through
//! `RecordStore`.

pub mod aggregator;
pub mod attendance_book;
pub mod attendance_service;
pub mod calendar;
pub mod models;
pub mod summary_service;
pub mod validation;

pub use aggregator::{AttendanceAnalysis, DateRange};
pub use attendance_book::{AttendanceBook, StudentRemoval};
pub use attendance_service::AttendanceService;
pub use calendar::CalendarService;
pub use summary_service::{GenerationError, SummaryGuard, SummaryService, TextGenerator};
pub use validation::{validate_date, validate_month, ValidationError};
