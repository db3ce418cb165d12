//! Attendance statistics.
//!
//! Everything here is a pure function of a record slice. Dates are
//! zero-padded `YYYY-MM-DD` strings, so range checks and month grouping work
//! on plain string comparison and the first seven characters of the date.

use chrono::{Months, NaiveDate};
use shared::{MonthlyRate, StatusTotals};
use std::collections::BTreeMap;

use crate::domain::models::{AttendanceRecord, MarkedStatus};
use crate::domain::validation::{validate_date, ValidationError};

/// Inclusive date window used for statistics and summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// Lower bound used when a request leaves the start open
    pub const EARLIEST: &'static str = "0000-01-01";
    /// Upper bound used when a request leaves the end open
    pub const LATEST: &'static str = "9999-12-31";

    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, ValidationError> {
        let range = Self {
            start: start.into(),
            end: end.into(),
        };
        validate_date(&range.start)?;
        validate_date(&range.end)?;
        if range.start > range.end {
            return Err(ValidationError::InvertedRange {
                start: range.start,
                end: range.end,
            });
        }
        Ok(range)
    }

    /// Range with either bound optional; a missing bound is unbounded
    pub fn open(start: Option<&str>, end: Option<&str>) -> Result<Self, ValidationError> {
        Self::new(start.unwrap_or(Self::EARLIEST), end.unwrap_or(Self::LATEST))
    }

    /// The default analysis window: six calendar months back from `today`
    pub fn last_six_months(today: NaiveDate) -> Self {
        let start = today.checked_sub_months(Months::new(6)).unwrap_or(today);
        Self {
            start: start.format("%Y-%m-%d").to_string(),
            end: today.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn contains(&self, date: &str) -> bool {
        date >= self.start.as_str() && date <= self.end.as_str()
    }
}

/// Monthly chart series plus headline totals for one selection of records
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceAnalysis {
    pub monthly: Vec<MonthlyRate>,
    pub totals: StatusTotals,
}

/// Records whose date lies within `[start, end]`
pub fn filter_by_range<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
    range: &DateRange,
) -> Vec<&'a AttendanceRecord> {
    records.into_iter().filter(|r| range.contains(r.date())).collect()
}

/// Records for one student; with no student every record passes
pub fn filter_by_student<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
    student_id: Option<&str>,
) -> Vec<&'a AttendanceRecord> {
    records
        .into_iter()
        .filter(|r| student_id.map_or(true, |id| r.student_id() == id))
        .collect()
}

/// Present rate per `YYYY-MM` month, ascending by month.
/// Only months with at least one record appear.
pub fn monthly_rates<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Vec<MonthlyRate> {
    let mut months: BTreeMap<&str, (u32, u32)> = BTreeMap::new();

    for record in records {
        let (present, total) = months.entry(record.month()).or_insert((0, 0));
        *total += 1;
        if record.status == MarkedStatus::Present {
            *present += 1;
        }
    }

    months
        .into_iter()
        .map(|(month, (present, total))| MonthlyRate {
            month: month.to_string(),
            total,
            rate: percentage(present, total),
        })
        .collect()
}

/// Status counts with the headline rate rounded to a whole percent
pub fn status_totals<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> StatusTotals {
    let mut totals = StatusTotals::default();

    for record in records {
        match record.status {
            MarkedStatus::Present => totals.present += 1,
            MarkedStatus::Leave => totals.leave += 1,
            MarkedStatus::Absent => totals.absent += 1,
        }
    }

    totals.total = totals.present + totals.leave + totals.absent;
    totals.rate = percentage(totals.present, totals.total).round() as u32;
    totals
}

/// Records in `range`, optionally narrowed to one student
pub fn select<'a>(
    records: &'a [AttendanceRecord],
    range: &DateRange,
    student_id: Option<&str>,
) -> Vec<&'a AttendanceRecord> {
    filter_by_student(filter_by_range(records, range), student_id)
}

/// Range filter, student filter, monthly series and totals in one pass
pub fn analyze(
    records: &[AttendanceRecord],
    range: &DateRange,
    student_id: Option<&str>,
) -> AttendanceAnalysis {
    let selected = select(records, range, student_id);

    AttendanceAnalysis {
        monthly: monthly_rates(selected.iter().copied()),
        totals: status_totals(selected.iter().copied()),
    }
}

fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
