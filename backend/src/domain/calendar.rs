//! Calendar domain logic for the attendance tracker.
//!
//! Builds the monthly attendance grid for one student: padding cells up to
//! the first weekday of the month, then one cell per day carrying that day's
//! status. The UI only lays the cells out.

use chrono::{Datelike, NaiveDate};
use shared::{AttendanceStatus, CalendarDay, CalendarDayType, CalendarMonth, MonthRef};
use std::collections::HashMap;
use tracing::debug;

use crate::domain::attendance_book::AttendanceBook;
use crate::domain::validation::{validate_month, ValidationError};

/// Calendar service that handles all calendar-related business logic
#[derive(Clone, Default)]
pub struct CalendarService;

impl CalendarService {
    /// Create a new CalendarService instance
    pub fn new() -> Self {
        Self
    }

    /// Generate one month of attendance for a student
    pub fn student_month(
        &self,
        student_id: &str,
        year: u32,
        month: u32,
        book: &AttendanceBook,
    ) -> Result<CalendarMonth, ValidationError> {
        validate_month(year, month)?;

        let days_in_month = self.days_in_month(month, year);
        let first_day = self.first_day_of_month(month, year);
        let month_prefix = format!("{:04}-{:02}", year, month);

        let statuses: HashMap<&str, AttendanceStatus> = book
            .records()
            .iter()
            .filter(|r| r.student_id() == student_id && r.month() == month_prefix)
            .map(|r| (r.date(), r.status.as_status()))
            .collect();

        debug!(
            "Calendar {} for {}: {} days, {} marked, starts on weekday {}",
            month_prefix,
            student_id,
            days_in_month,
            statuses.len(),
            first_day
        );

        let mut days = Vec::with_capacity((first_day + days_in_month) as usize);

        for _ in 0..first_day {
            days.push(CalendarDay {
                day: 0,
                date: None,
                status: AttendanceStatus::Unmarked,
                day_type: CalendarDayType::PaddingBefore,
            });
        }

        for day in 1..=days_in_month {
            let date = self.date_key(year, month, day);
            let status = statuses
                .get(date.as_str())
                .copied()
                .unwrap_or(AttendanceStatus::Unmarked);
            days.push(CalendarDay {
                day,
                date: Some(date),
                status,
                day_type: CalendarDayType::MonthDay,
            });
        }

        let (previous_year, previous_month) = self.previous_month(year, month);
        let (next_year, next_month) = self.next_month(year, month);

        Ok(CalendarMonth {
            student_id: student_id.to_string(),
            month,
            year,
            first_day_of_week: first_day,
            days,
            previous: MonthRef {
                year: previous_year,
                month: previous_month,
            },
            next: MonthRef {
                year: next_year,
                month: next_month,
            },
        })
    }

    /// Number of days in a month, measured between its first day and the next month's
    pub fn days_in_month(&self, month: u32, year: u32) -> u32 {
        let (next_year, next_month) = self.next_month(year, month);
        match (
            NaiveDate::from_ymd_opt(year as i32, month, 1),
            NaiveDate::from_ymd_opt(next_year as i32, next_month, 1),
        ) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            _ => 0,
        }
    }

    /// Get the first day of month (0 = Sunday, 1 = Monday, etc.)
    pub fn first_day_of_month(&self, month: u32, year: u32) -> u32 {
        NaiveDate::from_ymd_opt(year as i32, month, 1)
            .map(|date| date.weekday().num_days_from_sunday())
            .unwrap_or(0)
    }

    /// Zero-padded date key (YYYY-MM-DD) for a calendar cell
    pub fn date_key(&self, year: u32, month: u32, day: u32) -> String {
        format!("{:04}-{:02}-{:02}", year, month, day)
    }

    /// Month before the given one, as (year, month)
    pub fn previous_month(&self, year: u32, month: u32) -> (u32, u32) {
        if month <= 1 {
            (year.saturating_sub(1), 12)
        } else {
            (year, month - 1)
        }
    }

    /// Month after the given one, as (year, month)
    pub fn next_month(&self, year: u32, month: u32) -> (u32, u32) {
        if month >= 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        }
    }
}
