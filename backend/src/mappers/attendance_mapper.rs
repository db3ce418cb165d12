use anyhow::{Context, Result};

use crate::domain::models::{AttendanceKey, AttendanceRecord as DomainRecord, MarkedStatus};
use crate::domain::validation::validate_date;
use shared::AttendanceRecord as SharedRecord;

/// Mapper to convert between shared AttendanceRecord DTOs and domain records.
pub struct AttendanceMapper;

impl AttendanceMapper {
    /// Converts a shared record DTO to a domain record.
    ///
    /// The stored `id` is ignored and re-derived from `(date, studentId)`.
    pub fn to_domain(dto: SharedRecord) -> Result<DomainRecord> {
        validate_date(&dto.date).context("Stored attendance record has a malformed date")?;

        let status = MarkedStatus::from_status(dto.status).ok_or_else(|| {
            anyhow::anyhow!("Record {} carries the unmarked status", dto.id)
        })?;

        Ok(DomainRecord::new(AttendanceKey::new(dto.date, dto.student_id), status))
    }

    /// Converts a domain record to a shared record DTO.
    pub fn to_dto(domain: &DomainRecord) -> SharedRecord {
        SharedRecord {
            id: domain.key.id(),
            date: domain.key.date.clone(),
            student_id: domain.key.student_id.clone(),
            status: domain.status.as_status(),
        }
    }
}
