use anyhow::Result;
use chrono::DateTime;

use crate::domain::models::Student as DomainStudent;
use shared::Student as SharedStudent;

/// Mapper to convert between shared Student DTOs and domain Student models.
pub struct StudentMapper;

impl StudentMapper {
    /// Converts a shared Student DTO to a domain Student model.
    pub fn to_domain(dto: SharedStudent) -> Result<DomainStudent> {
        let added_at = DateTime::from_timestamp_millis(dto.added_at).ok_or_else(|| {
            anyhow::anyhow!("Invalid addedAt timestamp {} for student {}", dto.added_at, dto.id)
        })?;

        Ok(DomainStudent {
            id: dto.id,
            name: dto.name,
            added_at,
        })
    }

    /// Converts a domain Student model to a shared Student DTO.
    pub fn to_dto(domain: &DomainStudent) -> SharedStudent {
        SharedStudent {
            id: domain.id.clone(),
            name: domain.name.clone(),
            added_at: domain.added_at.timestamp_millis(),
        }
    }
}
