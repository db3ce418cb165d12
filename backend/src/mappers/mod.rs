//! Conversions between the `shared` DTOs (wire and storage shape) and the
//! domain models.

pub mod attendance_mapper;
pub mod student_mapper;

pub use attendance_mapper::AttendanceMapper;
pub use student_mapper::StudentMapper;
