pub mod attendance;
pub mod student;

pub use attendance::{AttendanceKey, AttendanceRecord, MarkedStatus};
pub use student::Student;
