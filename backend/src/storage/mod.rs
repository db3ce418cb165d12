//! # Storage Module
//!
//! Handles all data persistence for the attendance tracker.
//!
//! The roster and the attendance records are each stored as one JSON
//! snapshot in a SQLite key-value table. The domain never talks to SQLite
//! directly; it goes through the `RecordStore`, which is generic over the
//! `KeyValueStorage` trait.

pub mod connection;
pub mod record_store;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use connection::DbConnection;
pub use record_store::{RecordStore, Snapshot, RECORDS_KEY, STUDENTS_KEY};
pub use traits::KeyValueStorage;
