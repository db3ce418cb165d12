/// Test utilities for storage-backed tests
///
/// Provides RAII-based cleanup: the temporary directory holding the test
/// database is removed when the `TestEnvironment` goes out of scope, even if
/// the test panics.
use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::DbConnection;
use super::record_store::RecordStore;

/// RAII Test Environment that automatically cleans up on drop
pub struct TestEnvironment {
    /// The temporary directory - kept alive to prevent auto-cleanup until drop
    _temp_dir: TempDir,
    /// The database connection for the test
    pub connection: DbConnection,
    /// Path of the SQLite file, for reopening in persistence tests
    pub db_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment with a fresh database file
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("attendance_test_")?;
        let db_path = temp_dir.path().join("attendance.db");
        let connection = DbConnection::open_file(&db_path).await?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            db_path,
        })
    }

    /// A record store over this environment's database
    pub fn record_store(&self) -> RecordStore<DbConnection> {
        RecordStore::new(self.connection.clone())
    }
}
