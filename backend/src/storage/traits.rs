//! # Storage Traits
//!
//! The record store only needs whole-value reads and writes under fixed
//! keys, so the backend abstraction is a plain key-value interface.

use anyhow::Result;
use async_trait::async_trait;

/// Trait defining the interface for key-value storage operations
///
/// Values are opaque strings; callers own the serialization format.
#[async_trait]
pub trait KeyValueStorage: Send + Sync + Clone {
    /// Retrieve a value by its key
    async fn get_value(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, overwriting any existing value for the same key
    async fn put_value(&self, key: &str, value: &str) -> Result<()>;
}
