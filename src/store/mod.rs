//! Document store access
//!
//! [`StringStore`] is the only seam between the service and persistence.
//! The MongoDB implementation is the production backend; the in-memory one
//! backs tests and local development.

pub mod memory;
#[cfg(feature = "mongodb-backend")]
pub mod mongo;

pub use memory::MemoryStringStore;
#[cfg(feature = "mongodb-backend")]
pub use mongo::MongoStringStore;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::analyzer::StringRecord;
use crate::config::{DatabaseConfig, StoreBackend};
use crate::filter::StructuredFilter;

/// Store-level errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Persistence operations for string records
#[async_trait]
pub trait StringStore: Send + Sync {
    /// Verifies the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Creates the lookup indexes, including the unique index on `id`
    async fn ensure_indexes(&self) -> Result<(), StoreError>;

    /// Looks a record up by content hash
    async fn find_by_id(&self, id: &str) -> Result<Option<StringRecord>, StoreError>;

    /// Looks a record up by exact value
    async fn find_by_value(&self, value: &str) -> Result<Option<StringRecord>, StoreError>;

    /// Returns every record matching `filter`; an empty filter matches all
    async fn find(&self, filter: &StructuredFilter) -> Result<Vec<StringRecord>, StoreError>;

    /// Inserts a record.
    ///
    /// # Errors
    /// * [`StoreError::DuplicateKey`] if a record with the same `id` exists
    async fn insert(&self, record: &StringRecord) -> Result<(), StoreError>;

    /// Deletes the record with this exact value, returning whether one existed
    async fn delete_by_value(&self, value: &str) -> Result<bool, StoreError>;
}

/// Opens the configured backend. Called once at process start.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn StringStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory string store");
            Ok(Arc::new(MemoryStringStore::new()))
        }
        #[cfg(feature = "mongodb-backend")]
        StoreBackend::MongoDb => Ok(Arc::new(MongoStringStore::connect(config).await?)),
        #[cfg(not(feature = "mongodb-backend"))]
        StoreBackend::MongoDb => Err(StoreError::ConfigurationError(
            "MongoDB backend requested but the mongodb-backend feature is disabled".to_string(),
        )),
    }
}
