//! MongoDB string store
//!
//! Uses the official mongodb driver. One client is created at startup and
//! shared by every request through its internal connection pool.

use super::{StoreError, StringStore};
use crate::analyzer::StringRecord;
use crate::config::DatabaseConfig;
use crate::filter::StructuredFilter;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, Tls, TlsOptions},
    Client, Collection, IndexModel,
};
use std::time::Duration;
use tracing::{debug, info, warn};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB specific error conversion
fn convert_mongodb_error(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Authentication { .. } => {
            StoreError::ConnectionFailed(format!("Authentication failed: {}", err))
        }
        ErrorKind::ConnectionPoolCleared { .. } | ErrorKind::ServerSelection { .. } => {
            StoreError::ConnectionFailed(err.to_string())
        }
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            StoreError::DuplicateKey(write_error.message.clone())
        }
        ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
            StoreError::SerializationError(err.to_string())
        }
        _ => StoreError::QueryFailed(err.to_string()),
    }
}

/// A database named in the URI path wins over the configured one
fn resolve_database_name(client_options: &ClientOptions, configured: &str) -> String {
    client_options
        .default_database
        .clone()
        .unwrap_or_else(|| configured.to_string())
}

/// String store backed by a MongoDB collection
pub struct MongoStringStore {
    client: Client,
    collection: Collection<StringRecord>,
}

impl MongoStringStore {
    /// Connects and pings the server; any failure is returned to the caller
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(convert_mongodb_error)?;

        client_options.max_pool_size = Some(config.max_pool_size);
        client_options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
        client_options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));
        client_options.app_name = Some(config.app_name.clone());

        if config.tls_insecure {
            warn!("TLS certificate validation is disabled for MongoDB. Do not use in production.");
            client_options.tls = Some(Tls::Enabled(
                TlsOptions::builder().allow_invalid_certificates(true).build(),
            ));
        }

        let database = resolve_database_name(&client_options, &config.database);
        let client = Client::with_options(client_options).map_err(convert_mongodb_error)?;
        let collection = client
            .database(&database)
            .collection::<StringRecord>(&config.collection);

        let store = Self { client, collection };
        store.ping().await?;

        info!(
            database = %database,
            collection = %config.collection,
            "Connected to MongoDB"
        );
        Ok(store)
    }

    /// Get reference to MongoDB client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl StringStore for MongoStringStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(convert_mongodb_error)?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique = IndexOptions::builder().unique(true).build();
        let models = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(unique)
                .build(),
            IndexModel::builder().keys(doc! { "value": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "properties.is_palindrome": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "properties.word_count": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "properties.length": 1 })
                .build(),
        ];

        self.collection
            .create_indexes(models)
            .await
            .map_err(convert_mongodb_error)?;
        info!("Indexes ensured on strings collection");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StringRecord>, StoreError> {
        self.collection
            .find_one(doc! { "id": id })
            .await
            .map_err(convert_mongodb_error)
    }

    async fn find_by_value(&self, value: &str) -> Result<Option<StringRecord>, StoreError> {
        self.collection
            .find_one(doc! { "value": value })
            .await
            .map_err(convert_mongodb_error)
    }

    async fn find(&self, filter: &StructuredFilter) -> Result<Vec<StringRecord>, StoreError> {
        let query: Document = mongodb::bson::to_document(&filter.to_query())
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        debug!(query = %query, "Finding strings");

        let cursor = self
            .collection
            .find(query)
            .await
            .map_err(convert_mongodb_error)?;
        cursor.try_collect().await.map_err(convert_mongodb_error)
    }

    async fn insert(&self, record: &StringRecord) -> Result<(), StoreError> {
        self.collection
            .insert_one(record)
            .await
            .map_err(convert_mongodb_error)?;
        Ok(())
    }

    async fn delete_by_value(&self, value: &str) -> Result<bool, StoreError> {
        let result = self
            .collection
            .delete_one(doc! { "value": value })
            .await
            .map_err(convert_mongodb_error)?;
        Ok(result.deleted_count > 0)
    }
}
