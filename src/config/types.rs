use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Document store configuration
    pub database: DatabaseConfig,

    /// Logging configuration
    pub logging: LogConfig,
}

impl AppConfig {
    /// Checks values the server cannot start without
    pub fn validate(&self) -> Result<()> {
        if self.database.backend == StoreBackend::MongoDb {
            if self.database.uri.trim().is_empty() {
                return Err(Error::Config("MongoDB URI cannot be empty".to_string()));
            }
            if self.database.database.trim().is_empty() {
                return Err(Error::Config("Database name cannot be empty".to_string()));
            }
            if self.database.collection.trim().is_empty() {
                return Err(Error::Config("Collection name cannot be empty".to_string()));
            }
        }
        if self.server.host.trim().is_empty() {
            return Err(Error::Config("Server host cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Preferred port
    pub port: u16,

    /// Ports tried in order when the preferred one cannot be bound (0 = any)
    pub fallback_ports: Vec<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5051,
            fallback_ports: vec![5000, 3000, 0],
        }
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[serde(rename = "mongodb")]
    MongoDb,
    Memory,
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Storage backend
    pub backend: StoreBackend,

    /// Connection URI
    pub uri: String,

    /// Database name
    pub database: String,

    /// Collection holding one document per string
    pub collection: String,

    /// Accept invalid TLS certificates (development only)
    pub tls_insecure: bool,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,

    /// Maximum number of pooled connections
    pub max_pool_size: u32,

    /// Application name reported to the server
    pub app_name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::MongoDb,
            uri: "mongodb://127.0.0.1:27017".to_string(),
            database: "string_analyzer".to_string(),
            collection: "strings".to_string(),
            tls_insecure: false,
            connect_timeout_secs: 20,
            server_selection_timeout_secs: 20,
            max_pool_size: 100,
            app_name: "string-analyzer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 5051);
        assert_eq!(config.server.fallback_ports, vec![5000, 3000, 0]);
        assert_eq!(config.database.backend, StoreBackend::MongoDb);
    }

    #[test]
    fn test_empty_uri_rejected_for_mongodb_only() {
        let mut config = AppConfig::default();
        config.database.uri = String::new();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.database.backend = StoreBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(
            serde_json::to_value(StoreBackend::MongoDb).unwrap(),
            serde_json::json!("mongodb")
        );
        assert_eq!(
            serde_json::from_value::<StoreBackend>(serde_json::json!("memory")).unwrap(),
            StoreBackend::Memory
        );
    }
}
