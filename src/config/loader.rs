use super::types::{AppConfig, StoreBackend};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Prefix for structured environment overrides, e.g. `STRING_ANALYZER_SERVER__PORT`
pub const ENV_PREFIX: &str = "STRING_ANALYZER";

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            config_file: None,
            load_env: false,
        }
    }

    /// Load configuration from an explicit file instead of the standard locations
    pub fn load_from_file(mut self, path: Option<&Path>) -> Self {
        self.config_file = path.map(Path::to_path_buf);
        self
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<AppConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(config_path) = &self.config_file {
            builder = builder.add_source(File::from(config_path.as_path()).required(true));
        } else {
            builder = builder
                .add_source(File::with_name("string-analyzer").required(false))
                .add_source(File::with_name("config/string-analyzer").required(false));
        }

        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.fallback_ports"),
            );
        }

        let mut config: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if self.load_env {
            apply_legacy_env(&mut config, |key| std::env::var(key).ok())?;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Overrides from the legacy environment variables (PORT, MONGODB_URI, MONGODB_USE_MEMORY, MONGODB_TLS_INSECURE)
pub fn apply_legacy_env<F>(config: &mut AppConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let is_true = |key: &str| lookup(key).is_some_and(|v| v.eq_ignore_ascii_case("true"));

    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("PORT must be a port number, got {:?}", port))?;
    }

    if let Some(uri) = lookup("MONGODB_URI") {
        config.database.uri = uri;
    }

    if is_true("MONGODB_TLS_INSECURE") {
        config.database.tls_insecure = true;
    }

    // Never use the in-memory store in production
    let production = lookup("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));
    if is_true("MONGODB_USE_MEMORY") && !production {
        config.database.backend = StoreBackend::Memory;
    }

    Ok(())
}
