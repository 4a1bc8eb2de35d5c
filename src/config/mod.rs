//! Layered configuration
//!
//! Defaults, then an optional TOML/YAML/JSON file, then environment variables.

pub mod loader;
pub mod types;

pub use loader::{apply_legacy_env, ConfigLoader, ENV_PREFIX};
pub use types::{AppConfig, DatabaseConfig, ServerConfig, StoreBackend};

use anyhow::Result;
use std::path::Path;

/// Generate a sample configuration file
pub fn generate_sample_config(path: &Path) -> Result<()> {
    let toml_content = toml::to_string_pretty(&AppConfig::default())?;

    let sample_content = format!(
        r#"# string-analyzer configuration
#
# Save as string-analyzer.toml (or config/string-analyzer.toml).
# Every value can be overridden from the environment, e.g.
#   STRING_ANALYZER_SERVER__PORT=8080
#   STRING_ANALYZER_DATABASE__URI=mongodb://db:27017
# PORT, MONGODB_URI, MONGODB_USE_MEMORY and MONGODB_TLS_INSECURE are honoured too.

{}
# [server]
# host / port = preferred listen address
# fallback_ports = tried in order if the port is taken (0 = any free port)
#
# [database]
# backend = "mongodb" or "memory"
# tls_insecure = accept invalid certificates (development only)
#
# [logging]
# level = trace, debug, info, warn, error (RUST_LOG takes precedence)
# format = "human" or "json"
# file = optional path; rotated daily
"#,
        toml_content
    );

    std::fs::write(path, sample_content)?;
    Ok(())
}
