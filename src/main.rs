use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use string_analyzer::{
    config::{self, ConfigLoader},
    handlers::AppState,
    http_server, logging,
    service::{StringService, SAMPLE_STRINGS},
    store,
};

/// String analyzer REST service
#[derive(Parser, Debug)]
#[command(name = "string-analyzer", version, about)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "STRING_ANALYZER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create the collection indexes and exit
    Migrate,

    /// Insert the sample strings that are not stored yet
    Seed,

    /// Write an example configuration file
    SampleConfig {
        #[arg(default_value = "string-analyzer.toml.example")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new()
        .load_from_file(cli.config.as_deref())
        .load_from_env()
        .build()?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let _log_guard = logging::init(&config.logging)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::SampleConfig { output } => {
            config::generate_sample_config(&output)?;
            info!(path = %output.display(), "Sample configuration written");
        }
        Commands::Migrate => {
            let store = store::connect(&config.database)
                .await
                .context("Failed to connect to the document store")?;
            store.ensure_indexes().await?;
            info!("Migration complete: indexes created on strings collection");
        }
        Commands::Seed => {
            let store = store::connect(&config.database)
                .await
                .context("Failed to connect to the document store")?;
            let inserted = StringService::new(store).seed(SAMPLE_STRINGS).await?;
            info!(inserted, "Seeding complete");
        }
        Commands::Serve => {
            // Established once; a failure here is fatal to startup
            let store = store::connect(&config.database)
                .await
                .context("Failed to connect to the document store")?;
            store.ensure_indexes().await?;

            http_server::serve(&config.server, AppState::new(store)).await?;
        }
    }

    Ok(())
}
