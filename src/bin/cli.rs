//! FloDrama Catalog CLI
//!
//! Local execution entry point for the scrape/aggregate pipeline and the
//! content API.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flodrama::{
    error::Result,
    models::Config,
    pipeline,
    storage::{CatalogStore, LocalStore, TRENDING_FILE},
};

#[cfg(feature = "serve")]
use flodrama::server::ApiServer;
#[cfg(feature = "serve")]
use std::sync::Arc;

/// FloDrama - Streaming Catalog Pipeline
#[derive(Parser, Debug)]
#[command(
    name = "flodrama",
    version,
    about = "Streaming catalog scraper and content API"
)]
struct Cli {
    /// Path to the data directory containing config.toml
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape listing sites into per-source dumps
    Scrape {
        /// Restrict the run to a single source id
        #[arg(long)]
        source: Option<String>,
    },

    /// Rebuild the catalog from stored dumps
    Aggregate,

    /// Run full pipeline: Scrape → Aggregate
    Pipeline {
        /// Skip scraping, aggregate existing dumps
        #[arg(long)]
        skip_scrape: bool,
    },

    /// Serve the aggregated catalog over HTTP
    #[cfg(feature = "serve")]
    Serve {
        /// Override the configured listen address
        #[arg(long)]
        addr: Option<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Show dump and catalog state
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("FloDrama catalog starting...");

    // Load configuration
    let config_path = cli.data_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);

    log::info!("Loaded configuration from {}", cli.data_dir.display());

    let store = LocalStore::new(&cli.data_dir, config.paths.clone());

    match cli.command {
        Command::Scrape { source } => {
            config.validate()?;
            pipeline::run_scrape(&config, &store, source.as_deref()).await?;
            log::info!("Scrape complete!");
        }

        Command::Aggregate => {
            config.validate()?;
            pipeline::run_aggregate(&config, &store).await?;
            log::info!("Aggregation complete!");
        }

        Command::Pipeline { skip_scrape } => {
            config.validate()?;

            if skip_scrape {
                log::info!("Skipping scrape, using existing dumps...");
            } else {
                log::info!("Step 1/2: Scraping sources...");
                pipeline::run_scrape(&config, &store, None).await?;
            }

            log::info!("Step 2/2: Aggregating catalog...");
            pipeline::run_aggregate(&config, &store).await?;

            log::info!("Pipeline complete!");
        }

        #[cfg(feature = "serve")]
        Command::Serve { addr } => {
            let mut server_config = config.server.clone();
            if let Some(addr) = addr {
                server_config.listen_addr = addr;
            }

            let server = ApiServer::new(server_config, Arc::new(store));
            server.run().await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            log::info!(
                "Config OK: {} sources, {} relay endpoints",
                config.sources.len(),
                config.relay.endpoints.len()
            );
        }

        Command::Info => {
            log::info!("Data directory: {}", cli.data_dir.display());

            let dumps = store.read_dumps().await?;
            if dumps.is_empty() {
                log::info!("No dumps found yet.");
            } else {
                for dump in &dumps {
                    log::info!(
                        "Dump {}: {} items, scraped at {}",
                        dump.source,
                        dump.count,
                        dump.scraped_at
                    );
                }
            }

            match store.read_catalog(TRENDING_FILE).await? {
                Some(file) => log::info!(
                    "Catalog last updated: {} ({} trending items)",
                    file.updated_at,
                    file.count
                ),
                None => log::info!("No catalog built yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
