//! ECO Codes CLI
//!
//! Serves the opening API, or runs a single crawl for inspection.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use eco_codes::{error::Result, models::Config, repository::OpeningRepository, server};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// eco-codes - Chess ECO code lookup service
#[derive(Parser, Debug)]
#[command(name = "eco-codes", version, about = "Chess ECO code lookup service")]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on (overrides config and $PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Source page URL (overrides config and $ECO_CODE_DATA_URL)
        #[arg(long)]
        url: Option<String>,

        /// Seconds to wait for in-flight requests on shutdown
        #[arg(long)]
        graceful_timeout: Option<u64>,
    },

    /// Crawl the source page once and report what was found
    Crawl {
        /// Write the openings as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration
    Validate,
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

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    match cli.command {
        Command::Serve {
            port,
            url,
            graceful_timeout,
        } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(url) = url {
                config.source.url = url;
            }
            if let Some(secs) = graceful_timeout {
                config.server.graceful_timeout_secs = secs;
            }
            config.validate()?;
            run_server(&config).await?;
        }

        Command::Crawl { output } => {
            config.validate()?;
            let repo = OpeningRepository::from_config(&config)?;
            let openings = repo.list_all().await?;
            let status = repo.status().await;

            log::info!("Crawled {} openings from {}", status.record_count, config.source.url);
            log::info!("Repository status: {}", serde_json::to_string(&status)?);

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&openings)?;
                std::fs::write(&path, json)?;
                log::info!("Openings saved to {}", path.display());
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (source: {})", config.source.url);
        }
    }

    Ok(())
}

/// Serve until Ctrl-C, then drain for at most the graceful timeout.
async fn run_server(config: &Config) -> Result<()> {
    let repo = OpeningRepository::from_config(config)?;
    let listener = TcpListener::bind(config.server.addr()).await?;

    let shutdown = Arc::new(Notify::new());
    let signal = Arc::clone(&shutdown);
    let mut handle = tokio::spawn(server::serve(listener, repo.clone(), async move {
        signal.notified().await;
    }));

    tokio::select! {
        joined = &mut handle => {
            match joined {
                Ok(result) => return result,
                Err(e) => {
                    log::error!("Server task failed: {e}");
                    return Ok(());
                }
            }
        }
        received = tokio::signal::ctrl_c() => received?,
    }
    log::info!("shutting down");
    shutdown.notify_one();

    match tokio::time::timeout(config.server.graceful_timeout(), handle).await {
        Ok(Ok(result)) => result?,
        Ok(Err(e)) => log::error!("Server task failed: {e}"),
        Err(_) => log::warn!(
            "Connections still open after {}s; exiting",
            config.server.graceful_timeout_secs
        ),
    }
    repo.invalidate().await;

    Ok(())
}
