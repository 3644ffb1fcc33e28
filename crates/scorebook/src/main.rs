//! scorebook - team and match statistics server
//!
//! Subcommands:
//! - `scorebook serve` - Run the HTTP API
//! - `scorebook config` - Print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scoreconf::{ScoreConfig, StorageBackend};

#[derive(Parser)]
#[command(name = "scorebook")]
#[command(about = "Team, player, and match statistics REST backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Config file (replaces ./scorebook.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// HTTP port to bind
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep everything in memory; nothing is written to disk
        #[arg(long)]
        memory: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Config file (replaces ./scorebook.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            memory,
        } => {
            let mut config =
                ScoreConfig::load_from(config.as_deref()).context("Failed to load configuration")?;
            if let Some(port) = port {
                config.bind.http_port = port;
            }
            if memory {
                config.storage.backend = StorageBackend::Memory;
            }

            let telemetry = scorebook::telemetry::init(&config.telemetry)?;
            let result = scorebook::serve::run(config).await;
            telemetry.shutdown();
            result
        }
        Commands::Config { config } => {
            let (config, sources) = ScoreConfig::load_with_sources_from(config.as_deref())
                .context("Failed to load configuration")?;
            for file in &sources.files {
                println!("# loaded: {}", file.display());
            }
            for var in &sources.env_overrides {
                println!("# env: {}", var);
            }
            print!("{}", config.to_toml());
            Ok(())
        }
    }
}
