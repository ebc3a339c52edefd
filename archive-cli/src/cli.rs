use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use archive_core::{ArchiveClient, Config, Report, transport_from_config};
use clap::{Parser, Subcommand};
use tracing::info;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-archive",
    version,
    about = "Fetch and print historical weather from the Open-Meteo archive"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the configured query and print location, hourly and daily tables.
    Show {
        /// Config file; defaults to the platform config path.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Bypass the response cache for this run.
        #[arg(long)]
        no_cache: bool,
    },

    /// Write the default configuration file.
    Init {
        /// Destination; defaults to the platform config path.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the default config file location.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { config, no_cache } => show(config.as_deref(), no_cache).await,
            Command::Init { config, force } => init(config, force),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn show(path: Option<&Path>, no_cache: bool) -> anyhow::Result<()> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if no_cache {
        config.cache.enabled = false;
    }

    let transport = transport_from_config(&config)?;
    let client = ArchiveClient::new(config.endpoint.as_str(), transport);

    let response = client
        .execute(&config.query)
        .await
        .context("Failed to fetch archive data")?;
    let report = Report::from_response(&response, &config.query)
        .context("Archive response does not match the requested variables")?;

    println!("{report}");
    Ok(())
}

fn init(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::config_file_path()?,
    };

    if path.exists() && !force {
        bail!(
            "Config file already exists: {}\n\
             Hint: pass --force to overwrite it.",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    info!(path = %path.display(), "wrote default configuration");
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
