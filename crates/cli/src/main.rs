//! Lifecycle agent settings CLI
//!
//! Loads the settings document the agent received from the infrastructure
//! back-end and shows the decision data the platform layer will act on:
//! normalized disks, network classification, and effective overrides.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{associations, disks, networks, resolve};
use settings_core::{FileSettingsSource, Settings, SettingsHolder, SettingsSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Lifecycle agent settings inspector
#[derive(Parser)]
#[command(name = "agent-settings")]
#[command(author, version, about = "Inspect lifecycle agent settings resolution", long_about = None)]
pub struct Cli {
    /// CLI configuration file (TOML, JSON or YAML)
    #[arg(long, env = "AGENT_SETTINGS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Settings document to inspect (overrides the configured path)
    #[arg(long, short)]
    pub settings: Option<PathBuf>,

    /// Output format (overrides the configured format)
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show normalized disk settings
    Disks {
        /// Show only the persistent disk with this identifier
        #[arg(long)]
        id: Option<String>,
    },

    /// Show network classification and default selections
    Networks {
        /// Report the default network for this category (e.g. dns, gateway)
        #[arg(long, short)]
        category: Option<String>,

        /// Show only the network bound to this hardware address
        #[arg(long)]
        mac: Option<String>,
    },

    /// Show effective mbus, blobstore, NTP and environment values
    Resolve,

    /// Show the public SSH key registered for a user
    PublicKey {
        /// Username to look up
        #[arg(long, default_value = settings_core::VCAP_USERNAME)]
        user: String,
    },

    /// List disk associations from an update-settings payload
    Associations {
        /// Update-settings payload
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output on stdout stays machine-readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::CliConfig::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.output);

    let source = settings_source(cli.settings.as_deref(), &config);

    match cli.command {
        Commands::Disks { id } => {
            let settings = load_settings(&source).await?;
            disks::show_disks(&settings, id.as_deref(), format)?;
        }
        Commands::Networks { category, mac } => {
            let settings = load_settings(&source).await?;
            networks::show_networks(&settings, category.as_deref(), mac.as_deref(), format)?;
        }
        Commands::Resolve => {
            let settings = load_settings(&source).await?;
            resolve::show_resolved(&settings, format)?;
        }
        Commands::PublicKey { user } => {
            let key = source
                .public_ssh_key_for_username(&user)
                .await
                .context("Failed to read public key")?;
            match key {
                Some(key) => println!("{}", key),
                None => output::print_warning(&format!("No public key registered for '{}'", user)),
            }
        }
        Commands::Associations { file } => {
            associations::show_associations(&file, format).await?;
        }
    }

    Ok(())
}

fn settings_source(override_path: Option<&Path>, config: &config::CliConfig) -> FileSettingsSource {
    let path = override_path.unwrap_or(&config.settings_path);
    let source = FileSettingsSource::new(path);

    match &config.public_key_path {
        Some(key_path) => source.with_public_key(key_path),
        None => source,
    }
}

async fn load_settings(source: &FileSettingsSource) -> Result<Arc<Settings>> {
    let path = source.settings_path();
    debug!(path = %path.display(), "Loading settings");

    let holder = SettingsHolder::new();
    holder
        .refresh(source)
        .await
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}
