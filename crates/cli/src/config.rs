//! Configuration management for the CLI

use crate::output::OutputFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Settings document written by the agent's bootstrap
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    /// Public key served for SSH user setup
    #[serde(default)]
    pub public_key_path: Option<PathBuf>,

    /// Default output format
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("/var/vcap/bosh/settings.json")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            public_key_path: None,
            output: OutputFormat::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from an optional file, then `AGENT_SETTINGS_*`
    /// environment variables
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("AGENT_SETTINGS"))
            .build()
            .context("Failed to load CLI configuration")?;

        config
            .try_deserialize()
            .context("Failed to parse CLI configuration")
    }
}
