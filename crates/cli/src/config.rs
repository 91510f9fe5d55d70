//! Startup configuration.
//!
//! Values come from an optional JSON file and are overridden by command line flags,
//! which in turn fall back to environment variables (`.env` is loaded first).

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use swap_monitor_domain::policy::PrimaryAsset;
use swap_monitor_execution::sync::{Backoff, ReconnectPolicy};
use swap_monitor_protocols::connection::Endpoint;
use swap_monitor_protocols::snapshot::default_burn_addresses;

/// Read from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Contents of the JSON config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub pool_address: Option<String>,
    pub primary_symbol: Option<String>,
    pub rpc_url: Option<String>,
    pub burn_addresses: Option<Vec<String>>,
    pub reconnect: Option<ReconnectSettings>,
}

/// Reconnect section of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ReconnectSettings {
    Fixed {
        delay_secs: u64,
        max_attempts: Option<u32>,
    },
    Exponential {
        initial_secs: u64,
        max_secs: u64,
        #[serde(default = "default_factor")]
        factor: u32,
        max_attempts: Option<u32>,
    },
}

fn default_factor() -> u32 {
    2
}

impl ReconnectSettings {
    pub fn to_policy(self) -> ReconnectPolicy {
        match self {
            Self::Fixed {
                delay_secs,
                max_attempts,
            } => ReconnectPolicy::fixed(Duration::from_secs(delay_secs))
                .with_max_attempts(max_attempts),
            Self::Exponential {
                initial_secs,
                max_secs,
                factor,
                max_attempts,
            } => ReconnectPolicy {
                backoff: Backoff::Exponential {
                    initial: Duration::from_secs(initial_secs),
                    max: Duration::from_secs(max_secs),
                    factor,
                },
                max_attempts,
            },
        }
    }
}

impl FileConfig {
    /// Loads `path`, or `config.json` when it exists and no path was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::read(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Invalid config file")
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rpc_url: Option<String>,
    pub pool_address: Option<String>,
    pub primary_symbol: Option<String>,
    pub max_attempts: Option<u32>,
}

/// Fully merged settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: Endpoint,
    pub pool_address: String,
    pub primary: Option<PrimaryAsset>,
    pub burn_addresses: Vec<String>,
    pub reconnect: ReconnectPolicy,
}

impl Settings {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let Some(rpc_url) = overrides.rpc_url.or(file.rpc_url) else {
            bail!(
                "No node endpoint configured: set NODE_PROVIDER_URL, pass --rpc-url or add `rpc_url` to the config file"
            );
        };
        let Some(pool_address) = overrides.pool_address.or(file.pool_address) else {
            bail!(
                "No pool configured: set POOL_ADDRESS, pass --pool or add `pool_address` to the config file"
            );
        };
        let endpoint: Endpoint = rpc_url.parse().context("Invalid node endpoint")?;

        let mut reconnect = file
            .reconnect
            .map(ReconnectSettings::to_policy)
            .unwrap_or_default();
        if let Some(max_attempts) = overrides.max_attempts {
            // 0 means retry forever
            reconnect.max_attempts = (max_attempts > 0).then_some(max_attempts);
        }

        Ok(Self {
            endpoint,
            pool_address,
            primary: overrides
                .primary_symbol
                .or(file.primary_symbol)
                .map(PrimaryAsset::new),
            burn_addresses: file.burn_addresses.unwrap_or_else(default_burn_addresses),
            reconnect,
        })
    }
}
