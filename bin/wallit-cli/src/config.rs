use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use bitcoin::Network;
use serde::Deserialize;
use wallit_key_deriv::coin_type_for_network;

/// Network used when neither the config nor the command line sets one.
pub(crate) const DEFAULT_NETWORK: Network = Network::Signet;

/// TOML configuration of the CLI.
///
/// ```toml
/// network = "regtest"
/// coin_type = 1
/// seed = "seed"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) network: Option<Network>,

    /// Coin type override. Defaults to the SLIP-44 value of the network.
    pub(crate) coin_type: Option<u32>,

    /// Path to a file holding the raw 32-byte seed.
    pub(crate) seed: Option<PathBuf>,
}

impl Config {
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config file {}: {e}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .map_err(|e| anyhow!(format!("Failed to parse config file: {}", e)))?;

        // A relative seed path is relative to the config file.
        if let (Some(seed), Some(dir)) = (&config.seed, path.parent()) {
            if seed.is_relative() {
                config.seed = Some(dir.join(seed));
            }
        }

        Ok(config)
    }

    pub(crate) fn network(&self) -> Network {
        self.network.unwrap_or(DEFAULT_NETWORK)
    }

    pub(crate) fn coin_type(&self, network: Network) -> u32 {
        self.coin_type
            .unwrap_or_else(|| coin_type_for_network(network))
    }
}
