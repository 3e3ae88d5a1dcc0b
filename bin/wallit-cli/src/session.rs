//! Loads the master key the commands derive from.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use bitcoin::Network;
use tracing::{debug, info};
use wallit_key_deriv::MasterKeyContext;
use zeroize::Zeroizing;

use crate::{cli::KeyArgs, config::Config};

/// Length of the master seed.
pub(crate) const SEED_LEN: usize = 32;

/// Master key plus the network addresses are rendered for.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) master: MasterKeyContext,
    pub(crate) network: Network,
}

impl Session {
    /// Builds a session from the command line and the optional config file.
    ///
    /// A `--seed` on the command line wins over the config's seed file.
    pub(crate) fn load(args: &KeyArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Config::from_path(path)?,
            None => Config::default(),
        };

        let network = args.network.unwrap_or_else(|| config.network());
        let seed = match (&args.seed, &config.seed) {
            (Some(seed_hex), _) => parse_seed_hex(seed_hex)?,
            (None, Some(path)) => read_seed_file(path)?,
            (None, None) => bail!("no seed given, pass --seed or set `seed` in the config file"),
        };

        Self::from_seed(&seed, network, config.coin_type(network))
    }

    pub(crate) fn from_seed(seed: &[u8; SEED_LEN], network: Network, coin_type: u32) -> Result<Self> {
        let master = MasterKeyContext::from_seed(seed, network)?.with_coin_type(coin_type);
        info!(
            fingerprint = %master.fingerprint(),
            %network,
            coin_type,
            "loaded master key"
        );
        Ok(Self { master, network })
    }
}

/// Parses a hex-encoded 32-byte seed.
pub(crate) fn parse_seed_hex(seed_hex: &str) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    let bytes = Zeroizing::new(hex::decode(seed_hex.trim()).context("seed is not valid hex")?);
    to_seed(&bytes)
}

/// Reads a raw 32-byte seed file.
pub(crate) fn read_seed_file(path: &Path) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    let bytes = Zeroizing::new(
        fs::read(path).with_context(|| format!("failed to read seed from {}", path.display()))?,
    );
    debug!(path = %path.display(), "read seed file");
    to_seed(&bytes)
}

fn to_seed(bytes: &[u8]) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    if bytes.len() != SEED_LEN {
        bail!(
            "Seed must be exactly {SEED_LEN} bytes ({} hex chars), got {} bytes",
            SEED_LEN * 2,
            bytes.len()
        );
    }

    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    seed.copy_from_slice(bytes);
    Ok(seed)
}
