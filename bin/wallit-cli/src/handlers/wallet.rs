//! Prints regular wallet keys with their addresses.

use anyhow::{anyhow, Result};
use bitcoin::{hex::DisplayHex, Network};
use serde::Serialize;
use wallit_key_deriv::{p2pkh_address, p2wpkh_address, KeyChain};

use super::print_json;
use crate::{cli::WalletArgs, session::Session};

#[derive(Debug, Serialize)]
pub(crate) struct WalletKeyReport {
    pub(crate) path: String,
    pub(crate) pubkey: String,
    pub(crate) hash160: String,
    pub(crate) p2pkh: String,
    pub(crate) p2wpkh: String,
}

/// Handles the wallet command.
pub(crate) fn handle_wallet(session: &Session, args: WalletArgs) -> Result<()> {
    let chain = KeyChain::new(&session.master);
    let end = args.index.saturating_add(args.count);

    let reports = (args.index..end)
        .map(|index| wallet_report(&chain, index, session.network))
        .collect::<Result<Vec<_>>>()?;

    print_json(&reports)
}

pub(crate) fn wallet_report(
    chain: &KeyChain<'_>,
    index: u32,
    network: Network,
) -> Result<WalletKeyReport> {
    let pubkey = chain
        .wallet_public_key(index)
        .ok_or_else(|| anyhow!("failed to derive wallet key {index}"))?;
    let hash = chain
        .wallet_pubkey_hash(index)
        .ok_or_else(|| anyhow!("failed to derive wallet key hash {index}"))?;

    Ok(WalletKeyReport {
        path: chain.wallet_path(index).to_string(),
        pubkey: pubkey.serialize().to_lower_hex_string(),
        hash160: hash.to_string(),
        p2pkh: p2pkh_address(hash, network).to_string(),
        p2wpkh: p2wpkh_address(pubkey, network).to_string(),
    })
}
