//! Prints the key of one use case for a peer and index.

use anyhow::{anyhow, Result};
use bitcoin::hex::DisplayHex;
use serde::Serialize;
use wallit_key_deriv::{KeyChain, KeyPath, UseCase};

use super::print_json;
use crate::{cli::UseKeyArgs, session::Session};

#[derive(Debug, Serialize)]
pub(crate) struct UseKeyReport {
    pub(crate) use_case: String,
    pub(crate) path: String,
    pub(crate) pubkey: String,
}

/// Handles the use-key command.
pub(crate) fn handle_use_key(session: &Session, args: UseKeyArgs) -> Result<()> {
    let chain = KeyChain::new(&session.master);
    print_json(&use_key_report(&chain, args.use_case, args.peer, args.index)?)
}

pub(crate) fn use_key_report(
    chain: &KeyChain<'_>,
    use_case: UseCase,
    peer: u32,
    index: u32,
) -> Result<UseKeyReport> {
    let base = KeyPath::channel(chain.master().coin_type(), peer, index);
    let pubkey = chain
        .use_pubkey_compressed(base, use_case)
        .ok_or_else(|| anyhow!("failed to derive {use_case} key for peer {peer} index {index}"))?;

    Ok(UseKeyReport {
        use_case: use_case.to_string(),
        path: base.with_use_case(use_case).to_string(),
        pubkey: pubkey.to_lower_hex_string(),
    })
}
