//! Prints the node identity key.

use anyhow::{anyhow, Result};
use bitcoin::hex::DisplayHex;
use serde::Serialize;
use wallit_key_deriv::KeyChain;

use super::print_json;
use crate::session::Session;

#[derive(Debug, Serialize)]
pub(crate) struct IdentityReport {
    pub(crate) fingerprint: String,
    pub(crate) path: String,
    pub(crate) pubkey: String,
}

/// Handles the identity command.
pub(crate) fn handle_identity(session: &Session) -> Result<()> {
    let chain = KeyChain::new(&session.master);
    let pubkey = chain
        .identity_pubkey()
        .ok_or_else(|| anyhow!("failed to derive identity key"))?;

    print_json(&IdentityReport {
        fingerprint: session.master.fingerprint().to_string(),
        path: chain.identity_path().to_string(),
        pubkey: pubkey.serialize().to_lower_hex_string(),
    })
}
