//! Decodes a serialized key path.

use anyhow::{Context, Result};
use serde::Serialize;
use wallit_key_deriv::{KeyPath, RawKeyPath};

use super::print_json;
use crate::cli::PathArgs;

#[derive(Debug, Serialize)]
pub(crate) struct PathReport {
    pub(crate) path: String,
    pub(crate) depth: u8,
    pub(crate) derivable: bool,
    pub(crate) typed: Option<TypedPath>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct TypedPath {
    pub(crate) coin_type: u32,
    pub(crate) use_case: String,
    pub(crate) peer_index: u32,
    pub(crate) key_index: u32,
}

/// Handles the path command.
pub(crate) fn handle_path(args: PathArgs) -> Result<()> {
    print_json(&path_report(&args.hex)?)
}

pub(crate) fn path_report(path_hex: &str) -> Result<PathReport> {
    let bytes = hex::decode(path_hex.trim()).context("key path is not valid hex")?;
    let raw = RawKeyPath::from_bytes(&bytes)?;

    // Paths outside the wallet scheme still decode, just without typed fields.
    let typed = KeyPath::try_from(raw).ok().map(|path| TypedPath {
        coin_type: path.coin_type(),
        use_case: path.use_case().to_string(),
        peer_index: path.peer_index(),
        key_index: path.key_index(),
    });

    Ok(PathReport {
        path: raw.to_string(),
        depth: raw.depth,
        derivable: raw.is_derivable(),
        typed,
    })
}
