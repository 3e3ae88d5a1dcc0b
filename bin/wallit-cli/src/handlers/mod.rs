//! Subcommand handlers.

pub(crate) mod identity;
pub(crate) mod path;
pub(crate) mod use_key;
pub(crate) mod wallet;

use anyhow::Result;
use serde::Serialize;

/// Prints `report` as pretty JSON on stdout.
pub(crate) fn print_json(report: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
