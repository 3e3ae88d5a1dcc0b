//! CLI that derives wallit HD wallet keys from a master seed.

mod cli;
mod config;
mod handlers;
mod session;

use anyhow::{Error, Result};
use clap::Parser;
use wallit_common::logging::{self, LoggerConfig};

use crate::{
    cli::Commands,
    handlers::{identity, path, use_key, wallet},
    session::Session,
};

fn main() -> Result<(), Error> {
    let mut logger = LoggerConfig::with_base_name("wallit-cli");
    logger.set_default_directive("warn".to_string());
    logging::init(logger);

    let cli = cli::Cli::parse();
    match cli.command {
        Commands::Wallet(args) => wallet::handle_wallet(&Session::load(&cli.key_args)?, args),
        Commands::UseKey(args) => use_key::handle_use_key(&Session::load(&cli.key_args)?, args),
        Commands::Identity => identity::handle_identity(&Session::load(&cli.key_args)?),
        Commands::Path(args) => path::handle_path(args),
    }
}
