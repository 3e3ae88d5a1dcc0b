use std::path::PathBuf;

use bitcoin::Network;
use clap::{Parser, Subcommand};
use wallit_key_deriv::UseCase;

#[derive(Parser)]
#[command(
    name = "wallit-cli",
    about = "Derives wallit HD wallet keys from a master seed",
    version
)]
pub(crate) struct Cli {
    #[clap(flatten)]
    pub(crate) key_args: KeyArgs,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Commands {
    Wallet(WalletArgs),

    UseKey(UseKeyArgs),

    #[command(about = "Print the node identity key")]
    Identity,

    Path(PathArgs),
}

#[derive(Parser, Debug, Clone)]
pub(crate) struct KeyArgs {
    #[arg(
        long,
        global = true,
        env = "WALLIT_CONFIG",
        help = "the path to the TOML config file"
    )]
    pub(crate) config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "WALLIT_SEED",
        hide_env_values = true,
        help = "hex-encoded 32-byte seed, overrides the seed file from the config"
    )]
    pub(crate) seed: Option<String>,

    #[arg(
        long,
        global = true,
        value_parser = clap::value_parser!(Network),
        help = "network to derive for, overrides the config"
    )]
    pub(crate) network: Option<Network>,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Print regular wallet keys and addresses", version)]
pub(crate) struct WalletArgs {
    #[arg(long, default_value_t = 0, help = "first wallet key index")]
    pub(crate) index: u32,

    #[arg(long, default_value_t = 1, help = "number of consecutive keys to print")]
    pub(crate) count: u32,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Print the key of a use case for a peer and index", version)]
pub(crate) struct UseKeyArgs {
    #[arg(
        long,
        value_parser = clap::value_parser!(UseCase),
        help = "use case: wallet, multisig, refund, identity or a number"
    )]
    pub(crate) use_case: UseCase,

    #[arg(long, default_value_t = 0, help = "peer index")]
    pub(crate) peer: u32,

    #[arg(long, default_value_t = 0, help = "key index")]
    pub(crate) index: u32,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Decode a hex-encoded serialized key path", version)]
pub(crate) struct PathArgs {
    #[arg(help = "the 21-byte serialized key path as hex")]
    pub(crate) hex: String,
}
