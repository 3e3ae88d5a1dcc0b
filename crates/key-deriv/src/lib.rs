//! Key derivation primitives for the wallit HD wallet.
//!
//! This crate derives every wallet key on demand from a single master key.
//! Nothing derived here is stored; the same path always yields the same key.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bitcoin::Network;
//! use wallit_key_deriv::{KeyChain, KeyPath, MasterKeyContext, UseCase};
//!
//! let master = MasterKeyContext::from_seed(&seed, Network::Regtest)?;
//! let chain = KeyChain::new(&master);
//!
//! // Regular wallet key and its address
//! let sk = chain.wallet_private_key(0);
//! let addr = chain.wallet_p2wpkh_address(0, Network::Regtest);
//!
//! // Channel keys for peer 4, channel 1
//! let base = KeyPath::channel(master.coin_type(), 4, 1);
//! let multisig = chain.use_pubkey_compressed(base, UseCase::ChannelMultisig);
//! ```
//!
//! # Key Hierarchy
//!
//! All keys live at `m/44'/coin_type'/use_case'/peer_index'/key_index'`. See
//! [`paths`] for the use-case table.

pub mod address;
pub mod derive;
mod keys;
pub mod paths;
pub mod wallet;

pub use address::{p2pkh_address, p2wpkh_address};
pub use derive::{
    derive_private_key, derive_pubkey_hash160, derive_public_key, try_derive_private_key,
    DerivationError,
};
pub use keys::{coin_type_for_network, MasterKeyContext, MAINNET_COIN_TYPE, TESTNET_COIN_TYPE};
pub use paths::{KeyPath, PathError, RawKeyPath, UseCase, HARDENED, KEY_PATH_DEPTH};
pub use wallet::{
    zeroed_on_absent_hash, zeroed_on_absent_pubkey,
    // Opaque wrapper types
    ChannelKeys, ChannelMultisigKey, ChannelRefundKey, KeyChain,
};
