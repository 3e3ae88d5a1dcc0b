//! Core derivation functions for wallit keys.
//!
//! Three primitives build on each other: [`derive_private_key`] walks a path
//! against the master key, [`derive_public_key`] takes its public key and
//! [`derive_pubkey_hash160`] hashes the compressed serialization. Absence at
//! any step short-circuits everything above it.
//!
//! A path whose depth is not [`KEY_PATH_DEPTH`](crate::paths::KEY_PATH_DEPTH)
//! is a caller bug and yields `None` without logging. A failure inside BIP32
//! derivation is logged before `None` is returned.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bitcoin::Network;
//! use wallit_key_deriv::{derive_pubkey_hash160, KeyPath, MasterKeyContext};
//!
//! let master = MasterKeyContext::from_seed(&seed, Network::Regtest)?;
//! let path = KeyPath::wallet(7, master.coin_type());
//! let pkh = derive_pubkey_hash160(path, &master);
//! ```

use bitcoin::{bip32, CompressedPublicKey, PubkeyHash};
use secp256k1::{PublicKey, SecretKey, SECP256K1};
use tracing::error;

use crate::{
    keys::MasterKeyContext,
    paths::{RawKeyPath, KEY_PATH_DEPTH},
};

/// Error type for key derivation operations.
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    /// Path does not have the required depth.
    #[error("key path depth must be {depth}, got {0}", depth = KEY_PATH_DEPTH)]
    InvalidDepth(u8),

    /// BIP32 derivation failed.
    #[error("BIP32 derivation error: {0}")]
    Bip32(#[from] bip32::Error),
}

/// Derives the private key at `path`, reporting why it failed.
pub fn try_derive_private_key(
    path: impl Into<RawKeyPath>,
    master: &MasterKeyContext,
) -> Result<SecretKey, DerivationError> {
    let path = path.into();
    if !path.is_derivable() {
        return Err(DerivationError::InvalidDepth(path.depth));
    }

    let child = master
        .root()
        .derive_priv(SECP256K1, &path.child_numbers())?;
    Ok(child.private_key)
}

/// Derives the private key at `path`.
///
/// Returns `None` if the path depth is wrong or BIP32 derivation fails.
pub fn derive_private_key(
    path: impl Into<RawKeyPath>,
    master: &MasterKeyContext,
) -> Option<SecretKey> {
    let path = path.into();
    match try_derive_private_key(path, master) {
        Ok(sk) => Some(sk),
        Err(DerivationError::InvalidDepth(_)) => None,
        Err(e) => {
            error!(%path, %e, "failed to derive private key");
            None
        }
    }
}

/// Derives the public key at `path`.
pub fn derive_public_key(
    path: impl Into<RawKeyPath>,
    master: &MasterKeyContext,
) -> Option<PublicKey> {
    derive_private_key(path, master).map(|sk| sk.public_key(SECP256K1))
}

/// Derives the 20-byte Hash160 of the compressed public key at `path`.
pub fn derive_pubkey_hash160(
    path: impl Into<RawKeyPath>,
    master: &MasterKeyContext,
) -> Option<PubkeyHash> {
    derive_public_key(path, master).map(|pk| CompressedPublicKey(pk).pubkey_hash())
}
