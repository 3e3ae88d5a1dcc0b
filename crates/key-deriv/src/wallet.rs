//! Named entry points for each key family.
//!
//! [`KeyChain`] borrows a [`MasterKeyContext`] and composes the path builders
//! with the derivation primitives. Grouped channel keys are exposed as opaque
//! wrapper types that can only be constructed through derivation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wallit_key_deriv::{ChannelKeys, KeyChain, KeyPath, UseCase};
//!
//! let chain = KeyChain::new(&master);
//! let receive = chain.wallet_private_key(0);
//!
//! let base = KeyPath::channel(master.coin_type(), peer, channel);
//! let funding = chain.use_pubkey_compressed(base, UseCase::ChannelMultisig);
//! let keys = ChannelKeys::derive(&chain, peer, channel);
//! ```

use std::ops::Deref;

use bitcoin::{hashes::Hash, PubkeyHash};
use secp256k1::{PublicKey, SecretKey, SECP256K1};

use crate::{
    derive::{derive_private_key, derive_pubkey_hash160, derive_public_key},
    keys::MasterKeyContext,
    paths::{KeyPath, RawKeyPath, UseCase},
};

/// Size of a compressed secp256k1 public key.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// Size of a public key hash.
pub const PUBKEY_HASH_LEN: usize = 20;

/// Use-case key derivation over a borrowed master key.
#[derive(Debug, Clone, Copy)]
pub struct KeyChain<'a> {
    master: &'a MasterKeyContext,
}

impl<'a> KeyChain<'a> {
    /// Creates a key chain over `master`.
    pub const fn new(master: &'a MasterKeyContext) -> Self {
        Self { master }
    }

    /// Master key this chain derives from.
    pub const fn master(&self) -> &'a MasterKeyContext {
        self.master
    }

    /// Path of the regular wallet key at `index`.
    pub const fn wallet_path(&self, index: u32) -> KeyPath {
        KeyPath::wallet(index, self.master.coin_type())
    }

    /// Private key of the regular wallet at `index`.
    pub fn wallet_private_key(&self, index: u32) -> Option<SecretKey> {
        derive_private_key(self.wallet_path(index), self.master)
    }

    /// Public key of the regular wallet at `index`.
    pub fn wallet_public_key(&self, index: u32) -> Option<PublicKey> {
        derive_public_key(self.wallet_path(index), self.master)
    }

    /// Public key hash of the regular wallet at `index`.
    pub fn wallet_pubkey_hash(&self, index: u32) -> Option<PubkeyHash> {
        derive_pubkey_hash160(self.wallet_path(index), self.master)
    }

    /// Private key at `base` retargeted to `use_case`.
    ///
    /// `base` keeps its peer and key index; a raw path with the wrong depth
    /// still yields `None`.
    pub fn use_private_key(
        &self,
        base: impl Into<RawKeyPath>,
        use_case: UseCase,
    ) -> Option<SecretKey> {
        derive_private_key(base.into().with_use_case(use_case), self.master)
    }

    /// Public key at `base` retargeted to `use_case`.
    pub fn use_public_key(
        &self,
        base: impl Into<RawKeyPath>,
        use_case: UseCase,
    ) -> Option<PublicKey> {
        self.use_private_key(base, use_case)
            .map(|sk| sk.public_key(SECP256K1))
    }

    /// Compressed public key at `base` retargeted to `use_case`.
    pub fn use_pubkey_compressed(
        &self,
        base: impl Into<RawKeyPath>,
        use_case: UseCase,
    ) -> Option<[u8; COMPRESSED_PUBKEY_LEN]> {
        self.use_public_key(base, use_case).map(|pk| pk.serialize())
    }

    /// Path of the node identity key.
    pub const fn identity_path(&self) -> KeyPath {
        KeyPath::identity(self.master.coin_type())
    }

    /// Node identity private key.
    pub fn identity_private_key(&self) -> Option<SecretKey> {
        derive_private_key(self.identity_path(), self.master)
    }

    /// Node identity public key.
    pub fn identity_pubkey(&self) -> Option<PublicKey> {
        derive_public_key(self.identity_path(), self.master)
    }
}

/// Legacy 20-byte encoding: the hash, or all zeros when derivation failed.
pub fn zeroed_on_absent_hash(hash: Option<PubkeyHash>) -> [u8; PUBKEY_HASH_LEN] {
    hash.map_or([0u8; PUBKEY_HASH_LEN], |h| h.to_byte_array())
}

/// Legacy 33-byte encoding: the compressed key, or all zeros when derivation
/// failed.
pub fn zeroed_on_absent_pubkey(
    pubkey: Option<[u8; COMPRESSED_PUBKEY_LEN]>,
) -> [u8; COMPRESSED_PUBKEY_LEN] {
    pubkey.unwrap_or([0u8; COMPRESSED_PUBKEY_LEN])
}

// =============================================================================
// Channel Key Types
// =============================================================================

/// Channel funding multisig key.
///
/// This type can only be constructed via [`ChannelKeys::derive`].
/// Implements [`Deref<Target = SecretKey>`] for access to the key.
#[derive(Debug)]
pub struct ChannelMultisigKey(SecretKey);

impl Deref for ChannelMultisigKey {
    type Target = SecretKey;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Channel refund key.
///
/// This type can only be constructed via [`ChannelKeys::derive`].
/// Implements [`Deref<Target = SecretKey>`] for access to the key.
#[derive(Debug)]
pub struct ChannelRefundKey(SecretKey);

impl Deref for ChannelRefundKey {
    type Target = SecretKey;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Keys of one channel with one peer.
#[derive(Debug)]
pub struct ChannelKeys {
    /// Key for the funding multisig output.
    pub multisig: ChannelMultisigKey,
    /// Key receiving the refund.
    pub refund: ChannelRefundKey,
}

impl ChannelKeys {
    /// Derives both channel keys for `peer_index` and `channel_index`.
    pub fn derive(chain: &KeyChain<'_>, peer_index: u32, channel_index: u32) -> Option<Self> {
        let base = KeyPath::channel(chain.master().coin_type(), peer_index, channel_index);
        let multisig = ChannelMultisigKey(chain.use_private_key(base, UseCase::ChannelMultisig)?);
        let refund = ChannelRefundKey(chain.use_private_key(base, UseCase::ChannelRefund)?);
        Some(Self { multisig, refund })
    }

    /// Public key of the funding multisig key.
    pub fn multisig_pubkey(&self) -> PublicKey {
        self.multisig.public_key(SECP256K1)
    }

    /// Public key of the refund key.
    pub fn refund_pubkey(&self) -> PublicKey {
        self.refund.public_key(SECP256K1)
    }
}
