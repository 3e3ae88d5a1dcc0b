//! Address generation utilities.
//!
//! Provides functions to turn derived wallet keys into P2PKH and P2WPKH
//! addresses.

use bitcoin::{Address, CompressedPublicKey, Network, PubkeyHash};
use secp256k1::PublicKey;

use crate::wallet::KeyChain;

/// Generate a P2PKH address from a public key hash.
#[must_use]
pub fn p2pkh_address(hash: PubkeyHash, network: Network) -> Address {
    Address::p2pkh(hash, network)
}

/// Generate a native segwit v0 P2WPKH address from a public key.
#[must_use]
pub fn p2wpkh_address(pubkey: PublicKey, network: Network) -> Address {
    Address::p2wpkh(&CompressedPublicKey(pubkey), network)
}

impl KeyChain<'_> {
    /// P2PKH address of the regular wallet key at `index`.
    pub fn wallet_p2pkh_address(&self, index: u32, network: Network) -> Option<Address> {
        self.wallet_pubkey_hash(index)
            .map(|hash| p2pkh_address(hash, network))
    }

    /// P2WPKH address of the regular wallet key at `index`.
    pub fn wallet_p2wpkh_address(&self, index: u32, network: Network) -> Option<Address> {
        self.wallet_public_key(index)
            .map(|pk| p2wpkh_address(pk, network))
    }
}
