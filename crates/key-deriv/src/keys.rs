use bitcoin::{
    bip32::{ChildNumber, Fingerprint, Xpriv},
    Network, NetworkKind,
};
use secp256k1::SECP256K1;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::DerivationError;

/// SLIP-44 coin type of bitcoin mainnet.
pub const MAINNET_COIN_TYPE: u32 = 0;

/// SLIP-44 coin type shared by all bitcoin test networks.
pub const TESTNET_COIN_TYPE: u32 = 1;

/// Returns the SLIP-44 coin type used for `network`.
pub fn coin_type_for_network(network: Network) -> u32 {
    match NetworkKind::from(network) {
        NetworkKind::Main => MAINNET_COIN_TYPE,
        NetworkKind::Test => TESTNET_COIN_TYPE,
    }
}

/// Root private key of the wallet together with the coin type it derives for.
///
/// Read-only once built. Every derivation call borrows it, so a single
/// context can be shared across threads.
#[derive(Debug, Clone)]
pub struct MasterKeyContext {
    /// Master [`Xpriv`] at `m`.
    root: Xpriv,

    /// Coin type placed in the second step of every wallet path.
    coin_type: u32,
}

impl MasterKeyContext {
    /// Creates a context from an existing master [`Xpriv`].
    pub const fn new(root: Xpriv, coin_type: u32) -> Self {
        Self { root, coin_type }
    }

    /// Creates a context from a BIP32 seed.
    ///
    /// The coin type follows `network`; see [`coin_type_for_network`].
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self, DerivationError> {
        let root = Xpriv::new_master(network, seed)?;
        Ok(Self::new(root, coin_type_for_network(network)))
    }

    /// Replaces the coin type.
    pub fn with_coin_type(mut self, coin_type: u32) -> Self {
        self.coin_type = coin_type;
        self
    }

    /// Master [`Xpriv`].
    pub const fn root(&self) -> &Xpriv {
        &self.root
    }

    /// Coin type used for wallet paths.
    pub const fn coin_type(&self) -> u32 {
        self.coin_type
    }

    /// Fingerprint of the master key.
    pub fn fingerprint(&self) -> Fingerprint {
        self.root.fingerprint(SECP256K1)
    }
}

// Manual Drop implementation to zeroize keys on drop.
impl Drop for MasterKeyContext {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Zeroize for MasterKeyContext {
    #[inline]
    fn zeroize(&mut self) {
        let Self { root, coin_type } = self;

        // # Security note
        //
        // The network kind is a public parameter and is left as is.
        //
        // NOTE: `Xpriv.private_key` (`SecretKey`) `non_secure_erase` writes `1`s to the memory.
        root.depth.zeroize();
        {
            let fingerprint: &mut [u8; 4] = root.parent_fingerprint.as_mut();
            fingerprint.zeroize();
        }
        root.private_key.non_secure_erase();
        {
            let chaincode: &mut [u8; 32] = root.chain_code.as_mut();
            chaincode.zeroize();
        }
        root.child_number = ChildNumber::Normal { index: 0 };
        coin_type.zeroize();
    }
}

impl ZeroizeOnDrop for MasterKeyContext {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_from_bip32_vector() {
        // BIP32 test vector 1
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = MasterKeyContext::from_seed(&seed, Network::Bitcoin).unwrap();

        assert_eq!(
            hex::encode(master.root().private_key.secret_bytes()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(master.coin_type(), MAINNET_COIN_TYPE);
        assert_eq!(master.fingerprint().to_string(), "3442193e");
    }

    #[test]
    fn coin_type_follows_network() {
        assert_eq!(coin_type_for_network(Network::Bitcoin), 0);
        assert_eq!(coin_type_for_network(Network::Testnet), 1);
        assert_eq!(coin_type_for_network(Network::Signet), 1);
        assert_eq!(coin_type_for_network(Network::Regtest), 1);

        let master = MasterKeyContext::from_seed(&[2u8; 32], Network::Regtest)
            .unwrap()
            .with_coin_type(1237);
        assert_eq!(master.coin_type(), 1237);
    }

    #[test]
    fn test_zeroize() {
        let mut master = MasterKeyContext::from_seed(&[2u8; 32], Network::Regtest).unwrap();

        let chaincode = *master.root().chain_code.as_bytes();
        assert_ne!(chaincode, [0u8; 32]);

        master.zeroize();

        // NOTE: SecretKey::non_secure_erase writes `1`s to the memory.
        assert_eq!(master.root().private_key.secret_bytes(), [1u8; 32]);
        assert_eq!(*master.root().chain_code.as_bytes(), [0u8; 32]);
        assert_eq!(*master.root().parent_fingerprint.as_bytes(), [0u8; 4]);
        assert_eq!(master.root().depth, 0);
        assert_eq!(master.root().child_number, ChildNumber::Normal { index: 0 });
        assert_eq!(master.coin_type(), 0);
    }
}
