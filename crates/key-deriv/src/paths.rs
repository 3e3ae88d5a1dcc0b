//! BIP32 derivation paths for the wallit key hierarchy.
//!
//! # Key Hierarchy Overview
//!
//! Every key is derived from the master key through a path of exactly five
//! hardened steps:
//!
//! ```text
//! m / 44' / coin_type' / use_case' / peer_index' / key_index'
//! ```
//!
//! The use case selects the key family. Peer and key index slots are reused by
//! the channel families to identify the remote peer and the channel.
//!
//! # Use Case Reference
//!
//! | Use case | Family | Peer | Index |
//! |----------|--------|------|-------|
//! | `0'` | Regular wallet outputs | `0'` | linear address index |
//! | `2'` | Channel multisig | peer | channel |
//! | `3'` | Channel refund | peer | channel |
//! | `11'` | Node identity | `0'` | `0'` |
//!
//! Two representations are provided. [`KeyPath`] carries named fields and is
//! hardened by construction. [`RawKeyPath`] is the positional on-wire form with
//! an explicit depth; it is what the derivation engine walks.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use bitcoin::bip32::{ChildNumber, DerivationPath};
use thiserror::Error;

/// Flag bit marking a step as hardened.
pub const HARDENED: u32 = 1 << 31;

/// BIP-44 purpose constant, always the first step.
pub const PURPOSE: u32 = 44;

/// The only path depth the derivation engine accepts.
pub const KEY_PATH_DEPTH: u8 = 5;

/// Length of a serialized [`RawKeyPath`]: one depth byte and five `u32` steps.
pub const RAW_KEY_PATH_LEN: usize = 1 + 4 * KEY_PATH_DEPTH as usize;

const PURPOSE_POS: usize = 0;
const COIN_TYPE_POS: usize = 1;
const USE_CASE_POS: usize = 2;
const PEER_INDEX_POS: usize = 3;
const KEY_INDEX_POS: usize = 4;

/// Error while parsing or converting a key path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Serialized path has the wrong number of bytes.
    #[error("serialized key path must be {len} bytes, got {0}", len = RAW_KEY_PATH_LEN)]
    InvalidLength(usize),

    /// Depth is larger than the step array can hold, or not the required depth.
    #[error("key path depth must be {depth}, got {0}", depth = KEY_PATH_DEPTH)]
    InvalidDepth(u8),

    /// A step that must be hardened is not.
    #[error("step {position} is not hardened")]
    NotHardened {
        /// Zero-based position of the offending step.
        position: usize,
    },

    /// The first step is not `44'`.
    #[error("unexpected purpose {0}, expected {purpose}", purpose = PURPOSE)]
    UnexpectedPurpose(u32),

    /// Use case is neither a known name nor a number.
    #[error("unknown use case {0:?}")]
    UnknownUseCase(String),
}

/// Key family selected by the use-case step.
///
/// Equality and hashing go by [`UseCase::index`], so `Other(2)` equals
/// [`UseCase::ChannelMultisig`].
#[derive(Debug, Clone, Copy)]
pub enum UseCase {
    /// Regular wallet receive and change addresses.
    Wallet,

    /// Channel funding multisig keys.
    ChannelMultisig,

    /// Channel refund keys.
    ChannelRefund,

    /// Node identity key.
    Identity,

    /// Any other use-case index.
    Other(u32),
}

impl UseCase {
    /// Unhardened index of this use case.
    pub const fn index(self) -> u32 {
        match self {
            Self::Wallet => 0,
            Self::ChannelMultisig => 2,
            Self::ChannelRefund => 3,
            Self::Identity => 11,
            Self::Other(index) => index & !HARDENED,
        }
    }
}

impl PartialEq for UseCase {
    fn eq(&self, other: &Self) -> bool {
        self.index() == other.index()
    }
}

impl Eq for UseCase {}

impl Hash for UseCase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index().hash(state);
    }
}

impl From<u32> for UseCase {
    fn from(value: u32) -> Self {
        match value & !HARDENED {
            0 => Self::Wallet,
            2 => Self::ChannelMultisig,
            3 => Self::ChannelRefund,
            11 => Self::Identity,
            other => Self::Other(other),
        }
    }
}

impl From<UseCase> for u32 {
    fn from(value: UseCase) -> Self {
        value.index()
    }
}

impl FromStr for UseCase {
    type Err = PathError;

    /// Accepts the [`Display`](fmt::Display) names, short aliases, `use-N` or
    /// a bare index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wallet" => Ok(Self::Wallet),
            "channel-multisig" | "multisig" => Ok(Self::ChannelMultisig),
            "channel-refund" | "refund" => Ok(Self::ChannelRefund),
            "identity" => Ok(Self::Identity),
            other => other
                .strip_prefix("use-")
                .unwrap_or(other)
                .parse::<u32>()
                .map(Self::from)
                .map_err(|_| PathError::UnknownUseCase(s.to_owned())),
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wallet => f.write_str("wallet"),
            Self::ChannelMultisig => f.write_str("channel-multisig"),
            Self::ChannelRefund => f.write_str("channel-refund"),
            Self::Identity => f.write_str("identity"),
            Self::Other(index) => write!(f, "use-{index}"),
        }
    }
}

/// Positional key path: a depth count plus a fixed array of raw steps.
///
/// Bit 31 of each step marks it hardened. Only the first `depth` steps are
/// meaningful, and derivation refuses any depth other than
/// [`KEY_PATH_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawKeyPath {
    /// Number of meaningful steps.
    pub depth: u8,

    /// Raw step values, hardened bit included.
    pub steps: [u32; KEY_PATH_DEPTH as usize],
}

impl RawKeyPath {
    /// Creates a raw path from a depth and its steps.
    pub const fn new(depth: u8, steps: [u32; KEY_PATH_DEPTH as usize]) -> Self {
        Self { depth, steps }
    }

    /// Whether the path has the depth the derivation engine requires.
    pub const fn is_derivable(&self) -> bool {
        self.depth == KEY_PATH_DEPTH
    }

    /// Returns a copy of this path with the use-case step replaced.
    ///
    /// The new step is always hardened. Depth and all other steps are kept.
    pub const fn with_use_case(mut self, use_case: UseCase) -> Self {
        self.steps[USE_CASE_POS] = use_case.index() | HARDENED;
        self
    }

    /// Steps as BIP32 child numbers, in derivation order.
    pub fn child_numbers(&self) -> [ChildNumber; KEY_PATH_DEPTH as usize] {
        self.steps.map(ChildNumber::from)
    }

    /// Serializes as the depth byte followed by little-endian steps.
    pub fn to_bytes(&self) -> [u8; RAW_KEY_PATH_LEN] {
        let mut buf = [0u8; RAW_KEY_PATH_LEN];
        buf[0] = self.depth;
        for (chunk, step) in buf[1..].chunks_exact_mut(4).zip(self.steps) {
            chunk.copy_from_slice(&step.to_le_bytes());
        }
        buf
    }

    /// Parses the form produced by [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PathError> {
        if bytes.len() != RAW_KEY_PATH_LEN {
            return Err(PathError::InvalidLength(bytes.len()));
        }

        let depth = bytes[0];
        if depth > KEY_PATH_DEPTH {
            return Err(PathError::InvalidDepth(depth));
        }

        let mut steps = [0u32; KEY_PATH_DEPTH as usize];
        for (step, chunk) in steps.iter_mut().zip(bytes[1..].chunks_exact(4)) {
            let mut word = [0u8; 4];
            word.copy_from_slice(chunk);
            *step = u32::from_le_bytes(word);
        }

        Ok(Self { depth, steps })
    }
}

impl fmt::Display for RawKeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        let shown = usize::from(self.depth.min(KEY_PATH_DEPTH));
        for step in &self.steps[..shown] {
            if step & HARDENED != 0 {
                write!(f, "/{}'", step & !HARDENED)?;
            } else {
                write!(f, "/{step}")?;
            }
        }
        Ok(())
    }
}

/// Typed five-step key path. Every step is hardened by construction.
///
/// Index values are stored without the hardened bit; any bit 31 passed in is
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPath {
    coin_type: u32,
    use_case: UseCase,
    peer_index: u32,
    key_index: u32,
}

impl KeyPath {
    /// Creates a path from its named components.
    pub const fn new(coin_type: u32, use_case: UseCase, peer_index: u32, key_index: u32) -> Self {
        Self {
            coin_type: coin_type & !HARDENED,
            use_case,
            peer_index: peer_index & !HARDENED,
            key_index: key_index & !HARDENED,
        }
    }

    /// Path of a regular wallet address: `m/44'/coin'/0'/0'/index'`.
    pub const fn wallet(index: u32, coin_type: u32) -> Self {
        Self::new(coin_type, UseCase::Wallet, 0, index)
    }

    /// Channel-shaped path for a peer and channel index.
    ///
    /// The use case is left at [`UseCase::Wallet`]; callers retarget it with
    /// [`Self::with_use_case`].
    pub const fn channel(coin_type: u32, peer_index: u32, key_index: u32) -> Self {
        Self::new(coin_type, UseCase::Wallet, peer_index, key_index)
    }

    /// Path of the node identity key: `m/44'/coin'/11'/0'/0'`.
    pub const fn identity(coin_type: u32) -> Self {
        Self::new(coin_type, UseCase::Identity, 0, 0)
    }

    /// Returns this path with only the use case replaced.
    pub const fn with_use_case(self, use_case: UseCase) -> Self {
        Self { use_case, ..self }
    }

    /// Purpose step index, always [`PURPOSE`].
    pub const fn purpose(&self) -> u32 {
        PURPOSE
    }

    /// Coin type index.
    pub const fn coin_type(&self) -> u32 {
        self.coin_type
    }

    /// Key family.
    pub const fn use_case(&self) -> UseCase {
        self.use_case
    }

    /// Peer index.
    pub const fn peer_index(&self) -> u32 {
        self.peer_index
    }

    /// Key index.
    pub const fn key_index(&self) -> u32 {
        self.key_index
    }

    /// Raw positional form, all steps hardened.
    pub const fn to_raw(&self) -> RawKeyPath {
        let mut steps = [0u32; KEY_PATH_DEPTH as usize];
        steps[PURPOSE_POS] = PURPOSE | HARDENED;
        steps[COIN_TYPE_POS] = self.coin_type | HARDENED;
        steps[USE_CASE_POS] = self.use_case.index() | HARDENED;
        steps[PEER_INDEX_POS] = self.peer_index | HARDENED;
        steps[KEY_INDEX_POS] = self.key_index | HARDENED;
        RawKeyPath::new(KEY_PATH_DEPTH, steps)
    }
}

impl From<KeyPath> for RawKeyPath {
    fn from(path: KeyPath) -> Self {
        path.to_raw()
    }
}

impl From<&KeyPath> for RawKeyPath {
    fn from(path: &KeyPath) -> Self {
        path.to_raw()
    }
}

impl From<KeyPath> for DerivationPath {
    fn from(path: KeyPath) -> Self {
        path.to_raw().child_numbers().to_vec().into()
    }
}

impl TryFrom<RawKeyPath> for KeyPath {
    type Error = PathError;

    fn try_from(raw: RawKeyPath) -> Result<Self, Self::Error> {
        if !raw.is_derivable() {
            return Err(PathError::InvalidDepth(raw.depth));
        }

        if let Some(position) = raw.steps.iter().position(|step| step & HARDENED == 0) {
            return Err(PathError::NotHardened { position });
        }

        let purpose = raw.steps[PURPOSE_POS] & !HARDENED;
        if purpose != PURPOSE {
            return Err(PathError::UnexpectedPurpose(purpose));
        }

        Ok(Self::new(
            raw.steps[COIN_TYPE_POS],
            UseCase::from(raw.steps[USE_CASE_POS]),
            raw.steps[PEER_INDEX_POS],
            raw.steps[KEY_INDEX_POS],
        ))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_raw(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_path_steps() {
        let path = KeyPath::wallet(7, 0).to_raw();

        assert_eq!(path.depth, 5);
        assert_eq!(
            path.steps,
            [
                44 | HARDENED,
                HARDENED,
                HARDENED,
                HARDENED,
                7 | HARDENED
            ]
        );
        assert_eq!(path.to_string(), "m/44'/0'/0'/0'/7'");
    }

    #[test]
    fn identity_path_steps() {
        let path = KeyPath::identity(1);
        assert_eq!(path.to_string(), "m/44'/1'/11'/0'/0'");
        assert_eq!(path.use_case(), UseCase::Identity);
    }

    #[test]
    fn channel_path_retargets_use_case() {
        let base = KeyPath::channel(0, 4, 9);
        let multisig = base.with_use_case(UseCase::ChannelMultisig);
        let refund = base.with_use_case(UseCase::ChannelRefund);

        assert_eq!(multisig.to_string(), "m/44'/0'/2'/4'/9'");
        assert_eq!(refund.to_string(), "m/44'/0'/3'/4'/9'");
    }

    #[test]
    fn hardened_bit_in_input_is_dropped() {
        let path = KeyPath::wallet(3 | HARDENED, 1 | HARDENED);
        assert_eq!(path.key_index(), 3);
        assert_eq!(path.coin_type(), 1);
        assert_eq!(path.to_raw().steps[4], 3 | HARDENED);
    }

    #[test]
    fn raw_use_case_override_keeps_depth() {
        let raw = RawKeyPath::new(3, [44 | HARDENED, HARDENED, HARDENED, 0, 0]);
        let overridden = raw.with_use_case(UseCase::Identity);

        assert_eq!(overridden.depth, 3);
        assert_eq!(overridden.steps[2], 11 | HARDENED);
        assert!(!overridden.is_derivable());
    }

    #[test]
    fn raw_display_respects_depth_and_hardening() {
        let raw = RawKeyPath::new(3, [44 | HARDENED, 5, 6 | HARDENED, 7, 8]);
        assert_eq!(raw.to_string(), "m/44'/5/6'");
        assert_eq!(RawKeyPath::default().to_string(), "m");
    }

    #[test]
    fn raw_bytes_layout() {
        let raw = KeyPath::wallet(1, 0).to_raw();
        let bytes = raw.to_bytes();

        assert_eq!(
            hex::encode(bytes),
            "052c00008000000080000000800000008001000080"
        );
        assert_eq!(RawKeyPath::from_bytes(&bytes), Ok(raw));
    }

    #[test]
    fn raw_bytes_rejects_bad_input() {
        assert_eq!(
            RawKeyPath::from_bytes(&[5u8; 20]),
            Err(PathError::InvalidLength(20))
        );

        let mut bytes = [0u8; RAW_KEY_PATH_LEN];
        bytes[0] = 6;
        assert_eq!(
            RawKeyPath::from_bytes(&bytes),
            Err(PathError::InvalidDepth(6))
        );
    }

    #[test]
    fn typed_from_raw() {
        let path = KeyPath::channel(1, 2, 3).with_use_case(UseCase::ChannelRefund);
        assert_eq!(KeyPath::try_from(path.to_raw()), Ok(path));

        let shallow = RawKeyPath::new(4, path.to_raw().steps);
        assert_eq!(
            KeyPath::try_from(shallow),
            Err(PathError::InvalidDepth(4))
        );

        let mut soft = path.to_raw();
        soft.steps[3] &= !HARDENED;
        assert_eq!(
            KeyPath::try_from(soft),
            Err(PathError::NotHardened { position: 3 })
        );

        let mut bip49 = path.to_raw();
        bip49.steps[0] = 49 | HARDENED;
        assert_eq!(
            KeyPath::try_from(bip49),
            Err(PathError::UnexpectedPurpose(49))
        );
    }

    #[test]
    fn derivation_path_matches_bip32_notation() {
        let path: DerivationPath = KeyPath::wallet(7, 0).into();
        assert_eq!(path, DerivationPath::from_str("m/44'/0'/0'/0'/7'").unwrap());
    }

    #[test]
    fn use_case_index_conversions() {
        assert_eq!(UseCase::from(2), UseCase::ChannelMultisig);
        assert_eq!(UseCase::from(3 | HARDENED), UseCase::ChannelRefund);
        assert_eq!(UseCase::from(42), UseCase::Other(42));
        assert_eq!(u32::from(UseCase::Identity), 11);
        assert_eq!(UseCase::Other(5).to_string(), "use-5");
        assert_eq!(UseCase::Other(11 | HARDENED), UseCase::Identity);
    }

    #[test]
    fn use_case_parsing() {
        assert_eq!("refund".parse::<UseCase>(), Ok(UseCase::ChannelRefund));
        assert_eq!("channel-multisig".parse::<UseCase>(), Ok(UseCase::ChannelMultisig));
        assert_eq!("11".parse::<UseCase>(), Ok(UseCase::Identity));
        assert_eq!("use-7".parse::<UseCase>(), Ok(UseCase::Other(7)));
        assert_eq!(
            "payments".parse::<UseCase>(),
            Err(PathError::UnknownUseCase("payments".to_string()))
        );

        for use_case in [UseCase::Wallet, UseCase::Identity, UseCase::Other(40)] {
            assert_eq!(use_case.to_string().parse::<UseCase>(), Ok(use_case));
        }
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(1_000))]

            #[test]
            fn wallet_path_is_five_hardened_steps(index: u32, coin_type: u32) {
                let raw = KeyPath::wallet(index, coin_type).to_raw();
                prop_assert_eq!(raw.depth, KEY_PATH_DEPTH);
                prop_assert!(raw.steps.iter().all(|step| step & HARDENED != 0));
                prop_assert_eq!(raw.steps[0], PURPOSE | HARDENED);
                prop_assert_eq!(raw.steps[2], HARDENED);
            }

            #[test]
            fn use_case_override_touches_only_step_two(
                index: u32,
                coin_type: u32,
                peer: u32,
                use_case: u32,
            ) {
                let base = KeyPath::new(coin_type, UseCase::Wallet, peer, index);
                let before = base.to_raw();
                let after = base.with_use_case(UseCase::from(use_case)).to_raw();

                prop_assert_eq!(before.depth, after.depth);
                for pos in [0, 1, 3, 4] {
                    prop_assert_eq!(before.steps[pos], after.steps[pos]);
                }
                prop_assert_eq!(after.steps[2], use_case | HARDENED);
                prop_assert_eq!(before.with_use_case(UseCase::from(use_case)), after);
            }

            #[test]
            fn raw_bytes_roundtrip(depth in 0u8..=5, steps in any::<[u32; 5]>()) {
                let raw = RawKeyPath::new(depth, steps);
                prop_assert_eq!(RawKeyPath::from_bytes(&raw.to_bytes()), Ok(raw));
            }
        }
    }
}
