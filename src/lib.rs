//! # Consensus-Primitives
//!
//! Numeric and key-tweaking primitives underneath Bitcoin consensus code.
//!
//! This crate provides pure, side-effect-free building blocks:
//! - [`UInt256`]: a fixed-width 256-bit unsigned integer with the compact
//!   (`nBits`) difficulty target codec
//! - [`XonlyPublicKey`]: BIP340 x-only keys and BIP341 output key derivation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: All functions are deterministic and side-effect-free
//! 2. **Fixed Width**: 256-bit values never grow; overflowing bits are dropped
//! 3. **Exact Version Pinning**: All consensus-critical dependencies pinned to exact versions
//! 4. **Pluggable Curve**: Point arithmetic goes through [`curve::CurveProvider`]
//!
//! ## Usage
//!
//! ```rust
//! use consensus_primitives::UInt256;
//!
//! let decoded = UInt256::decode_compact(0x1d00ffff);
//! assert!(!decoded.negative && !decoded.overflow);
//! assert_eq!(decoded.value.encode_compact(false).unwrap(), 0x1d00ffff);
//! ```

pub mod types;
pub mod constants;
pub mod uint256;
pub mod hashes;
pub mod curve;
pub mod pow;
pub mod taproot;
pub mod error;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{PrimitivesError, Result};
pub use uint256::{DecodedCompact, UInt256};
pub use taproot::XonlyPublicKey;
pub use curve::{CurveProvider, Secp256k1Provider};

/// Stateless entry point over the primitives
///
/// # Examples
///
/// ```
/// use consensus_primitives::ConsensusPrimitives;
///
/// let primitives = ConsensusPrimitives::new();
/// let target = primitives.target_from_compact(0x1d00ffff).unwrap();
/// assert_eq!(primitives.compact_from_target(&target).unwrap(), 0x1d00ffff);
/// ```
pub struct ConsensusPrimitives;

impl ConsensusPrimitives {
    pub fn new() -> Self {
        Self
    }

    /// Decode a compact target, reporting negative/overflow as flags
    pub fn decode_compact(&self, bits: u32) -> DecodedCompact {
        UInt256::decode_compact(bits)
    }

    /// Encode a value as a compact target
    pub fn encode_compact(&self, value: &UInt256, negative: bool) -> Result<u32> {
        value.encode_compact(negative)
    }

    /// Decode a compact target, rejecting negative, overflowing and zero targets
    pub fn target_from_compact(&self, bits: u32) -> Result<UInt256> {
        pow::target_from_compact(bits)
    }

    pub fn compact_from_target(&self, target: &UInt256) -> Result<u32> {
        pow::compact_from_target(target)
    }

    /// Check that a block header hash meets its own target
    pub fn check_proof_of_work(&self, header: &BlockHeader) -> Result<bool> {
        pow::check_proof_of_work(header)
    }

    /// Derive the Taproot output key and its parity
    ///
    /// # Examples
    ///
    /// ```
    /// use consensus_primitives::{ConsensusPrimitives, TaprootTweak, XonlyPublicKey};
    ///
    /// let primitives = ConsensusPrimitives::new();
    /// let internal = XonlyPublicKey::from_hex(
    ///     "31ac3f7df9589d2037b255fc6c0d028274189287f9d461afc65b946c8b1a5fc1",
    /// ).unwrap();
    /// let (output, _parity) = primitives
    ///     .taproot_output_key(&internal, &TaprootTweak::NoScriptTweak)
    ///     .unwrap();
    /// assert_eq!(
    ///     output.to_string(),
    ///     "ff2138daad188067451d42932700b0075f1bf19918b5d99ba77abb50b5a79f3c"
    /// );
    /// ```
    pub fn taproot_output_key(
        &self,
        internal_key: &XonlyPublicKey,
        tap_tweak: &TaprootTweak,
    ) -> Result<(XonlyPublicKey, bool)> {
        internal_key.output_key(tap_tweak)
    }

    /// P2TR script for an output key
    pub fn taproot_script(&self, output_key: &XonlyPublicKey) -> ByteString {
        taproot::taproot_script(output_key)
    }
}

impl Default for ConsensusPrimitives {
    fn default() -> Self {
        Self::new()
    }
}
