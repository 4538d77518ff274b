//! Taproot x-only keys and BIP341 output key derivation

use crate::constants::*;
use crate::curve::{CurveProvider, Secp256k1Provider};
use crate::error::{PrimitivesError, Result};
use crate::hashes;
use crate::types::{ByteString, Hash, PublicKey, TaprootTweak};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// x-only public key (BIP340): the x-coordinate of a point with even y
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct XonlyPublicKey {
    pub value: Hash,
}

impl XonlyPublicKey {
    /// No check is made that `value` is on the curve; the curve backend
    /// rejects it when the key is used.
    pub fn new(value: Hash) -> Self {
        Self { value }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Hash = bytes.try_into().map_err(|_| PrimitivesError::InvalidLength {
            expected: XONLY_PUBLIC_KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self::new(value))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_slice(&hex::decode(s)?)
    }

    /// Drops the parity prefix of a full public key
    pub fn from_public_key(pub_key: &PublicKey) -> Self {
        Self::new(pub_key.x_only())
    }

    /// The even-y point with this x-coordinate
    pub fn public_key(&self) -> PublicKey {
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        bytes[0] = EVEN_Y_PREFIX;
        bytes[1..].copy_from_slice(&self.value);
        PublicKey(bytes)
    }

    fn tweak_message(&self, tap_tweak: &TaprootTweak) -> ByteString {
        let mut data = self.value.to_vec();
        if let TaprootTweak::ScriptTweak(merkle_root) = tap_tweak {
            data.extend_from_slice(merkle_root);
        }
        data
    }

    /// TapTweak hash of this key, committing to the merkle root if there is one
    pub fn tweak(&self, tap_tweak: &TaprootTweak) -> Hash {
        hashes::tagged_hash(&self.tweak_message(tap_tweak), TAP_TWEAK_TAG)
    }

    /// TapTweak hash computed with the provider's tagged hash
    pub fn tweak_with<P: CurveProvider + ?Sized>(
        &self,
        tap_tweak: &TaprootTweak,
        provider: &P,
    ) -> Hash {
        provider.tagged_hash(&self.tweak_message(tap_tweak), TAP_TWEAK_TAG)
    }

    /// Tweaks this key with an optional merkle root
    ///
    /// Returns the output key and whether the tweaked point has odd y.
    /// Builds a fresh secp256k1 context per call; callers deriving many keys
    /// should hold one [`Secp256k1Provider`] and use [`Self::output_key_with`].
    pub fn output_key(&self, tap_tweak: &TaprootTweak) -> Result<(XonlyPublicKey, bool)> {
        self.output_key_with(tap_tweak, &Secp256k1Provider::new())
    }

    pub fn output_key_with<P: CurveProvider + ?Sized>(
        &self,
        tap_tweak: &TaprootTweak,
        provider: &P,
    ) -> Result<(XonlyPublicKey, bool)> {
        let tweak = self.tweak_with(tap_tweak, provider);
        log::trace!("tweaking {} with {}", self, hex::encode(tweak));
        let tweak_point = provider.public_key_from_secret(&tweak)?;
        self.add_with(&tweak_point, provider)
    }

    /// Adds a public key to this key
    ///
    /// Returns the x-only form of the sum and whether the sum has odd y.
    /// Like [`Self::output_key`], this allocates a context; see [`Self::add_with`].
    pub fn add(&self, that: &PublicKey) -> Result<(XonlyPublicKey, bool)> {
        self.add_with(that, &Secp256k1Provider::new())
    }

    pub fn add_with<P: CurveProvider + ?Sized>(
        &self,
        that: &PublicKey,
        provider: &P,
    ) -> Result<(XonlyPublicKey, bool)> {
        let sum = provider.combine(&self.public_key(), that)?;
        Ok((XonlyPublicKey::from_public_key(&sum), provider.is_odd(&sum)))
    }
}

impl From<PublicKey> for XonlyPublicKey {
    fn from(pub_key: PublicKey) -> Self {
        Self::from_public_key(&pub_key)
    }
}

impl Add<&PublicKey> for &XonlyPublicKey {
    type Output = Result<(XonlyPublicKey, bool)>;

    fn add(self, that: &PublicKey) -> Self::Output {
        XonlyPublicKey::add(self, that)
    }
}

impl fmt::Display for XonlyPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.value))
    }
}

impl FromStr for XonlyPublicKey {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for XonlyPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for XonlyPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for XonlyPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XonlyPublicKey({})", self)
    }
}

/// P2TR output script: OP_1 OP_PUSHBYTES_32 <output-key>
pub fn taproot_script(output_key: &XonlyPublicKey) -> ByteString {
    let mut script = Vec::with_capacity(TAPROOT_SCRIPT_SIZE);
    script.push(TAPROOT_SCRIPT_PREFIX);
    script.push(TAPROOT_PUSH_32);
    script.extend_from_slice(&output_key.value);
    script
}

/// Validate Taproot output script
pub fn validate_taproot_script(script: &[u8]) -> bool {
    script.len() == TAPROOT_SCRIPT_SIZE
        && script[0] == TAPROOT_SCRIPT_PREFIX
        && script[1] == TAPROOT_PUSH_32
}

/// Extract Taproot output key from script
pub fn extract_taproot_output_key(script: &[u8]) -> Option<XonlyPublicKey> {
    if !validate_taproot_script(script) {
        return None;
    }
    XonlyPublicKey::from_slice(&script[2..]).ok()
}

/// Compute the Taproot output key
/// OutputKey = InternalPubKey + TapTweak(InternalPubKey || MerkleRoot) × G
///
/// Uses a fresh secp256k1 context; in a loop, prefer
/// [`XonlyPublicKey::output_key_with`] with a shared [`Secp256k1Provider`].
pub fn compute_taproot_tweak(internal_pubkey: &Hash, tap_tweak: &TaprootTweak) -> Result<Hash> {
    let (output_key, _) = XonlyPublicKey::new(*internal_pubkey).output_key(tap_tweak)?;
    Ok(output_key.value)
}

/// Validate Taproot key aggregation
pub fn validate_taproot_key_aggregation(
    internal_pubkey: &Hash,
    tap_tweak: &TaprootTweak,
    output_key: &Hash,
) -> Result<bool> {
    let expected_output_key = compute_taproot_tweak(internal_pubkey, tap_tweak)?;
    Ok(expected_output_key == *output_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn internal_key() -> XonlyPublicKey {
        XonlyPublicKey::from_hex("31ac3f7df9589d2037b255fc6c0d028274189287f9d461afc65b946c8b1a5fc1")
            .unwrap()
    }

    #[test]
    fn test_public_key_has_even_prefix() {
        let key = internal_key();
        let pk = key.public_key();
        assert_eq!(pk.0[0], EVEN_Y_PREFIX);
        assert_eq!(&pk.0[1..], &key.value[..]);
    }

    #[test]
    fn test_from_public_key_drops_prefix() {
        let mut bytes = [0x11u8; 33];
        bytes[0] = ODD_Y_PREFIX;
        let key = XonlyPublicKey::from_public_key(&PublicKey(bytes));
        assert_eq!(key.value, [0x11u8; 32]);
    }

    #[test]
    fn test_from_slice_wrong_length() {
        assert!(matches!(
            XonlyPublicKey::from_slice(&[0u8; 33]),
            Err(PrimitivesError::InvalidLength { expected: 32, actual: 33 })
        ));
    }

    #[test]
    fn test_tweak_variants_differ() {
        let key = internal_key();
        let plain = key.tweak(&TaprootTweak::NoScriptTweak);
        let scripted = key.tweak(&TaprootTweak::ScriptTweak([0x42; 32]));
        assert_ne!(plain, scripted);
        assert_eq!(plain, hashes::tagged_hash(&key.value, TAP_TWEAK_TAG));
    }

    #[test]
    fn test_tweak_with_default_provider_matches_tweak() {
        let key = internal_key();
        let tap_tweak = TaprootTweak::ScriptTweak([0x42; 32]);
        let provider = Secp256k1Provider::new();
        assert_eq!(key.tweak_with(&tap_tweak, &provider), key.tweak(&tap_tweak));
    }

    #[test]
    fn test_serde_hex_string() {
        let key = internal_key();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key));
        assert_eq!(serde_json::from_str::<XonlyPublicKey>(&json).unwrap(), key);
        assert!(serde_json::from_str::<XonlyPublicKey>("\"abcd\"").is_err());
    }

    #[test]
    fn test_output_key_known_vector() {
        let (output_key, _) = internal_key().output_key(&TaprootTweak::NoScriptTweak).unwrap();
        assert_eq!(
            output_key.to_string(),
            "ff2138daad188067451d42932700b0075f1bf19918b5d99ba77abb50b5a79f3c"
        );
    }

    #[test]
    fn test_output_key_invalid_internal_key() {
        // x = 0 is not on the curve
        let key = XonlyPublicKey::new([0u8; 32]);
        assert!(key.output_key(&TaprootTweak::NoScriptTweak).is_err());
    }

    #[test]
    fn test_add_operator_matches_method() {
        let provider = Secp256k1Provider::new();
        let mut one = [0u8; 32];
        one[31] = 1;
        let g = provider.public_key_from_secret(&one).unwrap();
        let key = internal_key();
        assert_eq!((&key + &g).unwrap(), key.add(&g).unwrap());
    }

    #[test]
    fn test_taproot_script() {
        let key = XonlyPublicKey::new([1u8; 32]);
        let script = taproot_script(&key);
        assert_eq!(script.len(), TAPROOT_SCRIPT_SIZE);
        assert!(validate_taproot_script(&script));
        assert_eq!(extract_taproot_output_key(&script), Some(key));
    }

    #[test]
    fn test_validate_taproot_script_invalid_length() {
        let script = vec![0x51, 0x20]; // Too short
        assert!(!validate_taproot_script(&script));
        assert_eq!(extract_taproot_output_key(&script), None);
    }

    #[test]
    fn test_validate_taproot_script_invalid_prefix() {
        let mut script = vec![0x52, 0x20]; // OP_2 instead of OP_1
        script.extend_from_slice(&[1u8; 32]);
        assert!(!validate_taproot_script(&script));
    }

    #[test]
    fn test_validate_taproot_key_aggregation() {
        let internal = internal_key().value;
        let tap_tweak = TaprootTweak::ScriptTweak([2u8; 32]);
        let output_key = compute_taproot_tweak(&internal, &tap_tweak).unwrap();
        assert!(validate_taproot_key_aggregation(&internal, &tap_tweak, &output_key).unwrap());
        assert!(!validate_taproot_key_aggregation(&internal, &tap_tweak, &[3u8; 32]).unwrap());
    }
}
