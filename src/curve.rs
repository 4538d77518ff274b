//! Elliptic-curve capability used by key tweaking
//!
//! Key tweaking only needs four operations from the curve backend. Keeping
//! them behind [`CurveProvider`] lets the tweak logic run against a mock.

use crate::error::Result;
use crate::hashes;
use crate::types::{Hash, PublicKey};
use secp256k1::{All, Secp256k1, SecretKey};

pub trait CurveProvider {
    /// Public key of a 32-byte secret scalar
    fn public_key_from_secret(&self, secret: &Hash) -> Result<PublicKey>;

    /// Point addition
    fn combine(&self, a: &PublicKey, b: &PublicKey) -> Result<PublicKey>;

    fn is_odd(&self, point: &PublicKey) -> bool {
        point.is_odd()
    }

    fn tagged_hash(&self, data: &[u8], tag: &str) -> Hash {
        hashes::tagged_hash(data, tag)
    }
}

/// [`CurveProvider`] backed by libsecp256k1
pub struct Secp256k1Provider {
    secp: Secp256k1<All>,
}

impl Secp256k1Provider {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for Secp256k1Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveProvider for Secp256k1Provider {
    fn public_key_from_secret(&self, secret: &Hash) -> Result<PublicKey> {
        let sk = SecretKey::from_slice(secret)?;
        let pk = secp256k1::PublicKey::from_secret_key(&self.secp, &sk);
        Ok(PublicKey(pk.serialize()))
    }

    fn combine(&self, a: &PublicKey, b: &PublicKey) -> Result<PublicKey> {
        let a = secp256k1::PublicKey::from_slice(&a.0)?;
        let b = secp256k1::PublicKey::from_slice(&b.0)?;
        Ok(PublicKey(a.combine(&b)?.serialize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ODD_Y_PREFIX;
    use crate::error::PrimitivesError;

    fn secret(last: u8) -> Hash {
        let mut s = [0u8; 32];
        s[31] = last;
        s
    }

    #[test]
    fn test_generator_point() {
        let provider = Secp256k1Provider::new();
        let g = provider.public_key_from_secret(&secret(1)).unwrap();
        assert_eq!(
            g.to_string(),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert!(!provider.is_odd(&g));
    }

    #[test]
    fn test_combine_matches_scalar_addition() {
        let provider = Secp256k1Provider::new();
        let one = provider.public_key_from_secret(&secret(1)).unwrap();
        let two = provider.public_key_from_secret(&secret(2)).unwrap();
        let three = provider.public_key_from_secret(&secret(3)).unwrap();
        assert_eq!(provider.combine(&one, &two).unwrap(), three);
    }

    #[test]
    fn test_zero_secret_rejected() {
        let provider = Secp256k1Provider::new();
        let result = provider.public_key_from_secret(&[0u8; 32]);
        assert!(matches!(result, Err(PrimitivesError::Curve(_))));
    }

    #[test]
    fn test_point_at_infinity_rejected() {
        let provider = Secp256k1Provider::new();
        let g = provider.public_key_from_secret(&secret(1)).unwrap();
        let mut neg_g = g;
        neg_g.0[0] = ODD_Y_PREFIX;
        assert!(provider.combine(&g, &neg_g).is_err());
    }

    #[test]
    fn test_invalid_point_rejected() {
        let provider = Secp256k1Provider::new();
        let g = provider.public_key_from_secret(&secret(1)).unwrap();
        let bogus = PublicKey([0x05; 33]);
        assert!(provider.combine(&g, &bogus).is_err());
    }
}
