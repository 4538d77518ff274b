//! Core value types shared by the primitives

use crate::constants::*;
use crate::error::{PrimitivesError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Natural number type
pub type Natural = u64;

/// Integer type
pub type Integer = i64;

/// Compressed secp256k1 public key: parity prefix followed by the x-coordinate
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: [u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| PrimitivesError::InvalidLength {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(PublicKey(value))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_slice(&hex::decode(s)?)
    }

    pub fn serialize(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }

    /// True if the prefix marks an odd y-coordinate
    pub fn is_odd(&self) -> bool {
        self.0[0] == ODD_Y_PREFIX
    }

    /// The 32-byte x-coordinate
    pub fn x_only(&self) -> Hash {
        let mut x = [0u8; 32];
        x.copy_from_slice(&self.0[1..]);
        x
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Taproot tweak: key-path only, or committing to a script tree merkle root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaprootTweak {
    NoScriptTweak,
    ScriptTweak(Hash),
}

/// Block Header: ℋ = ℤ × ℍ × ℍ × ℕ × ℕ × ℕ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: Integer,
    pub prev_block_hash: Hash,
    pub merkle_root: Hash,
    pub timestamp: Natural,
    pub bits: Natural,
    pub nonce: Natural,
}
