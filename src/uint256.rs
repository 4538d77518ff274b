//! 256-bit unsigned integer with Bitcoin's compact (nBits) codec
//!
//! The value is stored as eight 32-bit words, least-significant word first.
//! Arithmetic never grows the width: bits pushed past bit 255 are dropped.

use crate::constants::*;
use crate::error::{PrimitivesError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr, Shl, Shr};
use std::str::FromStr;

/// 256-bit unsigned integer used for proof-of-work targets
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UInt256([u32; UINT256_WORDS]);

/// Result of decoding a compact target
///
/// Decoding never fails; malformed encodings are reported through the flags
/// and rejecting them is the caller's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedCompact {
    pub value: UInt256,
    pub negative: bool,
    pub overflow: bool,
}

impl UInt256 {
    pub const ZERO: UInt256 = UInt256([0; UINT256_WORDS]);
    pub const MAX: UInt256 = UInt256([u32::MAX; UINT256_WORDS]);

    pub const fn zero() -> Self {
        Self::ZERO
    }

    pub const fn from_u64(value: u64) -> Self {
        let mut words = [0u32; UINT256_WORDS];
        words[0] = value as u32;
        words[1] = (value >> 32) as u32;
        UInt256(words)
    }

    pub const fn from_words(words: [u32; UINT256_WORDS]) -> Self {
        UInt256(words)
    }

    /// Interprets up to 32 bytes as a big-endian integer
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > UINT256_BYTES {
            return Err(PrimitivesError::InvalidLength {
                expected: UINT256_BYTES,
                actual: bytes.len(),
            });
        }

        // Reversed input is little-endian; the zero padding lands on the high end.
        let mut le = [0u8; UINT256_BYTES];
        for (dst, src) in le.iter_mut().zip(bytes.iter().rev()) {
            *dst = *src;
        }
        Ok(Self::from_le_bytes(&le))
    }

    pub fn from_be_bytes(bytes: &[u8; UINT256_BYTES]) -> Self {
        let mut le = *bytes;
        le.reverse();
        Self::from_le_bytes(&le)
    }

    fn from_le_bytes(bytes: &[u8; UINT256_BYTES]) -> Self {
        let mut words = [0u32; UINT256_WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        UInt256(words)
    }

    pub fn to_be_bytes(&self) -> [u8; UINT256_BYTES] {
        let mut bytes = [0u8; UINT256_BYTES];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes.reverse();
        bytes
    }

    pub fn words(&self) -> &[u32; UINT256_WORDS] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Truncating left shift
    pub fn shl(&self, bit_count: u32) -> Self {
        let mut result = Self::ZERO;
        let k = (bit_count / 32) as usize;
        let shift = bit_count % 32;

        for (i, &word) in self.0.iter().enumerate() {
            if shift != 0 && i + k + 1 < UINT256_WORDS {
                result.0[i + k + 1] |= word >> (32 - shift);
            }
            if i + k < UINT256_WORDS {
                result.0[i + k] |= word << shift;
            }
        }

        result
    }

    /// Truncating right shift
    pub fn shr(&self, bit_count: u32) -> Self {
        let mut result = Self::ZERO;
        let k = (bit_count / 32) as usize;
        let shift = bit_count % 32;

        for (i, &word) in self.0.iter().enumerate() {
            if shift != 0 && i > k {
                result.0[i - k - 1] |= word << (32 - shift);
            }
            if i >= k {
                result.0[i - k] |= word >> shift;
            }
        }

        result
    }

    /// Number of bits needed to represent the value, 0 for zero
    pub fn bits(&self) -> u32 {
        for pos in (0..UINT256_WORDS).rev() {
            let word = self.0[pos];
            if word != 0 {
                return 32 * pos as u32 + (32 - word.leading_zeros());
            }
        }
        0
    }

    pub fn low_u64(&self) -> u64 {
        self.0[0] as u64 | ((self.0[1] as u64) << 32)
    }

    /// Encodes the value as a compact target (nBits)
    pub fn encode_compact(&self, negative: bool) -> Result<u32> {
        let mut size = (self.bits() + 7) / 8;
        let mut compact = if size <= 3 {
            self.low_u64() << (8 * (3 - size))
        } else {
            self.shr(8 * (size - 3)).low_u64()
        };

        // 0x00800000 is the sign bit: move the mantissa down a byte instead.
        if compact & COMPACT_SIGN_BIT as u64 != 0 {
            compact >>= 8;
            size += 1;
        }

        if compact & !(COMPACT_MANTISSA_MASK as u64) != 0 {
            return Err(PrimitivesError::CompactOverflow(format!(
                "mantissa {:#x} exceeds 23 bits",
                compact
            )));
        }
        if size >= 256 {
            return Err(PrimitivesError::CompactOverflow(format!(
                "exponent {} does not fit in a byte",
                size
            )));
        }

        compact |= (size as u64) << 24;
        // Tested on the assembled word, so any non-zero value takes the sign.
        if negative && compact & !(COMPACT_MANTISSA_MASK as u64) != 0 {
            compact |= COMPACT_SIGN_BIT as u64;
        }

        Ok(compact as u32)
    }

    /// Decodes a compact target (nBits)
    pub fn decode_compact(compact: u32) -> DecodedCompact {
        let size = compact >> 24;
        let mut word = (compact & COMPACT_MANTISSA_MASK) as u64;

        let value = if size <= 3 {
            word >>= 8 * (3 - size);
            Self::from_u64(word)
        } else {
            Self::from_u64(word).shl(8 * (size - 3))
        };

        let negative = word != 0 && compact & COMPACT_SIGN_BIT != 0;
        let overflow = word != 0
            && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));

        if negative || overflow {
            log::debug!(
                "compact {:#010x} decoded with negative={} overflow={}",
                compact,
                negative,
                overflow
            );
        }

        DecodedCompact {
            value,
            negative,
            overflow,
        }
    }
}

impl Ord for UInt256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().rev().zip(other.0.iter().rev()) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for UInt256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Shl<u32> for UInt256 {
    type Output = UInt256;

    fn shl(self, bit_count: u32) -> UInt256 {
        UInt256::shl(&self, bit_count)
    }
}

impl Shr<u32> for UInt256 {
    type Output = UInt256;

    fn shr(self, bit_count: u32) -> UInt256 {
        UInt256::shr(&self, bit_count)
    }
}

impl BitAnd for UInt256 {
    type Output = UInt256;

    fn bitand(mut self, rhs: UInt256) -> UInt256 {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a &= b;
        }
        self
    }
}

impl BitOr for UInt256 {
    type Output = UInt256;

    fn bitor(mut self, rhs: UInt256) -> UInt256 {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a |= b;
        }
        self
    }
}

impl From<u64> for UInt256 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Display for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_be_bytes()))
    }
}

impl fmt::LowerHex for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Debug for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt256({})", self)
    }
}

impl FromStr for UInt256 {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() % 2 == 1 {
            return Self::from_be_slice(&hex::decode(format!("0{}", s))?);
        }
        Self::from_be_slice(&hex::decode(s)?)
    }
}

impl Serialize for UInt256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for UInt256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
