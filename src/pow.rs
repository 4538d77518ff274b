//! Proof of Work: compact target policy and header hash check

use crate::constants::*;
use crate::error::{PrimitivesError, Result};
use crate::hashes::sha256d;
use crate::types::*;
use crate::uint256::UInt256;

/// ExpandTarget: ℕ → ℕ²⁵⁶
///
/// Decode the compact target and reject what consensus rejects: negative,
/// overflowing or zero targets.
pub fn target_from_compact(bits: u32) -> Result<UInt256> {
    let decoded = UInt256::decode_compact(bits);

    let reason = if decoded.negative {
        Some("negative target")
    } else if decoded.overflow {
        Some("target overflows 256 bits")
    } else if decoded.value.is_zero() {
        Some("zero target")
    } else {
        None
    };

    match reason {
        Some(reason) => {
            log::debug!("rejecting compact target {:#010x}: {}", bits, reason);
            Err(PrimitivesError::InvalidProofOfWork(format!(
                "{} ({:#010x})",
                reason, bits
            )))
        }
        None => Ok(decoded.value),
    }
}

/// Compact form of a non-negative target
pub fn compact_from_target(target: &UInt256) -> Result<u32> {
    target.encode_compact(false)
}

fn header_field(name: &str, value: Natural) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        PrimitivesError::InvalidProofOfWork(format!("{} {:#x} exceeds 32 bits", name, value))
    })
}

/// Serialize block header to its 80-byte consensus form
///
/// Fields wider than their 4-byte slot are rejected, never truncated.
pub fn serialize_header(header: &BlockHeader) -> Result<[u8; BLOCK_HEADER_SIZE]> {
    // Versions are signed on the wire but often carried as their u32 bit pattern.
    let version = u32::try_from(header.version)
        .or_else(|_| i32::try_from(header.version).map(|v| v as u32))
        .map_err(|_| {
            PrimitivesError::InvalidProofOfWork(format!(
                "version {} exceeds 32 bits",
                header.version
            ))
        })?;
    let timestamp = header_field("timestamp", header.timestamp)?;
    let bits = header_field("bits", header.bits)?;
    let nonce = header_field("nonce", header.nonce)?;

    let mut bytes = [0u8; BLOCK_HEADER_SIZE];

    bytes[0..4].copy_from_slice(&version.to_le_bytes());
    bytes[4..36].copy_from_slice(&header.prev_block_hash);
    bytes[36..68].copy_from_slice(&header.merkle_root);
    bytes[68..72].copy_from_slice(&timestamp.to_le_bytes());
    bytes[72..76].copy_from_slice(&bits.to_le_bytes());
    bytes[76..80].copy_from_slice(&nonce.to_le_bytes());

    Ok(bytes)
}

/// Block hash in internal (little-endian) byte order
pub fn block_hash(header: &BlockHeader) -> Result<Hash> {
    Ok(sha256d(&serialize_header(header)?))
}

/// CheckProofOfWork: ℋ → {true, false}
///
/// Formula: SHA256(SHA256(header)) <= ExpandTarget(header.bits)
pub fn check_proof_of_work(header: &BlockHeader) -> Result<bool> {
    let target = target_from_compact(header_field("bits", header.bits)?)?;

    let mut hash = block_hash(header)?;
    hash.reverse();
    let hash_value = UInt256::from_be_bytes(&hash);

    Ok(hash_value <= target)
}
