//! Bitcoin consensus constants used by the numeric and key-tweaking primitives

/// Number of 32-bit words in a [`crate::UInt256`]
pub const UINT256_WORDS: usize = 8;

/// Width of a [`crate::UInt256`] in bytes
pub const UINT256_BYTES: usize = 32;

/// Sign bit of a compact target
pub const COMPACT_SIGN_BIT: u32 = 0x0080_0000;

/// Mantissa bits of a compact target (sign bit excluded)
pub const COMPACT_MANTISSA_MASK: u32 = 0x007f_ffff;

/// Maximum target (minimum difficulty), genesis block nBits
pub const MAX_TARGET: u32 = 0x1d00ffff;

/// Tag used for the BIP341 key tweak
pub const TAP_TWEAK_TAG: &str = "TapTweak";

/// Compressed point prefix for an even y-coordinate
pub const EVEN_Y_PREFIX: u8 = 0x02;

/// Compressed point prefix for an odd y-coordinate
pub const ODD_Y_PREFIX: u8 = 0x03;

/// Length of a compressed public key
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Length of an x-only public key
pub const XONLY_PUBLIC_KEY_SIZE: usize = 32;

/// Taproot output script: OP_1 <32-byte-key>
pub const TAPROOT_SCRIPT_PREFIX: u8 = 0x51; // OP_1

/// OP_PUSHBYTES_32
pub const TAPROOT_PUSH_32: u8 = 0x20;

/// Full length of a P2TR output script
pub const TAPROOT_SCRIPT_SIZE: usize = 34;

/// Serialized block header size
pub const BLOCK_HEADER_SIZE: usize = 80;
