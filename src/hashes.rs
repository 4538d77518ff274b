//! Hash constructions used by the primitives

use crate::types::Hash;
use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};
use sha2::{Digest, Sha256};

/// BIP340 tagged hash: SHA256(SHA256(tag) || SHA256(tag) || data)
pub fn tagged_hash(data: &[u8], tag: &str) -> Hash {
    let tag_hash = Sha256::digest(tag.as_bytes());

    let mut hasher = Sha256::new();
    hasher.update(&tag_hash);
    hasher.update(&tag_hash);
    hasher.update(data);

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    hash
}

/// Double SHA256
pub fn sha256d(data: &[u8]) -> Hash {
    let mut engine = sha256d::Hash::engine();
    engine.input(data);
    sha256d::Hash::from_engine(engine).into_inner()
}
