//! Error types for consensus primitives

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrimitivesError {
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Compact encoding overflow: {0}")]
    CompactOverflow(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Invalid proof of work: {0}")]
    InvalidProofOfWork(String),

    #[error("Curve operation failed: {0}")]
    Curve(#[from] secp256k1::Error),
}

pub type Result<T> = std::result::Result<T, PrimitivesError>;
