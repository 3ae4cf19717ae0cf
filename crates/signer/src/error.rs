//! Signer errors

use thiserror::Error;

/// Errors that can occur while loading the oracle key or signing
#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Invalid key hex: {0}")]
    InvalidKeyHex(#[from] hex::FromHexError),

    #[error("Key must be 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Invalid secp256k1 key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    Signature(String),

    #[error("Signature verification failed: {0}")]
    Verification(String),

    #[error("Canonical payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Chain transaction signing failed: {0}")]
    Tx(String),
}
