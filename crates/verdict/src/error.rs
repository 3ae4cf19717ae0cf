//! AML decision service errors
//!
//! These never leave the crate as failures: every one of them is turned into
//! the fail-safe verdict by the provider.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmlError {
    /// Connection failure or timeout
    #[error("AML service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AML service returned status {status}")]
    Status { status: u16 },

    #[error("AML service response undecodable: {0}")]
    Decode(String),
}

pub type AmlResult<T> = Result<T, AmlError>;
