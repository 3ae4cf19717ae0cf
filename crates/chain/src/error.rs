//! Chain client error types

use aml_oracle_signer::SignerError;
use thiserror::Error;

/// Chain-related errors
#[derive(Debug, Error)]
pub enum ChainError {
    /// Node unreachable, connection reset, request timeout
    #[error("Chain transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Node answered with a non-success HTTP status
    #[error("Chain endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode chain response: {0}")]
    Decode(String),

    /// Transaction rejected by the node or the contract (non-zero result code)
    #[error("Transaction rejected (code {code}): {log}")]
    Rejected {
        code: u32,
        log: String,
        tx_hash: Option<String>,
    },

    /// Oracle key could not sign the transaction
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    /// Broadcast accepted but never observed in a block
    #[error("Transaction {tx_hash} not included after {waited_ms}ms")]
    InclusionTimeout { tx_hash: String, waited_ms: u64 },

    /// Invalid address, chain id, gas price, or endpoint
    #[error("Invalid chain configuration: {0}")]
    Config(String),
}

/// Result type for chain operations
pub type ChainResult<T> = Result<T, ChainError>;

impl ChainError {
    /// Create a rejection error
    pub fn rejected(code: u32, log: impl Into<String>) -> Self {
        ChainError::Rejected {
            code,
            log: log.into(),
            tx_hash: None,
        }
    }

    /// Contract or node refused the transaction; retrying the same message will not help
    pub fn is_rejection(&self) -> bool {
        matches!(self, ChainError::Rejected { .. })
    }

    /// The node could not be reached or did not answer in time
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChainError::Transport(_) | ChainError::Status { .. } | ChainError::InclusionTimeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_error() {
        let err = ChainError::rejected(5, "insufficient funds");
        assert!(err.is_rejection());
        assert!(!err.is_transport());
        assert!(err.to_string().contains("insufficient funds"));
        assert!(err.to_string().contains("code 5"));
    }

    #[test]
    fn test_inclusion_timeout_is_transport() {
        let err = ChainError::InclusionTimeout {
            tx_hash: "ABC".to_string(),
            waited_ms: 30_000,
        };
        assert!(err.is_transport());
        assert!(err.to_string().contains("30000ms"));
    }
}
