//! AML Oracle Signer
//!
//! Holds the oracle's secp256k1 key for the lifetime of the process and
//! exposes the only operations allowed on it:
//! - canonicalize + sign wallet-data batches (`SignedEnvelope`)
//! - sign chain transactions for the oracle account
//!
//! The key itself is never returned, logged, or serialized.

pub mod canonical;
pub mod error;
pub mod signature;

pub use canonical::{canonicalize, payload_digest, CanonicalSchema};
pub use error::SignerError;
pub use signature::{verify, SignedEnvelope, SigningService, KEY_TYPE, SIGNATURE_LEN};
