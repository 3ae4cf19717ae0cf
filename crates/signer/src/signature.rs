//! Oracle signing service
//!
//! One secp256k1 key, loaded once at startup from a hex secret, signs two
//! kinds of data:
//! - wallet-data batches (canonical payload, SHA-256, compact 64-byte `r || s`),
//! - chain transactions (the oracle account's `SignDoc`).
//!
//! Payload signatures are deterministic (RFC 6979) and low-S normalized, so
//! the same key and batch always produce the same signature bytes.

use aml_oracle_core::WalletRiskEntry;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use cosmrs::crypto::{secp256k1, PublicKey};
use cosmrs::tx::{Raw, SignDoc};
use cosmrs::AccountId;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use std::fmt;

use crate::canonical::{canonicalize, payload_digest, CanonicalSchema};
use crate::error::SignerError;

/// Length of a compact secp256k1 signature
pub const SIGNATURE_LEN: usize = 64;

/// Key type reported to the contract
pub const KEY_TYPE: &str = "secp256k1";

/// A signed wallet-data batch, ready for `oracle_data_update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub entries: Vec<WalletRiskEntry>,
    pub canonical_payload: Vec<u8>,
    pub signature: [u8; SIGNATURE_LEN],
}

impl SignedEnvelope {
    /// Signature encoded for transport
    pub fn signature_base64(&self) -> String {
        BASE64.encode(self.signature)
    }
}

/// Holder of the oracle private key
pub struct SigningService {
    key: SigningKey,
    schema: CanonicalSchema,
}

impl SigningService {
    /// Load from a hex-encoded 32-byte secret (optional `0x` prefix)
    pub fn from_hex(hex_key: &str) -> Result<Self, SignerError> {
        let trimmed = hex_key.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(trimmed)?;
        Self::from_bytes(&bytes)
    }

    /// Load from raw secret bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignerError> {
        if bytes.len() != 32 {
            return Err(SignerError::InvalidKeyLength(bytes.len()));
        }
        let key = SigningKey::from_slice(bytes).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self {
            key,
            schema: CanonicalSchema::default(),
        })
    }

    /// Generate a fresh random secret, hex-encoded (for provisioning a new oracle)
    pub fn generate_secret_hex() -> String {
        let mut rng = rand::thread_rng();
        hex::encode(SigningKey::random(&mut rng).to_bytes())
    }

    /// Select the canonical payload schema
    pub fn with_schema(mut self, schema: CanonicalSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> CanonicalSchema {
        self.schema
    }

    /// Verifying key
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.key.verifying_key()
    }

    /// Compressed SEC1 public key (33 bytes)
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.verifying_key().to_encoded_point(true).as_bytes().to_vec()
    }

    /// Compressed public key as base64 (the contract's `oracle_pubkey`)
    pub fn public_key_base64(&self) -> String {
        BASE64.encode(self.public_key_bytes())
    }

    /// Canonical payload for a batch, using the configured schema
    pub fn canonicalize(&self, entries: &[WalletRiskEntry]) -> Result<Vec<u8>, SignerError> {
        canonicalize(entries, self.schema)
    }

    /// Sign a payload: SHA-256 digest, then ECDSA over the prehash
    pub fn sign(&self, payload: &[u8]) -> Result<[u8; SIGNATURE_LEN], SignerError> {
        let digest = payload_digest(payload);
        let signature: Signature = self
            .key
            .sign_prehash(&digest)
            .map_err(|e| SignerError::Signature(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        let mut compact = [0u8; SIGNATURE_LEN];
        compact.copy_from_slice(&signature.to_bytes());
        Ok(compact)
    }

    /// Canonicalize and sign a batch
    pub fn sign_envelope(&self, entries: &[WalletRiskEntry]) -> Result<SignedEnvelope, SignerError> {
        let canonical_payload = self.canonicalize(entries)?;
        let signature = self.sign(&canonical_payload)?;
        Ok(SignedEnvelope {
            entries: entries.to_vec(),
            canonical_payload,
            signature,
        })
    }

    /// Verify a payload signature against this service's own key
    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), SignerError> {
        verify_with_key(self.verifying_key(), payload, signature)
    }

    fn tx_key(&self) -> Result<secp256k1::SigningKey, SignerError> {
        secp256k1::SigningKey::from_slice(&self.key.to_bytes()).map_err(|e| SignerError::InvalidKey(e.to_string()))
    }

    /// Public key in the chain's transaction encoding
    pub fn tx_public_key(&self) -> Result<PublicKey, SignerError> {
        Ok(self.tx_key()?.public_key())
    }

    /// Bech32 account address of the oracle key
    pub fn account_id(&self, prefix: &str) -> Result<AccountId, SignerError> {
        self.tx_public_key()?
            .account_id(prefix)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))
    }

    /// Sign a chain transaction
    pub fn sign_tx(&self, sign_doc: SignDoc) -> Result<Raw, SignerError> {
        let key = self.tx_key()?;
        sign_doc.sign(&key).map_err(|e| SignerError::Tx(e.to_string()))
    }
}

impl fmt::Debug for SigningService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningService")
            .field("public_key", &self.public_key_base64())
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Verify a payload signature against a compressed or uncompressed SEC1 public key
pub fn verify(payload: &[u8], signature: &[u8], public_key: &[u8]) -> Result<(), SignerError> {
    let key = VerifyingKey::from_sec1_bytes(public_key).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
    verify_with_key(&key, payload, signature)
}

fn verify_with_key(key: &VerifyingKey, payload: &[u8], signature: &[u8]) -> Result<(), SignerError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(SignerError::Verification(format!(
            "signature must be {} bytes, got {}",
            SIGNATURE_LEN,
            signature.len()
        )));
    }
    let signature = Signature::from_slice(signature).map_err(|e| SignerError::Verification(e.to_string()))?;
    let digest = payload_digest(payload);
    key.verify_prehash(&digest, &signature)
        .map_err(|e| SignerError::Verification(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_oracle_core::RiskScore;

    // Well-known test secret, never used outside tests
    const TEST_KEY: &str = "0101010101010101010101010101010101010101010101010101010101010101";

    fn entries() -> Vec<WalletRiskEntry> {
        vec![
            WalletRiskEntry::new("wasm1a", "sanctioned", RiskScore::new(90).unwrap()),
            WalletRiskEntry::new("wasm1b", "mixer", RiskScore::new(40).unwrap()),
        ]
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let secret = SigningService::generate_secret_hex();
        let a = SigningService::from_hex(&secret).unwrap();
        let b = SigningService::from_hex(&format!("0x{}", secret)).unwrap();
        assert_eq!(a.public_key_bytes(), b.public_key_bytes());
        assert_eq!(a.public_key_bytes().len(), 33);
    }

    #[test]
    fn test_rejects_bad_keys() {
        assert!(matches!(
            SigningService::from_hex("zz"),
            Err(SignerError::InvalidKeyHex(_))
        ));
        assert!(matches!(
            SigningService::from_hex("0102"),
            Err(SignerError::InvalidKeyLength(2))
        ));
        // Zero is not a valid secp256k1 scalar
        assert!(matches!(
            SigningService::from_hex(&"00".repeat(32)),
            Err(SignerError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = SigningService::from_hex(TEST_KEY).unwrap();
        let envelope = signer.sign_envelope(&entries()).unwrap();

        assert_eq!(envelope.signature.len(), SIGNATURE_LEN);
        assert!(verify(
            &envelope.canonical_payload,
            &envelope.signature,
            &signer.public_key_bytes()
        )
        .is_ok());
    }

    #[test]
    fn test_signature_is_deterministic() {
        let signer = SigningService::from_hex(TEST_KEY).unwrap();
        let first = signer.sign_envelope(&entries()).unwrap();
        let second = signer.sign_envelope(&entries()).unwrap();
        assert_eq!(first.signature, second.signature);
        assert_eq!(first.signature_base64(), second.signature_base64());
    }

    #[test]
    fn test_tampered_payload_fails_verification() {
        let signer = SigningService::from_hex(TEST_KEY).unwrap();
        let envelope = signer.sign_envelope(&entries()).unwrap();

        let mut tampered = entries();
        tampered[0].risk_score = RiskScore::new(10).unwrap();
        let tampered_payload = signer.canonicalize(&tampered).unwrap();

        assert!(signer.verify(&tampered_payload, &envelope.signature).is_err());
    }

    #[test]
    fn test_other_key_fails_verification() {
        let signer = SigningService::from_hex(TEST_KEY).unwrap();
        let other = SigningService::from_hex(&SigningService::generate_secret_hex()).unwrap();
        let envelope = signer.sign_envelope(&entries()).unwrap();

        assert!(verify(
            &envelope.canonical_payload,
            &envelope.signature,
            &other.public_key_bytes()
        )
        .is_err());
    }

    #[test]
    fn test_wrong_signature_length() {
        let signer = SigningService::from_hex(TEST_KEY).unwrap();
        assert!(matches!(
            signer.verify(b"payload", &[0u8; 65]),
            Err(SignerError::Verification(_))
        ));
    }

    #[test]
    fn test_account_id_uses_prefix() {
        let signer = SigningService::from_hex(TEST_KEY).unwrap();
        let account = signer.account_id("wasm").unwrap();
        assert!(account.to_string().starts_with("wasm1"));
        assert_eq!(account.prefix(), "wasm");
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let signer = SigningService::from_hex(TEST_KEY).unwrap();
        let debug = format!("{:?}", signer);
        assert!(!debug.contains(TEST_KEY));
        assert!(debug.contains("public_key"));
    }
}
