//! Canonical payload for wallet-data batch signatures
//!
//! The contract (or any verifier) recomputes the payload from the entries it
//! receives, hashes it and checks the oracle signature, so the projection
//! below is the verifier contract and must never change silently:
//!
//! - every entry becomes a JSON array with a fixed field order,
//! - the outer array keeps the submission order,
//! - serialization is compact (no whitespace), UTF-8.

use aml_oracle_core::WalletRiskEntry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use strum_macros::{Display, EnumString};

use crate::error::SignerError;

/// Which entry fields are part of the signed payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CanonicalSchema {
    /// `[wallet, reason, risk_score]`
    #[default]
    WalletReasonScore,
    /// `[wallet, reason]`
    WalletReason,
}

impl CanonicalSchema {
    fn project(&self, entry: &WalletRiskEntry) -> Value {
        match self {
            CanonicalSchema::WalletReasonScore => {
                json!([entry.wallet, entry.reason, entry.risk_score.value()])
            }
            CanonicalSchema::WalletReason => json!([entry.wallet, entry.reason]),
        }
    }
}

/// Serialize entries to the canonical byte payload
pub fn canonicalize(entries: &[WalletRiskEntry], schema: CanonicalSchema) -> Result<Vec<u8>, SignerError> {
    let rows: Vec<Value> = entries.iter().map(|entry| schema.project(entry)).collect();
    Ok(serde_json::to_vec(&rows)?)
}

/// SHA-256 digest of a payload (the signature pre-image)
pub fn payload_digest(payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aml_oracle_core::RiskScore;

    fn entry(wallet: &str, reason: &str, score: u64) -> WalletRiskEntry {
        WalletRiskEntry::new(wallet, reason, RiskScore::new(score).unwrap())
    }

    #[test]
    fn test_canonical_payload_layout() {
        let payload = canonicalize(&[entry("wasm1a", "sanctioned", 90)], CanonicalSchema::default()).unwrap();
        assert_eq!(payload, br#"[["wasm1a","sanctioned",90]]"#.to_vec());
    }

    #[test]
    fn test_wallet_reason_schema_drops_score() {
        let payload = canonicalize(&[entry("wasm1a", "sanctioned", 90)], CanonicalSchema::WalletReason).unwrap();
        assert_eq!(payload, br#"[["wasm1a","sanctioned"]]"#.to_vec());
    }

    #[test]
    fn test_canonicalize_deterministic() {
        let entries = vec![entry("wasm1a", "sanctioned", 90), entry("wasm1b", "mixer", 40)];
        let first = canonicalize(&entries, CanonicalSchema::default()).unwrap();
        let second = canonicalize(&entries.clone(), CanonicalSchema::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_canonicalize_preserves_order() {
        let a = entry("wasm1a", "sanctioned", 90);
        let b = entry("wasm1b", "mixer", 40);
        let ab = canonicalize(&[a.clone(), b.clone()], CanonicalSchema::default()).unwrap();
        let ba = canonicalize(&[b, a], CanonicalSchema::default()).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_input_field_order_is_irrelevant() {
        let one: Vec<WalletRiskEntry> =
            serde_json::from_str(r#"[{"wallet":"wasm1a","reason":"ofac","risk_score":70}]"#).unwrap();
        let two: Vec<WalletRiskEntry> =
            serde_json::from_str(r#"[{"risk_score":70, "reason":"ofac",  "wallet":"wasm1a"}]"#).unwrap();
        assert_eq!(
            canonicalize(&one, CanonicalSchema::default()).unwrap(),
            canonicalize(&two, CanonicalSchema::default()).unwrap()
        );
    }

    #[test]
    fn test_any_field_change_changes_payload() {
        let base = canonicalize(&[entry("wasm1a", "ofac", 70)], CanonicalSchema::default()).unwrap();
        for changed in [
            entry("wasm1b", "ofac", 70),
            entry("wasm1a", "ofaC", 70),
            entry("wasm1a", "ofac", 71),
        ] {
            let other = canonicalize(&[changed], CanonicalSchema::default()).unwrap();
            assert_ne!(base, other);
        }
    }

    #[test]
    fn test_reason_is_escaped() {
        let payload = canonicalize(&[entry("wasm1a", "say \"hi\"", 0)], CanonicalSchema::default()).unwrap();
        assert_eq!(payload, br#"[["wasm1a","say \"hi\"",0]]"#.to_vec());
    }

    #[test]
    fn test_schema_from_str() {
        assert_eq!(
            "wallet_reason".parse::<CanonicalSchema>().unwrap(),
            CanonicalSchema::WalletReason
        );
        assert_eq!(CanonicalSchema::WalletReasonScore.to_string(), "wallet_reason_score");
    }

    #[test]
    fn test_digest_deterministic() {
        assert_eq!(payload_digest(b"abc"), payload_digest(b"abc"));
        assert_eq!(
            hex::encode(payload_digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
