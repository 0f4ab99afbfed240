//! Local secp256k1 signer for the keeper's own account

use std::fs;
use std::path::Path;

use flood_types::proto::auth::Secp256k1PubKey;
use flood_types::proto::tx::SignDoc;
use flood_types::proto::Any;
use flood_types::{FloodError, FloodResult, SECP256K1_PUBKEY_TYPE_URL};
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey};
use prost::Message;

/// Holds the grantee's private key in memory
pub struct LocalSigner {
    key: SigningKey,
}

impl LocalSigner {
    /// Parse a 32-byte private key written as hex, with or without `0x`
    pub fn from_hex(hex_key: &str) -> FloodResult<Self> {
        let trimmed = hex_key.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let bytes = hex::decode(trimmed).map_err(|e| FloodError::signer(format!("invalid hex key: {}", e)))?;
        if bytes.len() != 32 {
            return Err(FloodError::signer(format!("expected 32 key bytes, got {}", bytes.len())));
        }

        let key = SigningKey::from_slice(&bytes).map_err(|e| FloodError::signer(format!("invalid key: {}", e)))?;
        Ok(Self { key })
    }

    /// Read a hex key file
    pub fn from_file(path: impl AsRef<Path>) -> FloodResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| FloodError::signer(format!("failed to read key file {}: {}", path.display(), e)))?;
        Self::from_hex(&content)
    }

    /// Compressed SEC1 public key
    pub fn public_key(&self) -> Vec<u8> {
        self.key.verifying_key().to_encoded_point(true).as_bytes().to_vec()
    }

    /// Public key packed for a signer info
    pub fn public_key_any(&self) -> Any {
        Any {
            type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
            value: Secp256k1PubKey { key: self.public_key() }.encode_to_vec(),
        }
    }

    /// SIGN_MODE_DIRECT signature: SHA-256 over the encoded sign doc, low-S, `r || s`
    pub fn sign(&self, sign_doc: &SignDoc) -> Vec<u8> {
        let signature: Signature = self.key.sign(&sign_doc.encode_to_vec());
        let signature = signature.normalize_s().unwrap_or(signature);
        signature.to_bytes().to_vec()
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("public_key", &hex::encode(self.public_key()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::signature::Verifier;
    use k256::ecdsa::VerifyingKey;
    use std::io::Write;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn sign_doc() -> SignDoc {
        SignDoc {
            body_bytes: vec![1, 2, 3],
            auth_info_bytes: vec![4, 5, 6],
            chain_id: "osmosis-1".to_string(),
            account_number: 42,
        }
    }

    #[test]
    fn test_public_key_is_compressed() {
        let signer = LocalSigner::from_hex(KEY).unwrap();
        let key = signer.public_key();
        assert_eq!(key.len(), 33);
        assert!(key[0] == 0x02 || key[0] == 0x03);

        let any = signer.public_key_any();
        assert_eq!(any.type_url, SECP256K1_PUBKEY_TYPE_URL);
        assert_eq!(Secp256k1PubKey::decode(any.value.as_slice()).unwrap().key, key);
    }

    #[test]
    fn test_signature_verifies_and_is_low_s() {
        let signer = LocalSigner::from_hex(KEY).unwrap();
        let doc = sign_doc();
        let bytes = signer.sign(&doc);
        assert_eq!(bytes.len(), 64);

        let signature = Signature::from_slice(&bytes).unwrap();
        assert!(signature.normalize_s().is_none());

        let verifying_key = VerifyingKey::from_sec1_bytes(&signer.public_key()).unwrap();
        assert!(verifying_key.verify(&doc.encode_to_vec(), &signature).is_ok());
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = LocalSigner::from_hex(KEY).unwrap();
        assert_eq!(signer.sign(&sign_doc()), signer.sign(&sign_doc()));
    }

    #[test]
    fn test_rejects_bad_keys() {
        assert!(matches!(LocalSigner::from_hex("zz"), Err(FloodError::Signer { .. })));
        assert!(LocalSigner::from_hex("abcd").is_err());
        assert!(LocalSigner::from_hex(&"00".repeat(32)).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", KEY).unwrap();
        let signer = LocalSigner::from_file(file.path()).unwrap();
        assert_eq!(signer.public_key(), LocalSigner::from_hex(KEY).unwrap().public_key());

        assert!(LocalSigner::from_file("/nonexistent/keeper.key").is_err());
    }
}
