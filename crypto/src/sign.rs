//! secp256k1 ECDSA signing and verification over SHA-256.
//!
//! Signatures are always 64-byte compact `r || s` with low-S normalization,
//! which is the only form Cosmos SDK chains accept.

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};

use crate::error::CryptoError;

/// Sign `message` (hashed with SHA-256 internally).
pub fn sign_bytes(key: &SigningKey, message: &[u8]) -> [u8; 64] {
    let signature: Signature = key.sign(message);
    let signature = signature.normalize_s().unwrap_or(signature);
    let mut out = [0u8; 64];
    out.copy_from_slice(&signature.to_bytes());
    out
}

/// Verify a compact signature against a compressed public key.
pub fn verify_signature(public_key: &[u8; 33], message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}

/// Convert a device-produced signature (DER or 64-byte compact) to the
/// normalized compact form.
pub fn compact_signature(raw: &[u8]) -> Result<[u8; 64], CryptoError> {
    let signature = if raw.len() == 64 {
        Signature::from_slice(raw)
    } else {
        Signature::from_der(raw)
    }
    .map_err(|_| CryptoError::InvalidSignature)?;
    let signature = signature.normalize_s().unwrap_or(signature);
    let mut out = [0u8; 64];
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::compressed_public_key;

    fn test_key(seed: u8) -> SigningKey {
        SigningKey::from_slice(&[seed; 32]).unwrap()
    }

    #[test]
    fn sign_and_verify() {
        let key = test_key(7);
        let pubkey = compressed_public_key(&key);
        let sig = sign_bytes(&key, b"sign doc bytes");
        assert!(verify_signature(&pubkey, b"sign doc bytes", &sig));
    }

    #[test]
    fn wrong_message_fails() {
        let key = test_key(7);
        let pubkey = compressed_public_key(&key);
        let sig = sign_bytes(&key, b"correct");
        assert!(!verify_signature(&pubkey, b"wrong", &sig));
    }

    #[test]
    fn wrong_key_fails() {
        let sig = sign_bytes(&test_key(1), b"msg");
        assert!(!verify_signature(&compressed_public_key(&test_key(2)), b"msg", &sig));
    }

    #[test]
    fn signatures_are_deterministic_and_low_s() {
        let key = test_key(9);
        let a = sign_bytes(&key, b"payload");
        let b = sign_bytes(&key, b"payload");
        assert_eq!(a, b);
        let parsed = Signature::from_slice(&a).unwrap();
        assert!(parsed.normalize_s().is_none());
    }

    #[test]
    fn der_signatures_are_converted() {
        let key = test_key(4);
        let signature: Signature = key.sign(b"device payload");
        let der = signature.to_der();
        let compact = compact_signature(der.as_bytes()).unwrap();
        assert!(verify_signature(&compressed_public_key(&key), b"device payload", &compact));
    }

    #[test]
    fn garbage_signature_rejected() {
        assert!(compact_signature(&[0u8; 10]).is_err());
    }
}
