//! HD derivation of secp256k1 signing keys.

use bip32::XPrv;
use fbx_types::Mnemonic;
use k256::elliptic_curve::sec1::ToEncodedPoint;

pub use k256::ecdsa::SigningKey;

use crate::error::CryptoError;
use crate::mnemonic::seed_from_mnemonic;
use crate::path::HdPath;

/// Derive the secp256k1 signing key at `path` from a mnemonic.
///
/// The intermediate seed is zeroized before returning.
pub fn derive_signing_key(mnemonic: &Mnemonic, path: &HdPath) -> Result<SigningKey, CryptoError> {
    let seed = seed_from_mnemonic(mnemonic)?;
    let xprv = XPrv::derive_from_path(&seed[..], &path.to_bip32()?)
        .map_err(|e| CryptoError::Derivation(e.to_string()))?;
    Ok(xprv.private_key().clone())
}

/// The 33-byte SEC1 compressed public key for a signing key.
pub fn compressed_public_key(key: &SigningKey) -> [u8; 33] {
    let point = key.verifying_key().to_encoded_point(true);
    let mut out = [0u8; 33];
    out.copy_from_slice(point.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::account_address;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn derivation_is_deterministic() {
        let m = Mnemonic::new(TEST_MNEMONIC);
        let k1 = derive_signing_key(&m, &HdPath::new(118, 0)).unwrap();
        let k2 = derive_signing_key(&m, &HdPath::new(118, 0)).unwrap();
        assert_eq!(compressed_public_key(&k1), compressed_public_key(&k2));
    }

    #[test]
    fn account_index_changes_key() {
        let m = Mnemonic::new(TEST_MNEMONIC);
        let k0 = derive_signing_key(&m, &HdPath::new(118, 0)).unwrap();
        let k1 = derive_signing_key(&m, &HdPath::new(118, 1)).unwrap();
        assert_ne!(compressed_public_key(&k0), compressed_public_key(&k1));
    }

    #[test]
    fn derived_key_yields_cosmos_address() {
        let m = Mnemonic::new(TEST_MNEMONIC);
        let key = derive_signing_key(&m, &HdPath::new(118, 0)).unwrap();
        let pubkey = compressed_public_key(&key);
        assert!(pubkey[0] == 0x02 || pubkey[0] == 0x03);
        let address = account_address("cosmos", &pubkey).unwrap();
        assert!(address.starts_with("cosmos1"));
        assert_eq!(address.len(), 45);
    }

    #[test]
    fn invalid_mnemonic_fails() {
        let result = derive_signing_key(&Mnemonic::new("invalid words here"), &HdPath::new(118, 0));
        assert!(matches!(result, Err(CryptoError::InvalidMnemonic(_))));
    }
}
