//! Bech32 account addresses.
//!
//! Address format: `bech32(prefix, ripemd160(sha256(compressed_pubkey)))`,
//! e.g. `cosmos1…` for the Cosmos Hub and `desmos1…` for Desmos.

use bech32::{FromBase32, ToBase32, Variant};

use crate::error::CryptoError;
use crate::hash::hash160;

/// Derive the account address for a 33-byte compressed public key.
pub fn account_address(prefix: &str, public_key: &[u8; 33]) -> Result<String, CryptoError> {
    bech32::encode(prefix, hash160(public_key).to_base32(), Variant::Bech32)
        .map_err(|e| CryptoError::Address(e.to_string()))
}

/// Decode an address into its prefix and 20-byte payload.
pub fn decode_address(address: &str) -> Result<(String, Vec<u8>), CryptoError> {
    let (hrp, data, variant) =
        bech32::decode(address).map_err(|e| CryptoError::Address(e.to_string()))?;
    if variant != Variant::Bech32 {
        return Err(CryptoError::Address("expected bech32, got bech32m".to_string()));
    }
    let bytes = Vec::<u8>::from_base32(&data).map_err(|e| CryptoError::Address(e.to_string()))?;
    Ok((hrp, bytes))
}

/// Check that `address` is a well-formed bech32 address with the given prefix.
pub fn validate_address(address: &str, prefix: &str) -> bool {
    matches!(decode_address(address), Ok((hrp, bytes)) if hrp == prefix && bytes.len() == 20)
}
