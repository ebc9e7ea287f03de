//! BIP39 mnemonic validation and seed derivation.

use bip39::Mnemonic as Bip39Mnemonic;
use fbx_types::Mnemonic;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Generate a new 24-word BIP39 mnemonic from 256-bit entropy.
pub fn generate_mnemonic() -> Result<Mnemonic, CryptoError> {
    let mut entropy = Zeroizing::new([0u8; 32]);
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut entropy[..]);
    let mnemonic = Bip39Mnemonic::from_entropy(&entropy[..])
        .map_err(|e| CryptoError::Derivation(e.to_string()))?;
    Ok(Mnemonic::new(mnemonic.to_string()))
}

/// Validate that a phrase is a well-formed BIP39 mnemonic (word list and checksum).
pub fn validate_mnemonic(phrase: &str) -> bool {
    Bip39Mnemonic::parse_normalized(phrase).is_ok()
}

/// Derive the 64-byte BIP39 seed (empty passphrase).
pub fn seed_from_mnemonic(mnemonic: &Mnemonic) -> Result<Zeroizing<[u8; 64]>, CryptoError> {
    let parsed = Bip39Mnemonic::parse_normalized(mnemonic.expose_phrase())
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(parsed.to_seed_normalized("")))
}
