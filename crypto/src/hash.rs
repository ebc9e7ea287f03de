//! SHA-256 and RIPEMD-160 digests used for signing and address derivation.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// `ripemd160(sha256(data))`, the account-id hash of a public key.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut output = [0u8; 20];
    output.copy_from_slice(&Ripemd160::digest(sha256(data)));
    output
}
