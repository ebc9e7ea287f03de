//! Cryptographic primitives for the FBX signing pipeline.
//!
//! - **BIP39** mnemonic validation and seed derivation
//! - **BIP32** secp256k1 key derivation along `m/44'/<coin>'/0'/0/<index>`
//! - **ECDSA (secp256k1)** signing over SHA-256 with low-S normalization
//! - Cosmos account addresses: bech32 of `ripemd160(sha256(pubkey))`

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod path;
pub mod sign;

pub use address::{account_address, decode_address, validate_address};
pub use error::CryptoError;
pub use hash::{hash160, sha256};
pub use keys::{compressed_public_key, derive_signing_key, SigningKey};
pub use mnemonic::{generate_mnemonic, seed_from_mnemonic, validate_mnemonic};
pub use path::HdPath;
pub use sign::{compact_signature, sign_bytes, verify_signature};
