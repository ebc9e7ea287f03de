use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature encoding")]
    InvalidSignature,

    #[error("address encoding failed: {0}")]
    Address(String),
}
