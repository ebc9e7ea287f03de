use fbx_rpc::BroadcastError;
use fbx_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("hardware device not connected: {0}")]
    DeviceNotConnected(String),

    #[error("hardware device rejected the request: {0}")]
    DeviceRejected(String),

    #[error("invalid signature from signer")]
    InvalidSignature,

    #[error("message signer {found} does not match signing account {expected}")]
    SignerMismatch { expected: String, found: String },

    #[error("unsupported ecosystem: {0}")]
    UnsupportedEcosystem(String),

    #[error("transaction encoding failed: {0}")]
    Encoding(#[from] ValidationError),
}

/// Failure of [`crate::SigningClient::sign_and_broadcast`], split by the step
/// that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignAndBroadcastError {
    /// Connecting to the chain or reading chain id and account sequence.
    #[error("chain query failed: {0}")]
    Sequencing(BroadcastError),

    #[error(transparent)]
    Signing(SigningError),

    #[error("broadcast failed: {0}")]
    Broadcast(BroadcastError),
}

impl From<SigningError> for SignAndBroadcastError {
    fn from(e: SigningError) -> Self {
        Self::Signing(e)
    }
}
