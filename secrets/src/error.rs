use thiserror::Error;

/// Failures seen by the pipeline when asking for a secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretsError {
    #[error("invalid unlock password")]
    InvalidUnlockPassword,

    #[error("invalid security password")]
    InvalidSecurityPassword,

    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    #[error("secrets channel timed out")]
    SecretsChannelTimeout,

    #[error("secrets channel closed")]
    ChannelClosed,

    #[error("secrets protocol error: {0}")]
    Protocol(String),
}

/// Failures of the encrypted vault on the holder side.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("invalid unlock password")]
    InvalidUnlockPassword,

    #[error("invalid security password")]
    InvalidSecurityPassword,

    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    #[error("wallet already exists: {0}")]
    DuplicateWallet(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("vault format error: {0}")]
    Format(String),

    #[error("vault I/O error: {0}")]
    Io(String),
}
