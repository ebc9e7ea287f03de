//! RPC error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid node response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("transaction rejected ({codespace}/{code}): {reason}")]
    Rejected {
        code: u32,
        codespace: String,
        reason: String,
    },

    #[error("account not found on chain: {0}")]
    AccountNotFound(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NetworkError::Timeout
        } else if e.is_decode() {
            NetworkError::InvalidResponse(e.to_string())
        } else {
            NetworkError::Unreachable(e.to_string())
        }
    }
}
