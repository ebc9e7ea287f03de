use fbx_rpc::{BroadcastError, NetworkError};
use fbx_secrets::SecretsError;
use fbx_signer::{SignAndBroadcastError, SigningError};
use fbx_types::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orchestrator::SubmissionState;

/// Coarse failure class reported to UI collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    Authorization,
    Signing,
    Network,
    ChainRejection,
    Cancelled,
}

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Authorization(#[from] SecretsError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("transaction rejected ({codespace}/{code}): {reason}")]
    ChainRejection {
        code: u32,
        codespace: String,
        reason: String,
    },

    #[error("account not found on chain: {0}")]
    AccountNotFound(String),

    #[error("submission cancelled: deadline exceeded")]
    Cancelled,
}

impl TransactionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::Signing(_) => ErrorKind::Signing,
            Self::Network(_) => ErrorKind::Network,
            Self::ChainRejection { .. } | Self::AccountNotFound(_) => ErrorKind::ChainRejection,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl From<BroadcastError> for TransactionError {
    fn from(e: BroadcastError) -> Self {
        match e {
            BroadcastError::Network(e) => Self::Network(e),
            BroadcastError::Rejected {
                code,
                codespace,
                reason,
            } => Self::ChainRejection {
                code,
                codespace,
                reason,
            },
            BroadcastError::AccountNotFound(address) => Self::AccountNotFound(address),
        }
    }
}

impl From<SignAndBroadcastError> for TransactionError {
    fn from(e: SignAndBroadcastError) -> Self {
        match e {
            SignAndBroadcastError::Sequencing(e) | SignAndBroadcastError::Broadcast(e) => e.into(),
            SignAndBroadcastError::Signing(e) => e.into(),
        }
    }
}

/// `data` of a `transactionFail` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub submission_id: u64,
    pub kind: ErrorKind,
    /// Stage the submission was in when it failed.
    pub stage: SubmissionState,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Parse(String),

    #[error("config I/O error: {0}")]
    Io(String),

    #[error("invalid chain override: {0}")]
    Chain(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_errors_split_into_network_and_rejection() {
        let network: TransactionError = BroadcastError::Network(NetworkError::Timeout).into();
        assert_eq!(network.kind(), ErrorKind::Network);

        let rejected: TransactionError = BroadcastError::Rejected {
            code: 5,
            codespace: "sdk".into(),
            reason: "insufficient funds".into(),
        }
        .into();
        assert_eq!(rejected.kind(), ErrorKind::ChainRejection);
        assert!(rejected.to_string().contains("insufficient funds"));
    }

    #[test]
    fn secrets_failures_are_authorization() {
        for e in [
            SecretsError::InvalidUnlockPassword,
            SecretsError::InvalidSecurityPassword,
            SecretsError::SecretsChannelTimeout,
            SecretsError::ChannelClosed,
        ] {
            assert_eq!(TransactionError::from(e).kind(), ErrorKind::Authorization);
        }
    }

    #[test]
    fn payload_wire_shape() {
        let payload = ErrorPayload {
            submission_id: 4,
            kind: ErrorKind::ChainRejection,
            stage: SubmissionState::Broadcasting,
            message: "rejected".into(),
        };
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            serde_json::json!({
                "submissionId": 4,
                "kind": "chainRejection",
                "stage": "broadcasting",
                "message": "rejected"
            })
        );
    }
}
