use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::BroadcastError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: String,
    pub account_number: u64,
    pub sequence: u64,
}

/// Node's answer to a synchronous broadcast (CheckTx result).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub code: u32,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub log: String,
    pub hash: String,
}

/// Outcome reported to the caller on success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResult {
    pub hash: String,
    pub raw_log: String,
    pub success: bool,
    pub code: u32,
}

impl TxResponse {
    /// A non-zero code is a rejection by the chain.
    pub fn into_result(self) -> Result<BroadcastResult, BroadcastError> {
        if self.code != 0 {
            return Err(BroadcastError::Rejected {
                code: self.code,
                codespace: self.codespace,
                reason: self.log,
            });
        }
        Ok(BroadcastResult {
            hash: self.hash,
            raw_log: self.log,
            success: true,
            code: 0,
        })
    }
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Network identifier reported by the node, e.g. `cosmoshub-4`.
    async fn chain_id(&self) -> Result<String, BroadcastError>;

    /// `None` when the chain has never seen the address.
    async fn account(&self, address: &str) -> Result<Option<AccountInfo>, BroadcastError>;

    async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<TxResponse, BroadcastError>;
}

/// Opens a client for an RPC endpoint taken from the registry.
pub trait ChainConnector: Send + Sync {
    fn connect(&self, endpoint: &str) -> Result<Arc<dyn ChainClient>, BroadcastError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_code_is_success() {
        let result = TxResponse {
            code: 0,
            codespace: String::new(),
            log: "[]".into(),
            hash: "ABCD".into(),
        }
        .into_result()
        .unwrap();
        assert!(result.success);
        assert_eq!(result.hash, "ABCD");
        assert_eq!(result.raw_log, "[]");
    }

    #[test]
    fn nonzero_code_is_rejection() {
        let err = TxResponse {
            code: 5,
            codespace: "sdk".into(),
            log: "insufficient funds".into(),
            hash: "ABCD".into(),
        }
        .into_result()
        .unwrap_err();
        assert_eq!(
            err,
            BroadcastError::Rejected {
                code: 5,
                codespace: "sdk".into(),
                reason: "insufficient funds".into()
            }
        );
    }
}
