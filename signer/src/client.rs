use fbx_messages::{Sequencing, TransactionRequest};
use fbx_rpc::{BroadcastError, BroadcastResult, ChainClient, NetworkError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{SignAndBroadcastError, SigningError};
use crate::signer::OfflineSigner;

/// Encoded `TxRaw` bytes ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    bytes: Vec<u8>,
    chain_id: String,
}

impl SignedTx {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }
}

/// A signer bound to one chain. Holds no reference to the raw key source.
pub struct SigningClient {
    signer: Box<dyn OfflineSigner>,
    chain: Arc<dyn ChainClient>,
    expected_chain_id: Option<String>,
    timeout: Duration,
}

async fn bounded<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T, BroadcastError>>,
) -> Result<T, BroadcastError> {
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or(Err(BroadcastError::Network(NetworkError::Timeout)))
}

impl SigningClient {
    pub(crate) fn new(
        signer: Box<dyn OfflineSigner>,
        chain: Arc<dyn ChainClient>,
        expected_chain_id: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            signer,
            chain,
            expected_chain_id,
            timeout,
        }
    }

    pub fn address(&self) -> &str {
        self.signer.address()
    }

    pub fn public_key(&self) -> &[u8; 33] {
        self.signer.public_key()
    }

    async fn sequencing(&self) -> Result<Sequencing, BroadcastError> {
        let chain_id = bounded(self.timeout, self.chain.chain_id()).await?;
        if let Some(expected) = &self.expected_chain_id {
            if *expected != chain_id {
                return Err(BroadcastError::Network(NetworkError::InvalidResponse(format!(
                    "node reports chain {chain_id}, expected {expected}"
                ))));
            }
        }
        let account = bounded(self.timeout, self.chain.account(self.address()))
            .await?
            .ok_or_else(|| BroadcastError::AccountNotFound(self.address().to_string()))?;
        Ok(Sequencing {
            account_number: account.account_number,
            sequence: account.sequence,
            chain_id,
        })
    }

    /// Sign `request` without submitting it. Each message must be signed by
    /// this client's address.
    pub async fn sign(&self, request: &TransactionRequest) -> Result<SignedTx, SignAndBroadcastError> {
        if let Some(msg) = request.messages().iter().find(|m| m.signer() != self.address()) {
            return Err(SigningError::SignerMismatch {
                expected: self.address().to_string(),
                found: msg.signer().to_string(),
            }
            .into());
        }

        let sequencing = match request.sequencing() {
            Some(s) => s.clone(),
            None => self
                .sequencing()
                .await
                .map_err(SignAndBroadcastError::Sequencing)?,
        };
        debug!(
            chain_id = %sequencing.chain_id,
            account_number = sequencing.account_number,
            sequence = sequencing.sequence,
            mode = ?self.signer.sign_mode(),
            "signing transaction"
        );
        let bytes = self.signer.sign(request, &sequencing).await?;
        Ok(SignedTx {
            bytes,
            chain_id: sequencing.chain_id,
        })
    }

    /// Submit a transaction produced by [`Self::sign`].
    pub async fn broadcast(&self, tx: &SignedTx) -> Result<BroadcastResult, SignAndBroadcastError> {
        let response = bounded(self.timeout, self.chain.broadcast_tx(&tx.bytes))
            .await
            .map_err(SignAndBroadcastError::Broadcast)?;
        let result = response
            .into_result()
            .map_err(SignAndBroadcastError::Broadcast)?;
        info!(hash = %result.hash, chain_id = %tx.chain_id, "transaction accepted");
        Ok(result)
    }

    pub async fn sign_and_broadcast(
        &self,
        request: &TransactionRequest,
    ) -> Result<BroadcastResult, SignAndBroadcastError> {
        let tx = self.sign(request).await?;
        self.broadcast(&tx).await
    }
}
