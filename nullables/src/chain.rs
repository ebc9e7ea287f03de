//! Nullable chain node: records broadcasts instead of sending them.

use async_trait::async_trait;
use fbx_rpc::{AccountInfo, BroadcastError, ChainClient, ChainConnector, NetworkError, TxResponse};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::lock;

/// A scripted chain node.
///
/// Unknown accounts look fresh (number 0, sequence 0) unless
/// [`NullChain::strict_accounts`] is set. Broadcasts succeed with the
/// uppercase SHA-256 of the tx bytes as hash unless a response is queued.
pub struct NullChain {
    chain_id: String,
    accounts: Mutex<HashMap<String, AccountInfo>>,
    strict: AtomicBool,
    unreachable: AtomicBool,
    hang: AtomicBool,
    responses: Mutex<VecDeque<Result<TxResponse, BroadcastError>>>,
    broadcasts: Mutex<Vec<Vec<u8>>>,
    calls: AtomicUsize,
}

impl NullChain {
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            accounts: Mutex::new(HashMap::new()),
            strict: AtomicBool::new(false),
            unreachable: AtomicBool::new(false),
            hang: AtomicBool::new(false),
            responses: Mutex::new(VecDeque::new()),
            broadcasts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_account(self, address: &str, account_number: u64, sequence: u64) -> Self {
        lock(&self.accounts).insert(
            address.to_string(),
            AccountInfo {
                address: address.to_string(),
                account_number,
                sequence,
            },
        );
        self
    }

    /// Report unknown accounts as missing.
    pub fn strict_accounts(self) -> Self {
        self.strict.store(true, Ordering::SeqCst);
        self
    }

    /// Fail every call with `NetworkError::Unreachable`.
    pub fn unreachable(self) -> Self {
        self.unreachable.store(true, Ordering::SeqCst);
        self
    }

    /// Never answer broadcasts.
    pub fn hang_on_broadcast(self) -> Self {
        self.hang.store(true, Ordering::SeqCst);
        self
    }

    /// Queue the outcome of the next broadcast.
    pub fn respond_with(&self, response: Result<TxResponse, BroadcastError>) {
        lock(&self.responses).push_back(response);
    }

    /// Raw bytes of every broadcast received, in order.
    pub fn broadcasts(&self) -> Vec<Vec<u8>> {
        lock(&self.broadcasts).clone()
    }

    /// Number of calls of any kind, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), BroadcastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(NetworkError::Unreachable("null chain is unreachable".into()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for NullChain {
    async fn chain_id(&self) -> Result<String, BroadcastError> {
        self.enter()?;
        Ok(self.chain_id.clone())
    }

    async fn account(&self, address: &str) -> Result<Option<AccountInfo>, BroadcastError> {
        self.enter()?;
        let known = lock(&self.accounts).get(address).cloned();
        Ok(match known {
            Some(info) => Some(info),
            None if self.strict.load(Ordering::SeqCst) => None,
            None => Some(AccountInfo {
                address: address.to_string(),
                account_number: 0,
                sequence: 0,
            }),
        })
    }

    async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<TxResponse, BroadcastError> {
        self.enter()?;
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        lock(&self.broadcasts).push(tx_bytes.to_vec());
        let scripted = lock(&self.responses).pop_front();
        scripted.unwrap_or_else(|| {
            Ok(TxResponse {
                code: 0,
                codespace: String::new(),
                log: "[]".into(),
                hash: hex::encode_upper(fbx_crypto::sha256(tx_bytes)),
            })
        })
    }
}

/// Connector that hands out the same [`NullChain`] for every endpoint.
pub struct NullChainConnector {
    chain: Arc<NullChain>,
    endpoints: Mutex<Vec<String>>,
}

impl NullChainConnector {
    pub fn new(chain: Arc<NullChain>) -> Self {
        Self {
            chain,
            endpoints: Mutex::new(Vec::new()),
        }
    }

    /// Endpoints connected to so far.
    pub fn endpoints(&self) -> Vec<String> {
        lock(&self.endpoints).clone()
    }
}

impl ChainConnector for NullChainConnector {
    fn connect(&self, endpoint: &str) -> Result<Arc<dyn ChainClient>, BroadcastError> {
        lock(&self.endpoints).push(endpoint.to_string());
        Ok(self.chain.clone())
    }
}
