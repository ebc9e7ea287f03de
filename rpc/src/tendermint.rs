//! Tendermint JSON-RPC implementation of [`ChainClient`].

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use fbx_messages::proto::{BaseAccount, QueryAccountRequest, QueryAccountResponse, BASE_ACCOUNT_TYPE_URL};
use prost::Message;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::client::{AccountInfo, ChainClient, ChainConnector, TxResponse};
use crate::error::{BroadcastError, NetworkError};

const ACCOUNT_QUERY_PATH: &str = "/cosmos.auth.v1beta1.Query/Account";

/// HTTP client for a Tendermint node's JSON-RPC endpoint.
pub struct TendermintRpc {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl TendermintRpc {
    /// `timeout` bounds every request, including the broadcast.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, NetworkError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| NetworkError::Unreachable(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a JSON-RPC 2.0 request and return its `result` field.
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, NetworkError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        debug!(endpoint = %self.endpoint, method, "rpc call");

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(NetworkError::InvalidResponse(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }
        let json: Value = response.json().await?;
        unwrap_result(json)
    }
}

fn unwrap_result(mut json: Value) -> Result<Value, NetworkError> {
    if let Some(err) = json.get("error").filter(|e| !e.is_null()) {
        let message = err
            .get("data")
            .and_then(Value::as_str)
            .or_else(|| err.get("message").and_then(Value::as_str))
            .unwrap_or("unknown error");
        return Err(NetworkError::InvalidResponse(format!("node error: {message}")));
    }
    json.get_mut("result")
        .map(Value::take)
        .ok_or_else(|| NetworkError::InvalidResponse("missing result".into()))
}

fn parse_status(result: &Value) -> Result<String, NetworkError> {
    result
        .pointer("/node_info/network")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| NetworkError::InvalidResponse("status without node_info.network".into()))
}

/// ABCI result code. Out-of-range values saturate to `u32::MAX` so they
/// never read as success.
fn code_of(value: &Value) -> Result<u32, NetworkError> {
    match value {
        Value::Number(n) => Ok(n.as_u64().map_or(u32::MAX, |c| u32::try_from(c).unwrap_or(u32::MAX))),
        Value::String(s) => Ok(s.parse().unwrap_or(u32::MAX)),
        other => Err(NetworkError::InvalidResponse(format!("invalid result code {other}"))),
    }
}

fn parse_account(result: &Value) -> Result<Option<AccountInfo>, NetworkError> {
    let response = result
        .get("response")
        .ok_or_else(|| NetworkError::InvalidResponse("abci_query without response".into()))?;
    // ResponseQuery omits a zero code.
    let code = response.get("code").map(code_of).transpose()?.unwrap_or(0);
    if code != 0 {
        let log = response.get("log").and_then(Value::as_str).unwrap_or_default();
        if log.contains("not found") {
            return Ok(None);
        }
        return Err(NetworkError::InvalidResponse(format!(
            "account query failed with code {code}: {log}"
        )));
    }
    let encoded = match response.get("value").and_then(Value::as_str) {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(None),
    };
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| NetworkError::InvalidResponse(format!("invalid base64 value: {e}")))?;
    let decoded = QueryAccountResponse::decode(bytes.as_slice())
        .map_err(|e| NetworkError::InvalidResponse(format!("invalid account response: {e}")))?;
    let Some(any) = decoded.account else {
        return Ok(None);
    };
    if any.type_url != BASE_ACCOUNT_TYPE_URL {
        return Err(NetworkError::InvalidResponse(format!(
            "unsupported account type {}",
            any.type_url
        )));
    }
    let account = BaseAccount::decode(any.value.as_slice())
        .map_err(|e| NetworkError::InvalidResponse(format!("invalid base account: {e}")))?;
    Ok(Some(AccountInfo {
        address: account.address,
        account_number: account.account_number,
        sequence: account.sequence,
    }))
}

fn parse_broadcast(result: Value) -> Result<TxResponse, NetworkError> {
    let code = result
        .get("code")
        .ok_or_else(|| NetworkError::InvalidResponse("broadcast result without code".into()))
        .and_then(code_of)?;
    let text = |key: &str| {
        result
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let hash = text("hash");
    if hash.is_empty() {
        return Err(NetworkError::InvalidResponse("broadcast result without hash".into()));
    }
    Ok(TxResponse {
        code,
        codespace: text("codespace"),
        log: text("log"),
        hash,
    })
}

#[async_trait]
impl ChainClient for TendermintRpc {
    async fn chain_id(&self) -> Result<String, BroadcastError> {
        let result = self.rpc_call("status", json!({})).await?;
        Ok(parse_status(&result)?)
    }

    async fn account(&self, address: &str) -> Result<Option<AccountInfo>, BroadcastError> {
        let data = QueryAccountRequest {
            address: address.to_string(),
        }
        .encode_to_vec();
        let result = self
            .rpc_call(
                "abci_query",
                json!({ "path": ACCOUNT_QUERY_PATH, "data": hex::encode(data), "prove": false }),
            )
            .await?;
        Ok(parse_account(&result)?)
    }

    async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<TxResponse, BroadcastError> {
        let result = self
            .rpc_call("broadcast_tx_sync", json!({ "tx": BASE64.encode(tx_bytes) }))
            .await?;
        Ok(parse_broadcast(result)?)
    }
}

/// Connector that opens a [`TendermintRpc`] per endpoint.
#[derive(Clone, Debug)]
pub struct HttpConnector {
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ChainConnector for HttpConnector {
    fn connect(&self, endpoint: &str) -> Result<Arc<dyn ChainClient>, BroadcastError> {
        Ok(Arc::new(TendermintRpc::new(endpoint, self.timeout)?))
    }
}
