//! The privileged side of the secrets channel.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::client::{ChannelEndpoint, SecretsTransport};
use crate::error::VaultError;
use crate::protocol::{Frame, Revealed, SecretsRequest, SecretsResponse, WireErrorKind};
use crate::vault::Vault;

/// Serves `viewMnemonicPhrase` requests from a [`Vault`].
#[derive(Clone)]
pub struct SecretsHolder {
    vault: Arc<Vault>,
}

impl SecretsHolder {
    pub fn new(vault: Vault) -> Self {
        Self {
            vault: Arc::new(vault),
        }
    }

    /// Answer one request. Runs the KDF, so call it off the async executor.
    pub fn handle(&self, request: SecretsRequest) -> SecretsResponse {
        match request {
            SecretsRequest::Ping => SecretsResponse::Ok(Revealed::default()),
            SecretsRequest::ViewMnemonicPhrase(view) => {
                match self
                    .vault
                    .view_mnemonic(&view.id, &view.password, view.security_password.as_ref())
                {
                    Ok(mnemonic) => SecretsResponse::Ok(Revealed { mnemonic }),
                    Err(err) => {
                        debug!(wallet_id = %view.id, error = %err, "mnemonic request refused");
                        let kind = match &err {
                            VaultError::InvalidUnlockPassword => WireErrorKind::InvalidUnlockPassword,
                            VaultError::InvalidSecurityPassword => WireErrorKind::InvalidSecurityPassword,
                            VaultError::WalletNotFound(_) => WireErrorKind::WalletNotFound,
                            _ => WireErrorKind::Internal,
                        };
                        SecretsResponse::error(kind, err.to_string())
                    }
                }
            }
        }
    }

    /// Serve frames until the other end hangs up.
    pub async fn serve(self, mut endpoint: ChannelEndpoint) {
        loop {
            let raw = match endpoint.recv().await {
                Ok(raw) => raw,
                Err(_) => break,
            };
            let (id, response) = match serde_json::from_str::<Frame<SecretsRequest>>(&raw) {
                Ok(frame) => {
                    let holder = self.clone();
                    let id = frame.id;
                    let response = tokio::task::spawn_blocking(move || holder.handle(frame.payload))
                        .await
                        .unwrap_or_else(|e| {
                            SecretsResponse::error(WireErrorKind::Internal, format!("holder task failed: {e}"))
                        });
                    (id, response)
                }
                Err(e) => {
                    warn!(error = %e, "undecodable secrets request");
                    let id = serde_json::from_str::<serde_json::Value>(&raw)
                        .ok()
                        .and_then(|v| v.get("id").and_then(serde_json::Value::as_u64))
                        .unwrap_or(0);
                    (id, SecretsResponse::error(WireErrorKind::BadRequest, e.to_string()))
                }
            };
            let text = match serde_json::to_string(&Frame { id, payload: response }) {
                Ok(text) => Zeroizing::new(text),
                Err(e) => {
                    warn!(error = %e, "failed to encode secrets reply");
                    continue;
                }
            };
            if endpoint.send(text).await.is_err() {
                break;
            }
        }
        info!("secrets holder stopped");
    }

    pub fn spawn(self, endpoint: ChannelEndpoint) -> JoinHandle<()> {
        tokio::spawn(self.serve(endpoint))
    }
}
