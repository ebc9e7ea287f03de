//! Pipeline-side client of the secrets channel.

use async_trait::async_trait;
use fbx_types::{Mnemonic, Password};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::SecretsError;
use crate::protocol::{Frame, SecretsRequest, SecretsResponse, ViewMnemonicPhrase, WireErrorKind};

/// Frames are JSON text; it may carry passwords, so it is wiped on drop.
pub type RawFrame = Zeroizing<String>;

/// One end of a bidirectional frame channel.
#[async_trait]
pub trait SecretsTransport: Send {
    async fn send(&mut self, frame: RawFrame) -> Result<(), SecretsError>;
    async fn recv(&mut self) -> Result<RawFrame, SecretsError>;
}

/// In-process transport over a pair of tokio channels.
pub struct ChannelEndpoint {
    tx: mpsc::Sender<RawFrame>,
    rx: mpsc::Receiver<RawFrame>,
}

/// Connected endpoints: the first goes to the client, the second to the holder.
pub fn channel_pair(capacity: usize) -> (ChannelEndpoint, ChannelEndpoint) {
    let (a_tx, b_rx) = mpsc::channel(capacity);
    let (b_tx, a_rx) = mpsc::channel(capacity);
    (
        ChannelEndpoint { tx: a_tx, rx: a_rx },
        ChannelEndpoint { tx: b_tx, rx: b_rx },
    )
}

#[async_trait]
impl SecretsTransport for ChannelEndpoint {
    async fn send(&mut self, frame: RawFrame) -> Result<(), SecretsError> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| SecretsError::ChannelClosed)
    }

    async fn recv(&mut self) -> Result<RawFrame, SecretsError> {
        self.rx.recv().await.ok_or(SecretsError::ChannelClosed)
    }
}

/// What the holder handed back for a wallet.
#[derive(Debug)]
pub enum RevealedSecret {
    Mnemonic(Mnemonic),
    /// The wallet keeps its key on a device; no mnemonic exists.
    HardwareWallet,
}

/// Request/response client. One request is in flight per connection at a
/// time; concurrent callers wait on the connection lock.
pub struct SecretsClient {
    conn: Mutex<Box<dyn SecretsTransport>>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl SecretsClient {
    pub fn new(transport: impl SecretsTransport + 'static, timeout: Duration) -> Self {
        Self {
            conn: Mutex::new(Box::new(transport)),
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    pub async fn reveal_mnemonic(
        &self,
        wallet_id: &str,
        unlock_password: &Password,
        security_password: Option<&Password>,
    ) -> Result<RevealedSecret, SecretsError> {
        let request = SecretsRequest::ViewMnemonicPhrase(ViewMnemonicPhrase {
            id: wallet_id.to_string(),
            security_password: security_password.map(|p| Password::new(p.expose())),
            password: Password::new(unlock_password.expose()),
        });
        match self.request(request).await? {
            SecretsResponse::Ok(revealed) => Ok(match revealed.mnemonic {
                Some(mnemonic) => RevealedSecret::Mnemonic(mnemonic),
                None => RevealedSecret::HardwareWallet,
            }),
            SecretsResponse::Error(err) => Err(match err.kind {
                WireErrorKind::InvalidUnlockPassword => SecretsError::InvalidUnlockPassword,
                WireErrorKind::InvalidSecurityPassword => SecretsError::InvalidSecurityPassword,
                WireErrorKind::WalletNotFound => SecretsError::WalletNotFound(wallet_id.to_string()),
                WireErrorKind::BadRequest | WireErrorKind::Internal => {
                    SecretsError::Protocol(err.message)
                }
            }),
        }
    }

    pub async fn ping(&self) -> Result<(), SecretsError> {
        match self.request(SecretsRequest::Ping).await? {
            SecretsResponse::Ok(_) => Ok(()),
            SecretsResponse::Error(err) => Err(SecretsError::Protocol(err.message)),
        }
    }

    async fn request(&self, payload: SecretsRequest) -> Result<SecretsResponse, SecretsError> {
        let mut conn = self.conn.lock().await;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let text = serde_json::to_string(&Frame { id, payload })
            .map_err(|e| SecretsError::Protocol(e.to_string()))?;

        let exchange = async {
            conn.send(Zeroizing::new(text)).await?;
            loop {
                let raw = conn.recv().await?;
                let frame: Frame<SecretsResponse> = serde_json::from_str(&raw)
                    .map_err(|e| SecretsError::Protocol(format!("undecodable reply: {e}")))?;
                if frame.id == id {
                    return Ok(frame.payload);
                }
                debug!(expected = id, got = frame.id, "discarding stale secrets reply");
            }
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                warn!(request_id = id, "secrets channel timed out");
                Err(SecretsError::SecretsChannelTimeout)
            }
        }
    }
}
