use fbx_crypto::{derive_signing_key, CryptoError, HdPath};
use fbx_rpc::ChainConnector;
use fbx_types::{CryptoEntry, Ecosystem, Mnemonic};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::client::SigningClient;
use crate::error::{SignAndBroadcastError, SigningError};
use crate::hardware::HardwareTransport;
use crate::signer::{HardwareSigner, OfflineSigner, SoftwareSigner};

const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the signing key comes from for one operation.
pub enum KeySource {
    Mnemonic(Mnemonic),
    Hardware(Box<dyn HardwareTransport>),
}

/// `m/44'/<coin_type>'/0'/0/<account_index>`
pub fn derivation_path(coin_type: u32, account_index: u32) -> HdPath {
    HdPath::new(coin_type, account_index)
}

pub struct SignerResolver {
    chains: Arc<dyn ChainConnector>,
    network_timeout: Duration,
}

impl SignerResolver {
    pub fn new(chains: Arc<dyn ChainConnector>) -> Self {
        Self {
            chains,
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
        }
    }

    /// Bound on each chain call made by clients from [`Self::connect`].
    pub fn with_network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout = timeout;
        self
    }

    /// Build a signer. A mnemonic is consumed and dropped before this returns.
    pub async fn resolve(
        &self,
        key_source: KeySource,
        path: HdPath,
        entry: &CryptoEntry,
    ) -> Result<Box<dyn OfflineSigner>, SigningError> {
        if let Ecosystem::Other(name) = &entry.ecosystem {
            return Err(SigningError::UnsupportedEcosystem(name.clone()));
        }
        match key_source {
            KeySource::Mnemonic(mnemonic) => {
                debug!(%path, "deriving software signer");
                let key = tokio::task::spawn_blocking(move || derive_signing_key(&mnemonic, &path))
                    .await
                    .map_err(|e| SigningError::Derivation(format!("derivation task failed: {e}")))?
                    .map_err(|e| match e {
                        CryptoError::InvalidMnemonic(reason) => SigningError::InvalidMnemonic(reason),
                        other => SigningError::Derivation(other.to_string()),
                    })?;
                Ok(Box::new(SoftwareSigner::new(key, &entry.prefix)?))
            }
            KeySource::Hardware(transport) => {
                debug!(%path, "opening hardware signer");
                Ok(Box::new(HardwareSigner::open(transport, path, &entry.prefix).await?))
            }
        }
    }

    /// Bind a signer to the chain at the entry's RPC endpoint.
    pub fn connect(
        &self,
        signer: Box<dyn OfflineSigner>,
        entry: &CryptoEntry,
    ) -> Result<SigningClient, SignAndBroadcastError> {
        let chain = self
            .chains
            .connect(&entry.rpc_endpoint)
            .map_err(SignAndBroadcastError::Sequencing)?;
        Ok(SigningClient::new(
            signer,
            chain,
            entry.chain_id.clone(),
            self.network_timeout,
        ))
    }
}
