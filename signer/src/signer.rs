//! Offline signers: produce signed `TxRaw` bytes without touching the network.

use async_trait::async_trait;
use fbx_crypto::{compact_signature, compressed_public_key, sign_bytes, verify_signature, HdPath, SigningKey};
use fbx_messages::{Sequencing, SignMode, TransactionRequest, UnsignedTx};
use std::fmt;

use crate::error::SigningError;
use crate::hardware::HardwareTransport;

#[async_trait]
pub trait OfflineSigner: Send + Sync {
    fn address(&self) -> &str;

    fn public_key(&self) -> &[u8; 33];

    fn sign_mode(&self) -> SignMode;

    /// Sign `request` against `sequencing` and return the encoded `TxRaw`.
    async fn sign(&self, request: &TransactionRequest, sequencing: &Sequencing) -> Result<Vec<u8>, SigningError>;
}

/// Signs in-process with a key derived from a mnemonic (direct mode).
pub struct SoftwareSigner {
    key: SigningKey,
    public_key: [u8; 33],
    address: String,
}

impl SoftwareSigner {
    pub fn new(key: SigningKey, prefix: &str) -> Result<Self, SigningError> {
        let public_key = compressed_public_key(&key);
        let address = fbx_crypto::account_address(prefix, &public_key)
            .map_err(|e| SigningError::Derivation(e.to_string()))?;
        Ok(Self {
            key,
            public_key,
            address,
        })
    }
}

impl fmt::Debug for SoftwareSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OfflineSigner for SoftwareSigner {
    fn address(&self) -> &str {
        &self.address
    }

    fn public_key(&self) -> &[u8; 33] {
        &self.public_key
    }

    fn sign_mode(&self) -> SignMode {
        SignMode::Direct
    }

    async fn sign(&self, request: &TransactionRequest, sequencing: &Sequencing) -> Result<Vec<u8>, SigningError> {
        let messages = request.signing_messages()?;
        let unsigned = UnsignedTx::new(
            &messages,
            request.memo(),
            &self.public_key,
            sequencing.sequence,
            request.fee(),
            SignMode::Direct,
        );
        let sign_doc = unsigned.direct_sign_bytes(&sequencing.chain_id, sequencing.account_number);
        let signature = sign_bytes(&self.key, &sign_doc);
        Ok(unsigned.into_signed(&signature))
    }
}

/// Delegates signing to a device (legacy amino JSON mode).
pub struct HardwareSigner {
    transport: Box<dyn HardwareTransport>,
    path: HdPath,
    public_key: [u8; 33],
    address: String,
}

impl HardwareSigner {
    pub async fn open(transport: Box<dyn HardwareTransport>, path: HdPath, prefix: &str) -> Result<Self, SigningError> {
        let public_key = transport.public_key(&path).await?;
        let address = fbx_crypto::account_address(prefix, &public_key)
            .map_err(|e| SigningError::DeviceRejected(format!("device returned an unusable key: {e}")))?;
        Ok(Self {
            transport,
            path,
            public_key,
            address,
        })
    }
}

#[async_trait]
impl OfflineSigner for HardwareSigner {
    fn address(&self) -> &str {
        &self.address
    }

    fn public_key(&self) -> &[u8; 33] {
        &self.public_key
    }

    fn sign_mode(&self) -> SignMode {
        SignMode::LegacyAminoJson
    }

    async fn sign(&self, request: &TransactionRequest, sequencing: &Sequencing) -> Result<Vec<u8>, SigningError> {
        let sign_doc = request.sign_doc(sequencing).to_sign_bytes()?;
        let raw = self.transport.sign(&self.path, &sign_doc).await?;
        let signature = compact_signature(&raw).map_err(|_| SigningError::InvalidSignature)?;
        if !verify_signature(&self.public_key, &sign_doc, &signature) {
            return Err(SigningError::InvalidSignature);
        }

        let messages = request.signing_messages()?;
        let unsigned = UnsignedTx::new(
            &messages,
            request.memo(),
            &self.public_key,
            sequencing.sequence,
            request.fee(),
            SignMode::LegacyAminoJson,
        );
        Ok(unsigned.into_signed(&signature))
    }
}
