//! The seam to a hardware signing device.

use async_trait::async_trait;
use fbx_crypto::HdPath;

use crate::error::SigningError;

/// An open connection to a device holding the wallet's key.
#[async_trait]
pub trait HardwareTransport: Send + Sync {
    /// Compressed secp256k1 public key at `path`.
    async fn public_key(&self, path: &HdPath) -> Result<[u8; 33], SigningError>;

    /// Ask the device to approve and sign a legacy amino sign document.
    /// Returns a DER or 64-byte compact signature.
    async fn sign(&self, path: &HdPath, sign_doc: &[u8]) -> Result<Vec<u8>, SigningError>;
}

/// Opens one transport per signing operation.
#[async_trait]
pub trait HardwareConnector: Send + Sync {
    async fn open(&self) -> Result<Box<dyn HardwareTransport>, SigningError>;
}

/// Connector for builds without device support.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableHardware;

#[async_trait]
impl HardwareConnector for UnavailableHardware {
    async fn open(&self) -> Result<Box<dyn HardwareTransport>, SigningError> {
        Err(SigningError::DeviceNotConnected(
            "no hardware transport available".into(),
        ))
    }
}
