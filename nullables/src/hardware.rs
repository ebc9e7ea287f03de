//! Nullable hardware wallet: a software key behind the device interface.

use async_trait::async_trait;
use fbx_crypto::{compressed_public_key, derive_signing_key, HdPath, SigningKey};
use fbx_signer::{HardwareConnector, HardwareTransport, SigningError};
use fbx_types::Mnemonic;
use k256::ecdsa::signature::Signer;
use k256::ecdsa::Signature;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::lock;

/// A device that derives keys from a fixed mnemonic and answers with DER
/// signatures, like a Ledger running the Cosmos app.
pub struct NullHardwareDevice {
    mnemonic: Mnemonic,
    reject: AtomicBool,
    signed_docs: Mutex<Vec<Vec<u8>>>,
}

impl NullHardwareDevice {
    pub fn new(mnemonic: Mnemonic) -> Self {
        Self {
            mnemonic,
            reject: AtomicBool::new(false),
            signed_docs: Mutex::new(Vec::new()),
        }
    }

    /// Simulate the user declining on the device.
    pub fn reject_signing(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    /// Sign documents the device was asked to approve, in order.
    pub fn signed_docs(&self) -> Vec<Vec<u8>> {
        lock(&self.signed_docs).clone()
    }

    fn key(&self, path: &HdPath) -> Result<SigningKey, SigningError> {
        derive_signing_key(&self.mnemonic, path).map_err(|e| SigningError::DeviceRejected(e.to_string()))
    }
}

struct DeviceHandle(Arc<NullHardwareDevice>);

#[async_trait]
impl HardwareTransport for DeviceHandle {
    async fn public_key(&self, path: &HdPath) -> Result<[u8; 33], SigningError> {
        Ok(compressed_public_key(&self.0.key(path)?))
    }

    async fn sign(&self, path: &HdPath, sign_doc: &[u8]) -> Result<Vec<u8>, SigningError> {
        if self.0.reject.load(Ordering::SeqCst) {
            return Err(SigningError::DeviceRejected("transaction declined on device".into()));
        }
        let signature: Signature = self.0.key(path)?.sign(sign_doc);
        lock(&self.0.signed_docs).push(sign_doc.to_vec());
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

/// Connector around one [`NullHardwareDevice`] that counts how often it is
/// opened and can pretend the device is unplugged.
pub struct NullHardwareConnector {
    device: Arc<NullHardwareDevice>,
    plugged_in: AtomicBool,
    opens: AtomicUsize,
}

impl NullHardwareConnector {
    pub fn new(device: Arc<NullHardwareDevice>) -> Self {
        Self {
            device,
            plugged_in: AtomicBool::new(true),
            opens: AtomicUsize::new(0),
        }
    }

    /// A connector with no device attached.
    pub fn disconnected(device: Arc<NullHardwareDevice>) -> Self {
        let connector = Self::new(device);
        connector.plugged_in.store(false, Ordering::SeqCst);
        connector
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn device(&self) -> &Arc<NullHardwareDevice> {
        &self.device
    }
}

#[async_trait]
impl HardwareConnector for NullHardwareConnector {
    async fn open(&self) -> Result<Box<dyn HardwareTransport>, SigningError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if !self.plugged_in.load(Ordering::SeqCst) {
            return Err(SigningError::DeviceNotConnected("no device found".into()));
        }
        Ok(Box::new(DeviceHandle(self.device.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[tokio::test]
    async fn device_signs_with_der() {
        let device = Arc::new(NullHardwareDevice::new(Mnemonic::new(PHRASE)));
        let connector = NullHardwareConnector::new(device.clone());
        let transport = connector.open().await.unwrap();
        let path = HdPath::new(118, 0);

        let public_key = transport.public_key(&path).await.unwrap();
        let der = transport.sign(&path, b"doc").await.unwrap();
        let compact = fbx_crypto::compact_signature(&der).unwrap();
        assert!(fbx_crypto::verify_signature(&public_key, b"doc", &compact));
        assert_eq!(device.signed_docs(), vec![b"doc".to_vec()]);
        assert_eq!(connector.open_count(), 1);
    }

    #[tokio::test]
    async fn disconnected_connector_fails_to_open() {
        let device = Arc::new(NullHardwareDevice::new(Mnemonic::new(PHRASE)));
        let connector = NullHardwareConnector::disconnected(device);
        assert!(matches!(
            connector.open().await,
            Err(SigningError::DeviceNotConnected(_))
        ));
        assert_eq!(connector.open_count(), 1);
    }

    #[tokio::test]
    async fn rejection_is_reported() {
        let device = Arc::new(NullHardwareDevice::new(Mnemonic::new(PHRASE)));
        device.reject_signing();
        let transport = NullHardwareConnector::new(device).open().await.unwrap();
        assert!(matches!(
            transport.sign(&HdPath::new(118, 0), b"doc").await,
            Err(SigningError::DeviceRejected(_))
        ));
    }
}
