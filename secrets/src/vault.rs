//! Argon2id + AES-256-GCM encrypted wallet vault.
//!
//! Layout of the vault file:
//! 1. a check blob sealed with the unlock password, used when adding wallets
//! 2. one entry per wallet, sealed with the unlock password
//! 3. inside a mnemonic entry, the phrase sealed again with the wallet's
//!    security password
//!
//! Every sealed blob carries its own salt, nonce and KDF parameters.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use fbx_types::{Mnemonic, Password};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zeroize::Zeroizing;

use crate::error::VaultError;

const VAULT_VERSION: u32 = 1;
const CHECK_PLAINTEXT: &[u8] = b"fbx-vault-v1";

const ARGON2_MEMORY_KIB: u32 = 65536; // 64 MB
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;
const ARGON2_OUTPUT_LEN: usize = 32;

const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory: ARGON2_MEMORY_KIB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }
}

impl KdfParams {
    /// The smallest parameters argon2 accepts. For tests only.
    pub fn insecure_fast() -> Self {
        Self {
            memory: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// One password-encrypted payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealedBlob {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

impl SealedBlob {
    pub fn seal(plaintext: &[u8], password: &Password, params: KdfParams) -> Result<Self, VaultError> {
        let mut rng = rand::thread_rng();

        let mut salt = [0u8; SALT_LEN];
        rng.fill_bytes(&mut salt);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce_bytes);

        let key = derive_key(password, &salt, params)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| VaultError::Crypto(format!("AES key init failed: {e}")))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|e| VaultError::Crypto(format!("encryption failed: {e}")))?;

        Ok(Self {
            cipher: "aes-256-gcm".to_string(),
            kdf: "argon2id".to_string(),
            kdf_params: params,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        })
    }

    /// Returns `Ok(None)` when authentication fails, i.e. the password is wrong
    /// or the blob was tampered with.
    pub fn open(&self, password: &Password) -> Result<Option<Zeroizing<Vec<u8>>>, VaultError> {
        if self.cipher != "aes-256-gcm" || self.kdf != "argon2id" {
            return Err(VaultError::Format(format!(
                "unsupported cipher suite {}/{}",
                self.kdf, self.cipher
            )));
        }
        let salt = hex::decode(&self.salt).map_err(|e| VaultError::Format(format!("invalid salt hex: {e}")))?;
        let nonce_bytes =
            hex::decode(&self.nonce).map_err(|e| VaultError::Format(format!("invalid nonce hex: {e}")))?;
        let ciphertext = hex::decode(&self.ciphertext)
            .map_err(|e| VaultError::Format(format!("invalid ciphertext hex: {e}")))?;
        if nonce_bytes.len() != NONCE_LEN {
            return Err(VaultError::Format(format!(
                "invalid nonce length: expected {NONCE_LEN}, got {}",
                nonce_bytes.len()
            )));
        }

        let key = derive_key(password, &salt, self.kdf_params)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| VaultError::Crypto(format!("AES key init failed: {e}")))?;
        Ok(cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
            .ok()
            .map(Zeroizing::new))
    }
}

fn derive_key(password: &Password, salt: &[u8], params: KdfParams) -> Result<Zeroizing<[u8; 32]>, VaultError> {
    let params = Params::new(
        params.memory,
        params.iterations,
        params.parallelism,
        Some(ARGON2_OUTPUT_LEN),
    )
    .map_err(|e| VaultError::Crypto(format!("Argon2 params error: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(password.expose().as_bytes(), salt, &mut output[..])
        .map_err(|e| VaultError::Crypto(format!("Argon2 hashing failed: {e}")))?;
    Ok(output)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Mnemonic,
    Hardware,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct WalletEntry {
    id: String,
    kind: WalletKind,
    /// Hardware: the wallet id. Mnemonic: the JSON of the inner blob.
    sealed: SealedBlob,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vault {
    version: u32,
    check: SealedBlob,
    wallets: Vec<WalletEntry>,
    #[serde(skip)]
    params: KdfParams,
}

impl Vault {
    pub fn create(unlock_password: &Password) -> Result<Self, VaultError> {
        Self::create_with_params(unlock_password, KdfParams::default())
    }

    pub fn create_with_params(unlock_password: &Password, params: KdfParams) -> Result<Self, VaultError> {
        Ok(Self {
            version: VAULT_VERSION,
            check: SealedBlob::seal(CHECK_PLAINTEXT, unlock_password, params)?,
            wallets: Vec::new(),
            params,
        })
    }

    pub fn wallet_ids(&self) -> impl Iterator<Item = (&str, WalletKind)> {
        self.wallets.iter().map(|w| (w.id.as_str(), w.kind))
    }

    pub fn add_mnemonic_wallet(
        &mut self,
        unlock_password: &Password,
        wallet_id: &str,
        mnemonic: &Mnemonic,
        security_password: &Password,
    ) -> Result<(), VaultError> {
        self.prepare_insert(unlock_password, wallet_id)?;
        let inner = SealedBlob::seal(mnemonic.expose_phrase().as_bytes(), security_password, self.params)?;
        let inner_json = Zeroizing::new(
            serde_json::to_vec(&inner).map_err(|e| VaultError::Format(e.to_string()))?,
        );
        self.wallets.push(WalletEntry {
            id: wallet_id.to_string(),
            kind: WalletKind::Mnemonic,
            sealed: SealedBlob::seal(&inner_json, unlock_password, self.params)?,
        });
        Ok(())
    }

    pub fn add_hardware_wallet(&mut self, unlock_password: &Password, wallet_id: &str) -> Result<(), VaultError> {
        self.prepare_insert(unlock_password, wallet_id)?;
        self.wallets.push(WalletEntry {
            id: wallet_id.to_string(),
            kind: WalletKind::Hardware,
            sealed: SealedBlob::seal(wallet_id.as_bytes(), unlock_password, self.params)?,
        });
        Ok(())
    }

    /// Reveal a wallet's mnemonic. `Ok(None)` means the wallet is
    /// hardware-backed and has no phrase to reveal.
    pub fn view_mnemonic(
        &self,
        wallet_id: &str,
        unlock_password: &Password,
        security_password: Option<&Password>,
    ) -> Result<Option<Mnemonic>, VaultError> {
        self.verify_unlock(unlock_password)?;
        let entry = self
            .wallets
            .iter()
            .find(|w| w.id == wallet_id)
            .ok_or_else(|| VaultError::WalletNotFound(wallet_id.to_string()))?;
        let outer = entry
            .sealed
            .open(unlock_password)?
            .ok_or(VaultError::InvalidUnlockPassword)?;

        match entry.kind {
            WalletKind::Hardware => Ok(None),
            WalletKind::Mnemonic => {
                let security_password = security_password.ok_or(VaultError::InvalidSecurityPassword)?;
                let inner: SealedBlob =
                    serde_json::from_slice(&outer).map_err(|e| VaultError::Format(e.to_string()))?;
                let phrase = inner
                    .open(security_password)?
                    .ok_or(VaultError::InvalidSecurityPassword)?;
                let phrase = std::str::from_utf8(&phrase)
                    .map_err(|_| VaultError::Format("mnemonic is not UTF-8".into()))?;
                Ok(Some(Mnemonic::new(phrase)))
            }
        }
    }

    fn verify_unlock(&self, unlock_password: &Password) -> Result<(), VaultError> {
        match self.check.open(unlock_password)? {
            Some(_) => Ok(()),
            None => Err(VaultError::InvalidUnlockPassword),
        }
    }

    fn prepare_insert(&self, unlock_password: &Password, wallet_id: &str) -> Result<(), VaultError> {
        self.verify_unlock(unlock_password)?;
        if self.wallets.iter().any(|w| w.id == wallet_id) {
            return Err(VaultError::DuplicateWallet(wallet_id.to_string()));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), VaultError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Format(format!("JSON serialization failed: {e}")))?;
        std::fs::write(path, json).map_err(|e| VaultError::Io(format!("failed to write vault file: {e}")))
    }

    /// Load a vault. New blobs added afterwards use the KDF parameters of the
    /// check blob.
    pub fn load(path: &Path) -> Result<Self, VaultError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| VaultError::Io(format!("failed to read vault file: {e}")))?;
        let mut vault: Vault =
            serde_json::from_str(&json).map_err(|e| VaultError::Format(format!("invalid vault JSON: {e}")))?;
        if vault.version != VAULT_VERSION {
            return Err(VaultError::Format(format!(
                "unsupported vault version: {}",
                vault.version
            )));
        }
        vault.params = vault.check.kdf_params;
        Ok(vault)
    }
}
