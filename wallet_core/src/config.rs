//! Wallet configuration with TOML file support.

use fbx_types::{ChainOverride, Registry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Can be loaded from a TOML file via [`WalletConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    /// How long to wait for the secrets holder to answer.
    #[serde(default = "default_secrets_timeout_ms")]
    pub secrets_timeout_ms: u64,

    /// Bound on each chain RPC call, broadcast included.
    #[serde(default = "default_broadcast_timeout_ms")]
    pub broadcast_timeout_ms: u64,

    /// Buffered events per subscriber before the slowest one lags.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Encrypted vault file.
    #[serde(default = "default_vault_path")]
    pub vault_path: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-symbol registry overrides, e.g. `[chains.ATOM] rpc_endpoint = "..."`.
    #[serde(default)]
    pub chains: BTreeMap<String, ChainOverride>,
}

fn default_secrets_timeout_ms() -> u64 {
    30_000
}

fn default_broadcast_timeout_ms() -> u64 {
    30_000
}

fn default_event_capacity() -> usize {
    64
}

fn default_vault_path() -> PathBuf {
    PathBuf::from("./fbx_vault.json")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl WalletConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn secrets_timeout(&self) -> Duration {
        Duration::from_millis(self.secrets_timeout_ms)
    }

    pub fn broadcast_timeout(&self) -> Duration {
        Duration::from_millis(self.broadcast_timeout_ms)
    }

    /// Built-in chains with this config's overrides applied.
    pub fn registry(&self) -> Result<Registry, ConfigError> {
        Ok(Registry::builtin().with_overrides(&self.chains)?)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            secrets_timeout_ms: default_secrets_timeout_ms(),
            broadcast_timeout_ms: default_broadcast_timeout_ms(),
            event_capacity: default_event_capacity(),
            vault_path: default_vault_path(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            chains: BTreeMap::new(),
        }
    }
}
