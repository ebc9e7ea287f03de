//! Cryptocurrency registry: static network parameters per supported coin.
//!
//! The registry is assembled once at startup (built-in table plus optional
//! configuration overrides) and is immutable afterwards, so it can be shared
//! as `Arc<Registry>` across tasks without locking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::ValidationError;

/// A family of chains sharing one message and signing schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Ecosystem {
    /// Cosmos SDK chains (amino legacy messages, protobuf direct signing).
    Cosmos,
    /// An ecosystem the registry can describe but the pipeline cannot sign for.
    Other(String),
}

impl Ecosystem {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cosmos => "cosmos",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Ecosystem {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "cosmos" => Self::Cosmos,
            _ => Self::Other(s),
        }
    }
}

impl From<Ecosystem> for String {
    fn from(e: Ecosystem) -> Self {
        e.as_str().to_string()
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network parameters for one registered cryptocurrency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoEntry {
    /// Registry key, e.g. `ATOM`.
    pub symbol: String,
    /// Human-readable chain name.
    pub name: String,
    /// SLIP-44 coin type used in the derivation path.
    pub coin_type: u32,
    /// Bech32 human-readable prefix for account addresses.
    pub prefix: String,
    /// Base denomination for amounts and fees.
    pub denom: String,
    /// Tendermint RPC endpoint used for account queries and broadcast.
    pub rpc_endpoint: String,
    pub ecosystem: Ecosystem,
    /// Expected chain id. When absent it is read from the node at signing time.
    #[serde(default)]
    pub chain_id: Option<String>,
}

/// Partial entry from configuration. Overrides fields of a built-in entry, or
/// registers a new one when every required field is present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coin_type: Option<u32>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub denom: Option<String>,
    #[serde(default)]
    pub rpc_endpoint: Option<String>,
    #[serde(default)]
    pub ecosystem: Option<Ecosystem>,
    #[serde(default)]
    pub chain_id: Option<String>,
}

/// Read-only lookup table from symbol to [`CryptoEntry`].
#[derive(Clone, Debug)]
pub struct Registry {
    entries: HashMap<String, CryptoEntry>,
}

impl Registry {
    /// The chains supported out of the box.
    pub fn builtin() -> Self {
        Self::from_entries([
            CryptoEntry {
                symbol: "ATOM".to_string(),
                name: "Cosmos".to_string(),
                coin_type: 118,
                prefix: "cosmos".to_string(),
                denom: "uatom".to_string(),
                rpc_endpoint: "https://rpc.cosmos.network".to_string(),
                ecosystem: Ecosystem::Cosmos,
                chain_id: None,
            },
            CryptoEntry {
                symbol: "DSM".to_string(),
                name: "Desmos".to_string(),
                coin_type: 852,
                prefix: "desmos".to_string(),
                denom: "udaric".to_string(),
                rpc_endpoint: "https://rpc.morpheus.desmos.network".to_string(),
                ecosystem: Ecosystem::Cosmos,
                chain_id: None,
            },
        ])
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CryptoEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.symbol.clone(), e))
                .collect(),
        }
    }

    /// Apply configuration overrides, consuming the registry.
    ///
    /// A symbol without a built-in entry must supply every field except
    /// `chain_id`.
    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a String, &'a ChainOverride)>,
    ) -> Result<Self, ValidationError> {
        for (symbol, o) in overrides {
            let entry = match self.entries.remove(symbol) {
                Some(mut e) => {
                    if let Some(v) = &o.name {
                        e.name = v.clone();
                    }
                    if let Some(v) = o.coin_type {
                        e.coin_type = v;
                    }
                    if let Some(v) = &o.prefix {
                        e.prefix = v.clone();
                    }
                    if let Some(v) = &o.denom {
                        e.denom = v.clone();
                    }
                    if let Some(v) = &o.rpc_endpoint {
                        e.rpc_endpoint = v.clone();
                    }
                    if let Some(v) = &o.ecosystem {
                        e.ecosystem = v.clone();
                    }
                    if o.chain_id.is_some() {
                        e.chain_id = o.chain_id.clone();
                    }
                    e
                }
                None => CryptoEntry {
                    symbol: symbol.clone(),
                    name: o.name.clone().unwrap_or_else(|| symbol.clone()),
                    coin_type: o.coin_type.ok_or(ValidationError::MissingField("coin_type"))?,
                    prefix: o.prefix.clone().ok_or(ValidationError::MissingField("prefix"))?,
                    denom: o.denom.clone().ok_or(ValidationError::MissingField("denom"))?,
                    rpc_endpoint: o
                        .rpc_endpoint
                        .clone()
                        .ok_or(ValidationError::MissingField("rpc_endpoint"))?,
                    ecosystem: o
                        .ecosystem
                        .clone()
                        .ok_or(ValidationError::MissingField("ecosystem"))?,
                    chain_id: o.chain_id.clone(),
                },
            };
            self.entries.insert(symbol.clone(), entry);
        }
        Ok(self)
    }

    /// Look up a registered cryptocurrency by symbol.
    pub fn lookup(&self, symbol: &str) -> Result<&CryptoEntry, ValidationError> {
        self.entries
            .get(symbol)
            .ok_or_else(|| ValidationError::UnknownChain(symbol.to_string()))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
