//! Chain access for the FBX pipeline.
//!
//! [`ChainClient`] is the seam the signer talks to; [`TendermintRpc`] is the
//! production implementation over a node's JSON-RPC port.

pub mod client;
pub mod error;
pub mod tendermint;

pub use client::{AccountInfo, BroadcastResult, ChainClient, ChainConnector, TxResponse};
pub use error::{BroadcastError, NetworkError};
pub use tendermint::{HttpConnector, TendermintRpc};
