//! Turns revealed key material into a signing capability bound to one chain.
//!
//! [`SignerResolver::resolve`] builds an [`OfflineSigner`] from a
//! [`KeySource`]; [`SignerResolver::connect`] pairs it with a chain client
//! into a [`SigningClient`], which only exposes its address, `sign` and
//! `broadcast`.

pub mod client;
pub mod error;
pub mod hardware;
pub mod resolver;
pub mod signer;

pub use client::{SignedTx, SigningClient};
pub use error::{SignAndBroadcastError, SigningError};
pub use hardware::{HardwareConnector, HardwareTransport, UnavailableHardware};
pub use resolver::{derivation_path, KeySource, SignerResolver};
pub use signer::{HardwareSigner, OfflineSigner, SoftwareSigner};
