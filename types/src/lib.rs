//! Fundamental types for the FBX transaction pipeline.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! user intents, decimal amounts, credentials and revealed key material, and the
//! read-only cryptocurrency registry.

pub mod amount;
pub mod chain;
pub mod error;
pub mod intent;
pub mod keys;

pub use amount::{Amount, Coin};
pub use chain::{ChainOverride, CryptoEntry, Ecosystem, Registry};
pub use error::ValidationError;
pub use intent::{Intent, IntentKind};
pub use keys::{Credentials, Mnemonic, Password};
