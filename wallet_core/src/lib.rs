//! Wallet core library for FBX.
//!
//! Accepts user intents and runs each submission through
//! `Building → Authorizing → Signing → Broadcasting → Succeeded | Failed`:
//! - Intents are normalized into chain messages for the selected chain
//! - The secrets holder is asked for the wallet's mnemonic (or reports a
//!   hardware wallet, in which case the device is opened)
//! - A signer is resolved, the transaction is signed and broadcast
//! - Exactly one `transactionSuccess` / `transactionFail` event is published

pub mod config;
pub mod error;
pub mod events;
pub mod orchestrator;

pub use config::WalletConfig;
pub use error::{ConfigError, ErrorKind, ErrorPayload, TransactionError};
pub use events::{EventBus, Subscription, SuccessPayload, TransactionEvent};
pub use orchestrator::{SubmissionState, Submission, SubmitOptions, TransactionOrchestrator};
