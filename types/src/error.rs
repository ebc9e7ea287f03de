//! Validation errors: raised before any credential is touched.

use thiserror::Error;

/// A submission was rejected while it was still being built.
///
/// Everything in this enum is detected from the intent and the registry alone,
/// so a `ValidationError` guarantees the secrets holder was never contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown chain: {0}")]
    UnknownChain(String),

    #[error("unsupported ecosystem: {0}")]
    UnsupportedEcosystem(String),

    #[error("unrecognized message type: {0}")]
    UnrecognizedMessageType(String),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("transaction contains no messages")]
    EmptyTransaction,

    #[error("malformed message: {0}")]
    MalformedMessage(String),
}
