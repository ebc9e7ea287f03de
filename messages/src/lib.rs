//! Chain message types and transaction encoding for the FBX pipeline.
//!
//! Two representations of every supported operation live here:
//! - [`amino::ChainMessage`]: the legacy `{type, value}` wire form with
//!   snake_case fields, produced by [`normalize`] from an [`fbx_types::Intent`]
//! - [`signing::SigningMessage`]: the `{typeUrl, value}` protobuf form with
//!   camelCase fields, produced by [`to_signing_shape`] via a fixed type table
//!
//! [`request::TransactionRequest`] groups messages with fee and memo, and
//! [`tx`] turns them into signable bytes and broadcastable `TxRaw`.

pub mod amino;
pub mod normalize;
pub mod proto;
pub mod request;
pub mod signing;
pub mod tx;

pub use amino::ChainMessage;
pub use normalize::{normalize, to_signing_shape, type_url_for, TYPE_URL_TABLE};
pub use request::{Fee, Sequencing, StdSignDoc, TransactionRequest};
pub use signing::{SigningMessage, SigningValue};
pub use tx::{SignMode, UnsignedTx};
