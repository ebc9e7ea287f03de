//! The boundary between the transaction pipeline and the privileged holder
//! of wallet secrets.
//!
//! The pipeline side only ever sees [`SecretsClient`]: it sends one
//! `viewMnemonicPhrase` request per signing operation and gets back either a
//! mnemonic or notice that the wallet is hardware-backed. The holder side
//! ([`SecretsHolder`]) answers from an encrypted [`Vault`].

pub mod client;
pub mod error;
pub mod holder;
pub mod protocol;
pub mod vault;

pub use client::{channel_pair, ChannelEndpoint, RawFrame, RevealedSecret, SecretsClient, SecretsTransport};
pub use error::{SecretsError, VaultError};
pub use holder::SecretsHolder;
pub use protocol::{
    Frame, Revealed, SecretsRequest, SecretsResponse, ViewMnemonicPhrase, WireError, WireErrorKind,
};
pub use vault::{KdfParams, SealedBlob, Vault, WalletKind};
