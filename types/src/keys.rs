//! Secret-bearing types: passwords, mnemonics and signing credentials.
//!
//! None of these types implement `Display` or `Clone`, and their `Debug`
//! output is redacted. Contents are zeroized on drop.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A password supplied by the user for one operation.
#[derive(Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Password {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

/// A BIP39 mnemonic phrase revealed by the secrets holder.
///
/// Lives only for the signing call that requested it.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic(String);

impl Mnemonic {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    pub fn expose_phrase(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mnemonic(***)")
    }
}

impl Serialize for Mnemonic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Mnemonic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

/// Everything needed to authorize one signing operation.
///
/// Exists only for the duration of a single submission.
pub struct Credentials {
    pub wallet_id: String,
    /// HD account index (the last component of the derivation path).
    pub account_index: u32,
    pub unlock_password: Password,
    /// Required to reveal a mnemonic. Hardware wallets do not need one.
    pub security_password: Option<Password>,
}

impl Credentials {
    pub fn new(
        wallet_id: impl Into<String>,
        account_index: u32,
        unlock_password: Password,
        security_password: Option<Password>,
    ) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            account_index,
            unlock_password,
            security_password,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("wallet_id", &self.wallet_id)
            .field("account_index", &self.account_index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let creds = Credentials::new(
            "w1",
            0,
            Password::new("hunter2"),
            Some(Password::new("s3cret")),
        );
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("w1"));

        let m = Mnemonic::new("abandon abandon art");
        assert_eq!(format!("{m:?}"), "Mnemonic(***)");
    }

    #[test]
    fn mnemonic_zeroizes() {
        let mut m = Mnemonic::new("abandon abandon art");
        m.zeroize();
        assert!(m.expose_phrase().is_empty());
    }
}
