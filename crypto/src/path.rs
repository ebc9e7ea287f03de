//! BIP44 derivation paths for Cosmos-style accounts.

use std::fmt;
use std::str::FromStr;

use crate::error::CryptoError;

/// The path `m/44'/<coin_type>'/0'/0/<account_index>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HdPath {
    pub coin_type: u32,
    pub account_index: u32,
}

impl HdPath {
    pub fn new(coin_type: u32, account_index: u32) -> Self {
        Self {
            coin_type,
            account_index,
        }
    }

    pub fn to_bip32(&self) -> Result<bip32::DerivationPath, CryptoError> {
        bip32::DerivationPath::from_str(&self.to_string())
            .map_err(|e| CryptoError::Derivation(e.to_string()))
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m/44'/{}'/0'/0/{}", self.coin_type, self.account_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_cosmos_path() {
        assert_eq!(HdPath::new(118, 0).to_string(), "m/44'/118'/0'/0/0");
        assert_eq!(HdPath::new(852, 7).to_string(), "m/44'/852'/0'/0/7");
    }

    #[test]
    fn converts_to_bip32() {
        let path = HdPath::new(118, 3).to_bip32().unwrap();
        assert_eq!(path.to_string(), "m/44'/118'/0'/0/3");
    }
}
