//! Wire format of the secrets channel.
//!
//! Every message is a JSON [`Frame`]; the holder echoes the request id in its
//! reply so the client can tell a late answer from the one it is waiting for.

use fbx_types::{Mnemonic, Password};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize)]
pub struct Frame<T> {
    pub id: u64,
    pub payload: T,
}

impl<T> fmt::Debug for Frame<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum SecretsRequest {
    Ping,
    ViewMnemonicPhrase(ViewMnemonicPhrase),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewMnemonicPhrase {
    /// Wallet id.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_password: Option<Password>,
    pub password: Password,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretsResponse {
    Ok(Revealed),
    Error(WireError),
}

/// Successful reply. `mnemonic` is absent for hardware wallets and pings.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Revealed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<Mnemonic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    pub kind: WireErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireErrorKind {
    InvalidUnlockPassword,
    InvalidSecurityPassword,
    WalletNotFound,
    BadRequest,
    Internal,
}

impl SecretsResponse {
    pub fn error(kind: WireErrorKind, message: impl Into<String>) -> Self {
        Self::Error(WireError {
            kind,
            message: message.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn view_request_wire_shape() {
        let frame = Frame {
            id: 3,
            payload: SecretsRequest::ViewMnemonicPhrase(ViewMnemonicPhrase {
                id: "w1".into(),
                security_password: Some(Password::new("sec")),
                password: Password::new("unlock"),
            }),
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({
                "id": 3,
                "payload": {
                    "event": "viewMnemonicPhrase",
                    "data": { "id": "w1", "securityPassword": "sec", "password": "unlock" }
                }
            })
        );
    }

    #[test]
    fn ping_has_no_data() {
        let text = serde_json::to_string(&SecretsRequest::Ping).unwrap();
        assert_eq!(text, r#"{"event":"ping"}"#);
        let back: SecretsRequest = serde_json::from_str(&text).unwrap();
        assert!(matches!(back, SecretsRequest::Ping));
    }

    #[test]
    fn response_wire_shapes() {
        let ok = SecretsResponse::Ok(Revealed {
            mnemonic: Some(Mnemonic::new("abandon art")),
        });
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "ok": { "mnemonic": "abandon art" } })
        );
        let hw = SecretsResponse::Ok(Revealed::default());
        assert_eq!(serde_json::to_value(&hw).unwrap(), json!({ "ok": {} }));

        let err = SecretsResponse::error(WireErrorKind::WalletNotFound, "no such wallet");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({ "error": { "kind": "walletNotFound", "message": "no such wallet" } })
        );
    }

    #[test]
    fn frame_debug_hides_payload() {
        let frame = Frame {
            id: 1,
            payload: SecretsRequest::ViewMnemonicPhrase(ViewMnemonicPhrase {
                id: "w".into(),
                security_password: None,
                password: Password::new("hunter2"),
            }),
        };
        assert!(!format!("{frame:?}").contains("hunter2"));
    }
}
