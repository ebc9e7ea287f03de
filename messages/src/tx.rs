//! Protobuf transaction assembly: body, auth info, sign doc and `TxRaw`.

use prost::Message;

use crate::proto;
use crate::request::Fee;
use crate::signing::SigningMessage;

/// Signing modes as numbered in `cosmos.tx.signing.v1beta1.SignMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum SignMode {
    Direct = 1,
    LegacyAminoJson = 127,
}

/// Encoded body and auth info awaiting a signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTx {
    body_bytes: Vec<u8>,
    auth_info_bytes: Vec<u8>,
}

impl UnsignedTx {
    pub fn new(
        messages: &[SigningMessage],
        memo: &str,
        public_key: &[u8; 33],
        sequence: u64,
        fee: &Fee,
        mode: SignMode,
    ) -> Self {
        let body = proto::TxBody {
            messages: messages.iter().map(SigningMessage::to_any).collect(),
            memo: memo.to_string(),
            timeout_height: 0,
        };
        let signer = proto::SignerInfo {
            public_key: Some(proto::Any {
                type_url: proto::SECP256K1_PUBKEY_TYPE_URL.to_string(),
                value: proto::PubKey {
                    key: public_key.to_vec(),
                }
                .encode_to_vec(),
            }),
            mode_info: Some(proto::ModeInfo {
                single: Some(proto::ModeInfoSingle { mode: mode as i32 }),
            }),
            sequence,
        };
        let auth_info = proto::AuthInfo {
            signer_infos: vec![signer],
            fee: Some(proto::Fee {
                amount: fee
                    .amount
                    .iter()
                    .map(|c| proto::Coin {
                        denom: c.denom.clone(),
                        amount: c.amount.to_string(),
                    })
                    .collect(),
                gas_limit: fee.gas,
                payer: String::new(),
                granter: String::new(),
            }),
        };
        Self {
            body_bytes: body.encode_to_vec(),
            auth_info_bytes: auth_info.encode_to_vec(),
        }
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    pub fn auth_info_bytes(&self) -> &[u8] {
        &self.auth_info_bytes
    }

    /// Bytes a direct-mode signer signs (after sha256).
    pub fn direct_sign_bytes(&self, chain_id: &str, account_number: u64) -> Vec<u8> {
        proto::SignDoc {
            body_bytes: self.body_bytes.clone(),
            auth_info_bytes: self.auth_info_bytes.clone(),
            chain_id: chain_id.to_string(),
            account_number,
        }
        .encode_to_vec()
    }

    /// Attach the signature and encode the broadcastable `TxRaw`.
    pub fn into_signed(self, signature: &[u8; 64]) -> Vec<u8> {
        proto::TxRaw {
            body_bytes: self.body_bytes,
            auth_info_bytes: self.auth_info_bytes,
            signatures: vec![signature.to_vec()],
        }
        .encode_to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, to_signing_shape};
    use fbx_types::{Amount, Coin, Ecosystem, Intent};

    fn unsigned(mode: SignMode) -> UnsignedTx {
        let msg = normalize(
            &Ecosystem::Cosmos,
            Intent::Send {
                from: "a".into(),
                to: "b".into(),
                amount: Amount::from(12u64),
                denom: "uatom".into(),
            },
        )
        .unwrap();
        let shaped = to_signing_shape(&msg).unwrap();
        UnsignedTx::new(
            &[shaped],
            "hello",
            &[2u8; 33],
            4,
            &Fee::new(vec![Coin::new(10u64, "uatom")], 90_000),
            mode,
        )
    }

    #[test]
    fn auth_info_records_signer_and_mode() {
        let tx = unsigned(SignMode::LegacyAminoJson);
        let auth = proto::AuthInfo::decode(tx.auth_info_bytes()).unwrap();
        let signer = &auth.signer_infos[0];
        assert_eq!(signer.sequence, 4);
        assert_eq!(signer.mode_info.as_ref().unwrap().single.as_ref().unwrap().mode, 127);
        let key = signer.public_key.as_ref().unwrap();
        assert_eq!(key.type_url, proto::SECP256K1_PUBKEY_TYPE_URL);
        assert_eq!(proto::PubKey::decode(key.value.as_slice()).unwrap().key, vec![2u8; 33]);
        assert_eq!(auth.fee.unwrap().gas_limit, 90_000);
    }

    #[test]
    fn body_contains_messages_and_memo() {
        let tx = unsigned(SignMode::Direct);
        let body = proto::TxBody::decode(tx.body_bytes()).unwrap();
        assert_eq!(body.memo, "hello");
        assert_eq!(body.messages[0].type_url, "/cosmos.bank.v1beta1.MsgSend");
    }

    #[test]
    fn sign_doc_binds_chain_and_account() {
        let tx = unsigned(SignMode::Direct);
        let doc = proto::SignDoc::decode(tx.direct_sign_bytes("desmos-mainnet", 9).as_slice()).unwrap();
        assert_eq!(doc.chain_id, "desmos-mainnet");
        assert_eq!(doc.account_number, 9);
        assert_eq!(doc.body_bytes, tx.body_bytes());
    }

    #[test]
    fn signed_tx_carries_one_signature() {
        let tx = unsigned(SignMode::Direct);
        let body = tx.body_bytes().to_vec();
        let raw = proto::TxRaw::decode(tx.into_signed(&[7u8; 64]).as_slice()).unwrap();
        assert_eq!(raw.body_bytes, body);
        assert_eq!(raw.signatures, vec![vec![7u8; 64]]);
    }
}
