//! Messages in the `{typeUrl, value}` form consumed by protobuf signing.

use prost::Message;
use serde::Serialize;

use crate::proto;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SigningValue {
    Delegate(proto::MsgDelegate),
    Undelegate(proto::MsgUndelegate),
    BeginRedelegate(proto::MsgBeginRedelegate),
    WithdrawDelegatorReward(proto::MsgWithdrawDelegatorReward),
    Send(proto::MsgSend),
}

/// A protobuf-typed message: the type URL plus a camelCase field map.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningMessage {
    pub type_url: &'static str,
    pub value: SigningValue,
}

impl SigningValue {
    pub fn encode_to_vec(&self) -> Vec<u8> {
        match self {
            Self::Delegate(m) => m.encode_to_vec(),
            Self::Undelegate(m) => m.encode_to_vec(),
            Self::BeginRedelegate(m) => m.encode_to_vec(),
            Self::WithdrawDelegatorReward(m) => m.encode_to_vec(),
            Self::Send(m) => m.encode_to_vec(),
        }
    }
}

impl SigningMessage {
    pub fn to_any(&self) -> proto::Any {
        proto::Any {
            type_url: self.type_url.to_string(),
            value: self.value.encode_to_vec(),
        }
    }
}
