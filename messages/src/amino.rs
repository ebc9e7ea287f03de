//! Legacy chain messages in the `{type, value}` amino JSON form.

use fbx_types::{Coin, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::type_url_for;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgDelegate {
    pub delegator_address: String,
    pub validator_address: String,
    pub amount: Coin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgUndelegate {
    pub delegator_address: String,
    pub validator_address: String,
    pub amount: Coin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgBeginRedelegate {
    pub delegator_address: String,
    pub validator_src_address: String,
    pub validator_dst_address: String,
    pub amount: Coin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgWithdrawDelegationReward {
    pub delegator_address: String,
    pub validator_address: String,
}

/// Bank transfer. `amount` is a coin array even for a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Vec<Coin>,
}

/// A chain-ready message.
///
/// Serializes as `{"type": "cosmos-sdk/MsgDelegate", "value": {...}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ChainMessage {
    #[serde(rename = "cosmos-sdk/MsgDelegate")]
    Delegate(MsgDelegate),
    #[serde(rename = "cosmos-sdk/MsgUndelegate")]
    Undelegate(MsgUndelegate),
    #[serde(rename = "cosmos-sdk/MsgBeginRedelegate")]
    BeginRedelegate(MsgBeginRedelegate),
    #[serde(rename = "cosmos-sdk/MsgWithdrawDelegationReward")]
    WithdrawDelegationReward(MsgWithdrawDelegationReward),
    #[serde(rename = "cosmos-sdk/MsgSend")]
    Send(MsgSend),
}

impl ChainMessage {
    pub fn legacy_type(&self) -> &'static str {
        match self {
            Self::Delegate(_) => "cosmos-sdk/MsgDelegate",
            Self::Undelegate(_) => "cosmos-sdk/MsgUndelegate",
            Self::BeginRedelegate(_) => "cosmos-sdk/MsgBeginRedelegate",
            Self::WithdrawDelegationReward(_) => "cosmos-sdk/MsgWithdrawDelegationReward",
            Self::Send(_) => "cosmos-sdk/MsgSend",
        }
    }

    /// Address that has to sign this message.
    pub fn signer(&self) -> &str {
        match self {
            Self::Delegate(m) => &m.delegator_address,
            Self::Undelegate(m) => &m.delegator_address,
            Self::BeginRedelegate(m) => &m.delegator_address,
            Self::WithdrawDelegationReward(m) => &m.delegator_address,
            Self::Send(m) => &m.from_address,
        }
    }

    /// Parse an already-built legacy message, e.g. one handed over by a UI
    /// layer that skipped intent normalization.
    ///
    /// Types outside the translation table fail with
    /// [`ValidationError::UnrecognizedMessageType`] rather than being dropped.
    pub fn from_legacy_json(value: Value) -> Result<Self, ValidationError> {
        let ty = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingField("type"))?;
        type_url_for(ty)?;
        serde_json::from_value(value).map_err(|e| ValidationError::MalformedMessage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delegate_serializes_in_legacy_form() {
        let msg = ChainMessage::Delegate(MsgDelegate {
            delegator_address: "addrA".into(),
            validator_address: "addrV".into(),
            amount: Coin::new(100u64, "uatom"),
        });
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "cosmos-sdk/MsgDelegate",
                "value": {
                    "delegator_address": "addrA",
                    "validator_address": "addrV",
                    "amount": { "amount": "100", "denom": "uatom" }
                }
            })
        );
    }

    #[test]
    fn from_legacy_json_accepts_known_types() {
        let msg = ChainMessage::from_legacy_json(json!({
            "type": "cosmos-sdk/MsgWithdrawDelegationReward",
            "value": { "delegator_address": "d", "validator_address": "v" }
        }))
        .unwrap();
        assert_eq!(msg.signer(), "d");
        assert_eq!(msg.legacy_type(), "cosmos-sdk/MsgWithdrawDelegationReward");
    }

    #[test]
    fn from_legacy_json_rejects_unknown_type() {
        let err = ChainMessage::from_legacy_json(json!({
            "type": "cosmos-sdk/MsgVote",
            "value": { "voter": "d", "proposal_id": "1", "option": 1 }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnrecognizedMessageType("cosmos-sdk/MsgVote".into())
        );
    }

    #[test]
    fn from_legacy_json_rejects_missing_type() {
        let err = ChainMessage::from_legacy_json(json!({ "value": {} })).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("type"));
    }

    #[test]
    fn from_legacy_json_rejects_wrong_shape() {
        let err = ChainMessage::from_legacy_json(json!({
            "type": "cosmos-sdk/MsgSend",
            "value": { "from_address": "a", "to_address": "b", "amount": { "amount": "1", "denom": "uatom" } }
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::MalformedMessage(_)));
    }
}
