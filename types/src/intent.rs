//! User intents: one requested blockchain operation, before normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::Amount;

/// A user-originated request to perform one operation.
///
/// The JSON form matches what UI collaborators produce:
/// `{"type": "delegate", "delegator": …, "validator": …, "amount": 100, "denom": "uatom"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Intent {
    Delegate {
        delegator: String,
        validator: String,
        amount: Amount,
        denom: String,
    },
    Undelegate {
        delegator: String,
        validator: String,
        amount: Amount,
        denom: String,
    },
    #[serde(rename_all = "camelCase")]
    Redelegate {
        delegator: String,
        from_validator: String,
        to_validator: String,
        amount: Amount,
        denom: String,
    },
    #[serde(rename = "withdraw reward", alias = "withdraw_reward")]
    WithdrawReward { delegator: String, validator: String },
    Send {
        from: String,
        to: String,
        amount: Amount,
        denom: String,
    },
}

/// The operation kind of an [`Intent`], without its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Delegate,
    Undelegate,
    Redelegate,
    WithdrawReward,
    Send,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::Delegate { .. } => IntentKind::Delegate,
            Self::Undelegate { .. } => IntentKind::Undelegate,
            Self::Redelegate { .. } => IntentKind::Redelegate,
            Self::WithdrawReward { .. } => IntentKind::WithdrawReward,
            Self::Send { .. } => IntentKind::Send,
        }
    }

    /// The account that must sign this operation.
    pub fn signer(&self) -> &str {
        match self {
            Self::Delegate { delegator, .. }
            | Self::Undelegate { delegator, .. }
            | Self::Redelegate { delegator, .. }
            | Self::WithdrawReward { delegator, .. } => delegator,
            Self::Send { from, .. } => from,
        }
    }
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delegate => "delegate",
            Self::Undelegate => "undelegate",
            Self::Redelegate => "redelegate",
            Self::WithdrawReward => "withdraw reward",
            Self::Send => "send",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ui_delegate_payload() {
        let intent: Intent = serde_json::from_str(
            r#"{"type":"delegate","delegator":"addrA","validator":"addrV","amount":100,"denom":"uatom"}"#,
        )
        .unwrap();
        assert_eq!(intent.kind(), IntentKind::Delegate);
        assert_eq!(intent.signer(), "addrA");
    }

    #[test]
    fn parses_redelegate_camel_case_fields() {
        let intent: Intent = serde_json::from_str(
            r#"{"type":"redelegate","delegator":"d","fromValidator":"v1","toValidator":"v2","amount":"7","denom":"uatom"}"#,
        )
        .unwrap();
        match intent {
            Intent::Redelegate {
                from_validator,
                to_validator,
                ..
            } => {
                assert_eq!(from_validator, "v1");
                assert_eq!(to_validator, "v2");
            }
            other => panic!("unexpected intent {other:?}"),
        }
    }

    #[test]
    fn withdraw_reward_accepts_both_spellings() {
        for tag in ["withdraw reward", "withdraw_reward"] {
            let json = format!(r#"{{"type":"{tag}","delegator":"d","validator":"v"}}"#);
            let intent: Intent = serde_json::from_str(&json).unwrap();
            assert_eq!(intent.kind(), IntentKind::WithdrawReward);
        }
    }

    #[test]
    fn unknown_intent_type_rejected() {
        let result = serde_json::from_str::<Intent>(r#"{"type":"vote","proposal":1}"#);
        assert!(result.is_err());
    }
}
