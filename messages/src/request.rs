//! Transaction requests and the legacy amino sign document.

use fbx_types::{Coin, Ecosystem, Intent, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::amino::ChainMessage;
use crate::normalize::{normalize, to_signing_shape};
use crate::signing::SigningMessage;

/// Transaction fee. `gas` travels as a decimal string on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    #[serde(with = "gas_string")]
    pub gas: u64,
}

impl Fee {
    pub fn new(amount: Vec<Coin>, gas: u64) -> Self {
        Self { amount, gas }
    }
}

mod gas_string {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(gas: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&gas.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        struct GasVisitor;

        impl<'de> Visitor<'de> for GasVisitor {
            type Value = u64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a gas limit as integer or decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
                Ok(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
                v.parse().map_err(|_| E::custom(format!("invalid gas limit {v:?}")))
            }
        }

        deserializer.deserialize_any(GasVisitor)
    }
}

/// Account position a transaction is signed against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequencing {
    pub account_number: u64,
    pub sequence: u64,
    pub chain_id: String,
}

/// Messages plus fee and memo, ready for a signer.
///
/// There is no mutable access: once built, a request is only read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    messages: Vec<ChainMessage>,
    fee: Fee,
    memo: String,
    sequencing: Option<Sequencing>,
}

impl TransactionRequest {
    /// Normalize every intent and bundle the results.
    pub fn build(
        ecosystem: &Ecosystem,
        intents: Vec<Intent>,
        fee: Fee,
        memo: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let messages = intents
            .into_iter()
            .map(|intent| normalize(ecosystem, intent))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_messages(messages, fee, memo)
    }

    pub fn from_messages(
        messages: Vec<ChainMessage>,
        fee: Fee,
        memo: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if messages.is_empty() {
            return Err(ValidationError::EmptyTransaction);
        }
        Ok(Self {
            messages,
            fee,
            memo: memo.into(),
            sequencing: None,
        })
    }

    /// Pin account number, sequence and chain id instead of querying the chain.
    pub fn with_sequencing(mut self, sequencing: Sequencing) -> Self {
        self.sequencing = Some(sequencing);
        self
    }

    pub fn messages(&self) -> &[ChainMessage] {
        &self.messages
    }

    pub fn fee(&self) -> &Fee {
        &self.fee
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn sequencing(&self) -> Option<&Sequencing> {
        self.sequencing.as_ref()
    }

    pub fn signing_messages(&self) -> Result<Vec<SigningMessage>, ValidationError> {
        self.messages.iter().map(to_signing_shape).collect()
    }

    pub fn sign_doc(&self, sequencing: &Sequencing) -> StdSignDoc {
        StdSignDoc {
            account_number: sequencing.account_number.to_string(),
            chain_id: sequencing.chain_id.clone(),
            fee: self.fee.clone(),
            memo: self.memo.clone(),
            msgs: self.messages.clone(),
            sequence: sequencing.sequence.to_string(),
        }
    }
}

/// The document a legacy amino signer approves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignDoc {
    pub account_number: String,
    pub chain_id: String,
    pub fee: Fee,
    pub memo: String,
    pub msgs: Vec<ChainMessage>,
    pub sequence: String,
}

impl StdSignDoc {
    /// Canonical bytes: keys sorted at every level, no whitespace, and
    /// `&`, `<`, `>` escaped as unicode sequences.
    pub fn to_sign_bytes(&self) -> Result<Vec<u8>, ValidationError> {
        let value =
            serde_json::to_value(self).map_err(|e| ValidationError::MalformedMessage(e.to_string()))?;
        let canonical = serde_json::to_string(&sorted(value))
            .map_err(|e| ValidationError::MalformedMessage(e.to_string()))?;
        Ok(canonical
            .replace('&', "\\u0026")
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .into_bytes())
    }
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = Map::new();
            for (key, value) in entries {
                out.insert(key, sorted(value));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbx_types::Amount;

    fn fee() -> Fee {
        Fee::new(vec![Coin::new(5000u64, "uatom")], 200_000)
    }

    fn delegate(memo_denom: &str) -> Intent {
        Intent::Delegate {
            delegator: "addrA".into(),
            validator: "addrV".into(),
            amount: Amount::from(100u64),
            denom: memo_denom.into(),
        }
    }

    #[test]
    fn empty_intents_are_rejected() {
        let err = TransactionRequest::build(&Ecosystem::Cosmos, vec![], fee(), "").unwrap_err();
        assert_eq!(err, ValidationError::EmptyTransaction);
    }

    #[test]
    fn build_keeps_intent_order() {
        let req = TransactionRequest::build(
            &Ecosystem::Cosmos,
            vec![
                delegate("uatom"),
                Intent::WithdrawReward {
                    delegator: "addrA".into(),
                    validator: "addrV".into(),
                },
            ],
            fee(),
            "memo",
        )
        .unwrap();
        assert_eq!(req.messages().len(), 2);
        assert_eq!(req.messages()[1].legacy_type(), "cosmos-sdk/MsgWithdrawDelegationReward");
        assert_eq!(req.memo(), "memo");
        assert!(req.sequencing().is_none());
    }

    #[test]
    fn one_bad_intent_fails_the_whole_request() {
        let err = TransactionRequest::build(
            &Ecosystem::Cosmos,
            vec![delegate("uatom"), delegate("")],
            fee(),
            "",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("denom"));
    }

    #[test]
    fn fee_gas_is_a_string() {
        let json = serde_json::to_value(fee()).unwrap();
        assert_eq!(json["gas"], "200000");
        let back: Fee = serde_json::from_str(r#"{"amount":[],"gas":300000}"#).unwrap();
        assert_eq!(back.gas, 300_000);
    }

    #[test]
    fn sign_bytes_are_sorted_and_escaped() {
        let req = TransactionRequest::build(&Ecosystem::Cosmos, vec![delegate("uatom")], fee(), "a<b>&c")
            .unwrap();
        let doc = req.sign_doc(&Sequencing {
            account_number: 7,
            sequence: 3,
            chain_id: "cosmoshub-4".into(),
        });
        let bytes = String::from_utf8(doc.to_sign_bytes().unwrap()).unwrap();
        assert_eq!(
            bytes,
            concat!(
                r#"{"account_number":"7","chain_id":"cosmoshub-4","#,
                r#""fee":{"amount":[{"amount":"5000","denom":"uatom"}],"gas":"200000"},"#,
                r#""memo":"a\u003cb\u003e\u0026c","#,
                r#""msgs":[{"type":"cosmos-sdk/MsgDelegate","value":{"amount":{"amount":"100","denom":"uatom"},"#,
                r#""delegator_address":"addrA","validator_address":"addrV"}}],"#,
                r#""sequence":"3"}"#
            )
        );
    }
}
