//! Intent normalization and the legacy-to-protobuf type translation.

use fbx_types::{Amount, Coin, Ecosystem, Intent, ValidationError};

use crate::amino::{
    ChainMessage, MsgBeginRedelegate, MsgDelegate, MsgSend, MsgUndelegate,
    MsgWithdrawDelegationReward,
};
use crate::proto;
use crate::signing::{SigningMessage, SigningValue};

/// Legacy amino type to protobuf type URL. Fixed at build time.
///
/// Note that the distribution message changes name between the two forms
/// (`DelegationReward` vs `DelegatorReward`).
pub const TYPE_URL_TABLE: [(&str, &str); 5] = [
    ("cosmos-sdk/MsgDelegate", "/cosmos.staking.v1beta1.MsgDelegate"),
    ("cosmos-sdk/MsgUndelegate", "/cosmos.staking.v1beta1.MsgUndelegate"),
    (
        "cosmos-sdk/MsgBeginRedelegate",
        "/cosmos.staking.v1beta1.MsgBeginRedelegate",
    ),
    (
        "cosmos-sdk/MsgWithdrawDelegationReward",
        "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward",
    ),
    ("cosmos-sdk/MsgSend", "/cosmos.bank.v1beta1.MsgSend"),
];

pub fn type_url_for(legacy_type: &str) -> Result<&'static str, ValidationError> {
    TYPE_URL_TABLE
        .iter()
        .find(|(legacy, _)| *legacy == legacy_type)
        .map(|(_, url)| *url)
        .ok_or_else(|| ValidationError::UnrecognizedMessageType(legacy_type.to_string()))
}

fn require(value: &str, field: &'static str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value.to_string())
}

fn coin(amount: Amount, denom: &str) -> Result<Coin, ValidationError> {
    Ok(Coin::new(amount, require(denom, "denom")?))
}

/// Map one intent into its chain message for the given ecosystem.
///
/// Pure: same input, same output. Amounts are carried as decimal strings
/// and are never re-scaled.
pub fn normalize(ecosystem: &Ecosystem, intent: Intent) -> Result<ChainMessage, ValidationError> {
    if let Ecosystem::Other(name) = ecosystem {
        return Err(ValidationError::UnsupportedEcosystem(name.clone()));
    }
    let msg = match intent {
        Intent::Delegate {
            delegator,
            validator,
            amount,
            denom,
        } => ChainMessage::Delegate(MsgDelegate {
            delegator_address: require(&delegator, "delegator")?,
            validator_address: require(&validator, "validator")?,
            amount: coin(amount, &denom)?,
        }),
        Intent::Undelegate {
            delegator,
            validator,
            amount,
            denom,
        } => ChainMessage::Undelegate(MsgUndelegate {
            delegator_address: require(&delegator, "delegator")?,
            validator_address: require(&validator, "validator")?,
            amount: coin(amount, &denom)?,
        }),
        Intent::Redelegate {
            delegator,
            from_validator,
            to_validator,
            amount,
            denom,
        } => ChainMessage::BeginRedelegate(MsgBeginRedelegate {
            delegator_address: require(&delegator, "delegator")?,
            validator_src_address: require(&from_validator, "fromValidator")?,
            validator_dst_address: require(&to_validator, "toValidator")?,
            amount: coin(amount, &denom)?,
        }),
        Intent::WithdrawReward {
            delegator,
            validator,
        } => ChainMessage::WithdrawDelegationReward(MsgWithdrawDelegationReward {
            delegator_address: require(&delegator, "delegator")?,
            validator_address: require(&validator, "validator")?,
        }),
        Intent::Send {
            from,
            to,
            amount,
            denom,
        } => ChainMessage::Send(MsgSend {
            from_address: require(&from, "from")?,
            to_address: require(&to, "to")?,
            amount: vec![coin(amount, &denom)?],
        }),
    };
    Ok(msg)
}

fn proto_coin(coin: &Coin) -> proto::Coin {
    proto::Coin {
        denom: coin.denom.clone(),
        amount: coin.amount.to_string(),
    }
}

/// Translate a legacy message to its protobuf signing form.
///
/// Field values carry over unchanged; only field names move to camelCase.
pub fn to_signing_shape(msg: &ChainMessage) -> Result<SigningMessage, ValidationError> {
    let type_url = type_url_for(msg.legacy_type())?;
    let value = match msg {
        ChainMessage::Delegate(m) => SigningValue::Delegate(proto::MsgDelegate {
            delegator_address: m.delegator_address.clone(),
            validator_address: m.validator_address.clone(),
            amount: Some(proto_coin(&m.amount)),
        }),
        ChainMessage::Undelegate(m) => SigningValue::Undelegate(proto::MsgUndelegate {
            delegator_address: m.delegator_address.clone(),
            validator_address: m.validator_address.clone(),
            amount: Some(proto_coin(&m.amount)),
        }),
        ChainMessage::BeginRedelegate(m) => SigningValue::BeginRedelegate(proto::MsgBeginRedelegate {
            delegator_address: m.delegator_address.clone(),
            validator_src_address: m.validator_src_address.clone(),
            validator_dst_address: m.validator_dst_address.clone(),
            amount: Some(proto_coin(&m.amount)),
        }),
        ChainMessage::WithdrawDelegationReward(m) => {
            SigningValue::WithdrawDelegatorReward(proto::MsgWithdrawDelegatorReward {
                delegator_address: m.delegator_address.clone(),
                validator_address: m.validator_address.clone(),
            })
        }
        ChainMessage::Send(m) => SigningValue::Send(proto::MsgSend {
            from_address: m.from_address.clone(),
            to_address: m.to_address.clone(),
            amount: m.amount.iter().map(proto_coin).collect(),
        }),
    };
    Ok(SigningMessage { type_url, value })
}
