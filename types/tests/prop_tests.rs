use proptest::prelude::*;

use fbx_types::{Amount, Intent};

proptest! {
    /// Any u128 converts to an Amount whose string parses back to the same value.
    #[test]
    fn amount_from_integer_is_decimal(v in any::<u128>()) {
        let amount = Amount::from(v);
        prop_assert_eq!(amount.as_str().parse::<u128>().unwrap(), v);
        prop_assert_eq!(Amount::new(amount.as_str()).unwrap(), amount);
    }

    /// Strings containing a non-digit are always rejected.
    #[test]
    fn amount_rejects_non_digits(prefix in "[0-9]{0,5}", bad in "[^0-9]", suffix in "[0-9]{0,5}") {
        let raw = format!("{prefix}{bad}{suffix}");
        prop_assert!(Amount::new(raw).is_err());
    }

    /// Leading zeros are rejected for any multi-digit value.
    #[test]
    fn amount_rejects_leading_zeros(rest in "[0-9]{1,20}") {
        let raw = format!("0{rest}");
        prop_assert!(Amount::new(raw).is_err());
    }

    /// JSON integer amounts deserialize into the same decimal string.
    #[test]
    fn send_intent_amount_from_json_integer(v in any::<u64>()) {
        let json = format!(
            r#"{{"type":"send","from":"a","to":"b","amount":{v},"denom":"uatom"}}"#
        );
        let intent: Intent = serde_json::from_str(&json).unwrap();
        match intent {
            Intent::Send { amount, .. } => prop_assert_eq!(amount.as_str(), v.to_string()),
            other => prop_assert!(false, "unexpected intent {:?}", other),
        }
    }
}
