use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use kernel_domain::error::ValidationError;
use kernel_domain::value_object::ValueObject;
use kernel_macros::value_object;
use proptest::prelude::*;

fn check_money(money: &Money) -> Result<(), ValidationError> {
    if money.currency.len() != 3 {
        return Err(ValidationError::new("Money", "currency", "expected ISO 4217 code"));
    }
    if money.amount < 0 {
        return Err(ValidationError::new("Money", "amount", "must not be negative"));
    }
    Ok(())
}

#[value_object(validate = check_money)]
struct Money {
    amount: i64,
    currency: String,
}

fn money(amount: i64, currency: &str) -> Result<Money, ValidationError> {
    Money {
        amount,
        currency: currency.to_string(),
    }
    .validated()
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn money_strategy() -> impl Strategy<Value = Money> {
    (0i64..5, prop::sample::select(vec!["USD", "EUR", "CNY"]))
        .prop_map(|(amount, currency)| money(amount, currency).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn equality_is_symmetric(a in money_strategy(), b in money_strategy()) {
        prop_assert_eq!(a == b, b == a);
    }

    #[test]
    fn equality_is_transitive(a in money_strategy(), b in money_strategy(), c in money_strategy()) {
        if a == b && b == c {
            prop_assert_eq!(&a, &c);
        }
    }

    #[test]
    fn hash_is_consistent_with_equality(a in money_strategy(), b in money_strategy()) {
        if a == b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
            prop_assert_eq!(a.structural_key().unwrap(), b.structural_key().unwrap());
        }
    }

    #[test]
    fn with_changes_leaves_original_unchanged(a in money_strategy(), delta in 0i64..1000) {
        let snapshot = a.clone();
        let changed = a.with_changes(|m| m.amount += delta).unwrap();
        prop_assert_eq!(&a, &snapshot);
        prop_assert_eq!(changed.amount, a.amount + delta);
    }

    #[test]
    fn invalid_changes_are_rejected(a in money_strategy(), bad in "[A-Z]{4,6}") {
        let err = a.with_changes(|m| m.currency = bad.clone()).unwrap_err();
        prop_assert_eq!(err.component(), "currency");
        prop_assert_eq!(a.currency.len(), 3);
    }
}

#[test]
fn construction_names_the_failing_component() {
    let err = money(-1, "USD").unwrap_err();
    assert_eq!(err.value_type(), "Money");
    assert_eq!(err.component(), "amount");
}
