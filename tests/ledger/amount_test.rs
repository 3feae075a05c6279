// Amount Tests
// Decimal parsing and rendering of native-asset quantities

use stakeledger::ledger::{Amount, AmountError, DECIMALS};

#[test]
fn test_one_unit_has_eighteen_decimals() {
    assert_eq!(DECIMALS, 18);
    assert_eq!(Amount::ONE.base_units(), 1_000_000_000_000_000_000);
    assert_eq!(Amount::from_units(3), Amount::parse("3.0").unwrap());
}

#[test]
fn test_parse_fractions() {
    assert_eq!(
        Amount::parse("0.5").unwrap().base_units(),
        500_000_000_000_000_000
    );
    assert_eq!(
        Amount::parse("1.1").unwrap().base_units(),
        1_100_000_000_000_000_000
    );
    assert_eq!(
        Amount::parse("0.000000000000000001").unwrap(),
        Amount::from_base_units(1)
    );
}

#[test]
fn test_parse_trims_whitespace() {
    assert_eq!(Amount::parse(" 2.5 ").unwrap(), "2.5".parse().unwrap());
}

#[test]
fn test_parse_rejects_garbage() {
    assert_eq!(Amount::parse(""), Err(AmountError::Empty));
    assert!(matches!(Amount::parse("-1"), Err(AmountError::Malformed(_))));
    assert!(matches!(Amount::parse("1."), Err(AmountError::Malformed(_))));
    assert!(matches!(Amount::parse(".5"), Err(AmountError::Malformed(_))));
    assert!(matches!(Amount::parse("1.2.3"), Err(AmountError::Malformed(_))));
    assert!(matches!(Amount::parse("abc"), Err(AmountError::Malformed(_))));
}

#[test]
fn test_parse_rejects_excess_precision() {
    assert_eq!(
        Amount::parse("0.0000000000000000001"),
        Err(AmountError::TooManyDecimals { max: 18, got: 19 })
    );
}

#[test]
fn test_parse_rejects_overflow() {
    assert_eq!(
        Amount::parse("999999999999999999999999999999"),
        Err(AmountError::Overflow)
    );
}

#[test]
fn test_display_roundtrips() {
    for s in ["0.0", "1.0", "0.5", "12.345", "0.000000000000000001"] {
        assert_eq!(Amount::parse(s).unwrap().to_string(), s);
    }
}

#[test]
fn test_checked_arithmetic() {
    let one = Amount::ONE;
    assert_eq!(one.checked_sub(Amount::from_units(2)), None);
    assert_eq!(
        Amount::from_base_units(u128::MAX).checked_add(Amount::from_base_units(1)),
        None
    );
    assert_eq!(one.checked_add(one), Some(Amount::from_units(2)));
}
