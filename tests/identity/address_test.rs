// Address Tests
// Deriving, rendering and parsing account addresses

use stakeledger::identity::{Address, AddressError, Keypair, PublicKey, ADDRESS_LEN};

#[test]
fn test_address_derivation_is_deterministic() {
    let keypair = Keypair::generate();

    assert_eq!(keypair.address(), keypair.public_key().address());
    assert_eq!(
        keypair.address(),
        Address::from_public_key(&keypair.public_key())
    );
}

#[test]
fn test_distinct_keys_give_distinct_addresses() {
    let a = Keypair::generate();
    let b = Keypair::generate();

    assert_ne!(a.address(), b.address());
}

#[test]
fn test_public_key_bytes_roundtrip() {
    let keypair = Keypair::generate();
    let restored = PublicKey::from_bytes(keypair.public_key().as_bytes()).unwrap();

    assert_eq!(restored.address(), keypair.address());
}

#[test]
fn test_display_format() {
    let addr = Address::from_bytes([0x0f; ADDRESS_LEN]);
    let rendered = addr.to_string();

    assert!(rendered.starts_with("0x"));
    assert_eq!(rendered.len(), 2 + ADDRESS_LEN * 2);
    assert_eq!(rendered, format!("0x{}", "0f".repeat(ADDRESS_LEN)));
}

#[test]
fn test_parse_accepts_uppercase_prefix_and_digits() {
    let parsed = Address::parse("0XABABABABABABABABABABABABABABABABABABABAB").unwrap();
    assert_eq!(parsed, Address::from_bytes([0xab; ADDRESS_LEN]));
}

#[test]
fn test_parse_rejects_wrong_length() {
    assert_eq!(
        Address::parse("0x0102"),
        Err(AddressError::InvalidLength {
            expected: ADDRESS_LEN,
            got: 2,
        })
    );
}

#[test]
fn test_parse_rejects_non_hex() {
    assert!(matches!(
        Address::parse("0xzz"),
        Err(AddressError::InvalidHex(_))
    ));
}

#[test]
fn test_zero_address() {
    assert_eq!(Address::ZERO.as_bytes(), &[0u8; ADDRESS_LEN]);
    assert!(Address::ZERO < Address::from_bytes([1; ADDRESS_LEN]));
}
