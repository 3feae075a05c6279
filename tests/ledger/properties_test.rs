// Property Tests
// Long random operation sequences checked against the ledger invariants

use crate::{accept, refuse, snapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stakeledger::identity::Address;
use stakeledger::ledger::{Amount, Ledger, LedgerError};

const ACCOUNTS: u8 = 6;
const STEPS: usize = 2_000;

fn account(i: u8) -> Address {
    Address::from_bytes([i + 1; 20])
}

fn check_invariants(ledger: &Ledger) {
    let sum: u128 = (0..ACCOUNTS)
        .map(|i| ledger.balance_of(&account(i)).base_units())
        .sum();
    assert_eq!(ledger.total_value().base_units(), sum, "conservation");

    let positive = (0..ACCOUNTS)
        .filter(|i| !ledger.balance_of(&account(*i)).is_zero())
        .count() as u64;
    assert_eq!(ledger.depositor_count(), positive, "count correctness");
    assert_eq!(ledger.depositors().count() as u64, positive);
}

fn run_sequence(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ledger = Ledger::new();

    for _ in 0..STEPS {
        let who = account(rng.gen_range(0..ACCOUNTS));
        // Small amounts, zero included, so every branch is exercised
        let amount = Amount::from_base_units(rng.gen_range(0..50));
        let before = snapshot(&ledger);

        let result = match rng.gen_range(0..3) {
            0 => ledger.deposit(who, amount),
            1 => ledger.withdraw(who, amount, &mut accept),
            _ => ledger.withdraw(who, amount, &mut refuse),
        };

        match &result {
            Ok(()) => assert_eq!(ledger.events().len(), before.events + 1),
            Err(LedgerError::InvalidAmount) => assert!(amount.is_zero()),
            Err(LedgerError::InsufficientBalance { available, requested }) => {
                assert!(requested.is_zero() || requested > available);
            }
            Err(LedgerError::TransferFailed(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
        if result.is_err() {
            assert_eq!(snapshot(&ledger), before, "failed operation left a trace");
        }

        check_invariants(&ledger);
        assert!(!ledger.in_transaction());
    }
}

#[test]
fn test_invariants_hold_over_random_sequences() {
    for seed in [1, 7, 42, 1337] {
        run_sequence(seed);
    }
}

#[test]
fn test_withdraw_everything_drains_ledger() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut ledger = Ledger::new();

    for _ in 0..200 {
        let who = account(rng.gen_range(0..ACCOUNTS));
        let amount = Amount::from_base_units(rng.gen_range(1..1_000));
        ledger.deposit(who, amount).unwrap();
    }

    for i in 0..ACCOUNTS {
        let balance = ledger.balance_of(&account(i));
        if !balance.is_zero() {
            ledger.withdraw(account(i), balance, &mut accept).unwrap();
        }
    }

    assert_eq!(ledger.total_value(), Amount::ZERO);
    assert_eq!(ledger.depositor_count(), 0);
}
