// Staking Pool Tests
// Value moving between wallets, custody and the ledger

use stakeledger::identity::{Address, Keypair};
use stakeledger::ledger::{Amount, LedgerError, LedgerEvent};
use stakeledger::pool::{PoolError, StakingPool};
use stakeledger::transfer::{BankError, NativeBank, TransferError};

fn units(s: &str) -> Amount {
    Amount::parse(s).unwrap()
}

fn funded_pool(who: Address, amount: &str) -> StakingPool {
    let mut pool = StakingPool::new();
    pool.fund(who, units(amount)).unwrap();
    pool
}

// ============================================================================
// STAKE
// ============================================================================

#[test]
fn test_stake_moves_wallet_funds_into_custody() {
    let user = Keypair::generate().address();
    let mut pool = funded_pool(user, "5.0");

    pool.stake(user, units("1.0")).unwrap();

    assert_eq!(pool.balance_of(&user), units("1.0"));
    assert_eq!(pool.wallet_balance(&user), units("4.0"));
    assert_eq!(pool.bank().custody(), units("1.0"));
    assert_eq!(pool.depositor_count(), 1);
    pool.check_solvency().unwrap();
}

#[test]
fn test_stake_zero_rejected_without_touching_wallet() {
    let user = Keypair::generate().address();
    let mut pool = funded_pool(user, "1.0");

    let err = pool.stake(user, Amount::ZERO).unwrap_err();

    assert_eq!(err, PoolError::Ledger(LedgerError::InvalidAmount));
    assert_eq!(pool.wallet_balance(&user), units("1.0"));
    assert_eq!(pool.bank().custody(), Amount::ZERO);
}

#[test]
fn test_stake_more_than_wallet_reverts_ledger_credit() {
    let user = Keypair::generate().address();
    let mut pool = funded_pool(user, "1.0");

    let err = pool.stake(user, units("1.5")).unwrap_err();

    assert_eq!(
        err,
        PoolError::Bank(BankError::InsufficientFunds {
            available: units("1.0"),
            required: units("1.5"),
        })
    );
    assert_eq!(pool.balance_of(&user), Amount::ZERO);
    assert_eq!(pool.total_value(), Amount::ZERO);
    assert_eq!(pool.depositor_count(), 0);
    assert!(pool.events().is_empty());
    pool.check_solvency().unwrap();
}

// ============================================================================
// WITHDRAW
// ============================================================================

#[test]
fn test_withdraw_pays_back_into_wallet() {
    let user = Keypair::generate().address();
    let mut pool = funded_pool(user, "1.0");
    pool.stake(user, units("1.0")).unwrap();

    pool.withdraw(user, units("0.5")).unwrap();

    assert_eq!(pool.balance_of(&user), units("0.5"));
    assert_eq!(pool.wallet_balance(&user), units("0.5"));
    assert_eq!(
        pool.events().last(),
        Some(&LedgerEvent::Withdrew {
            account: user,
            amount: units("0.5"),
        })
    );
    pool.check_solvency().unwrap();
}

#[test]
fn test_withdraw_to_rejecting_recipient_fails_atomically() {
    let contract = Keypair::generate().address();
    let mut pool = funded_pool(contract, "1.0");
    pool.stake(contract, units("1.0")).unwrap();
    pool.reject_incoming(contract);
    let before = pool.statistics();

    let err = pool.withdraw(contract, units("0.5")).unwrap_err();

    assert_eq!(
        err,
        PoolError::Ledger(LedgerError::TransferFailed(TransferError::Rejected(contract)))
    );
    assert_eq!(pool.balance_of(&contract), units("1.0"));
    assert_eq!(pool.total_value(), units("1.0"));
    assert_eq!(pool.wallet_balance(&contract), Amount::ZERO);
    assert_eq!(pool.statistics(), before);
    pool.check_solvency().unwrap();
}

#[test]
fn test_accepting_again_allows_withdraw() {
    let contract = Keypair::generate().address();
    let mut pool = funded_pool(contract, "1.0");
    pool.stake(contract, units("1.0")).unwrap();
    pool.reject_incoming(contract);
    assert!(pool.withdraw(contract, units("1.0")).is_err());

    pool.accept_incoming(&contract);
    pool.withdraw(contract, units("1.0")).unwrap();

    assert_eq!(pool.wallet_balance(&contract), units("1.0"));
    assert_eq!(pool.depositor_count(), 0);
}

#[test]
fn test_overdraw_reports_insufficient_balance() {
    let user = Keypair::generate().address();
    let mut pool = funded_pool(user, "1.0");
    pool.stake(user, units("1.0")).unwrap();

    let err = pool.withdraw(user, units("1.1")).unwrap_err();

    assert!(matches!(
        err,
        PoolError::Ledger(LedgerError::InsufficientBalance { .. })
    ));
    assert_eq!(pool.balance_of(&user), units("1.0"));
}

// ============================================================================
// CONSERVATION ACROSS USERS
// ============================================================================

#[test]
fn test_supply_is_conserved() {
    let alice = Keypair::generate().address();
    let bob = Keypair::generate().address();
    let mut pool = StakingPool::new();
    pool.fund(alice, units("3.0")).unwrap();
    pool.fund(bob, units("2.0")).unwrap();

    pool.stake(alice, units("2.0")).unwrap();
    pool.stake(bob, units("2.0")).unwrap();
    pool.withdraw(alice, units("0.75")).unwrap();
    pool.withdraw(bob, units("2.0")).unwrap();

    let stats = pool.statistics();
    assert_eq!(stats.total_value, units("1.25"));
    assert_eq!(stats.depositor_count, 1);
    assert_eq!(stats.custody, units("1.25"));
    assert_eq!(pool.bank().total_supply(), stats.total_minted);
    assert_eq!(stats.event_count, 4);
    pool.check_solvency().unwrap();
}

#[test]
fn test_faucet_limit_applies() {
    let user = Keypair::generate().address();
    let mut pool = StakingPool::with_bank(NativeBank::new().with_faucet_limit(units("10.0")));

    let err = pool.fund(user, units("10.5")).unwrap_err();

    assert!(matches!(
        err,
        PoolError::Bank(BankError::FaucetLimitExceeded { .. })
    ));
    assert_eq!(pool.wallet_balance(&user), Amount::ZERO);
}

#[test]
fn test_corrupt_bytes_rejected() {
    let err = StakingPool::from_bytes(&[0xff, 0xff, 0xff]).unwrap_err();
    assert!(matches!(err, PoolError::StateError(_)));
}
