// StakingPool - a Ledger plus the NativeBank holding its custody
//
// Deposits carry value: staking moves the attached amount from the caller's
// wallet into custody in the same atomic step as the ledger credit. Withdrawals
// pay out of custody through the bank. Custody always equals the ledger total.

use crate::identity::Address;
use crate::ledger::{Amount, EventLog, InvariantError, Ledger, LedgerError};
use crate::transfer::{BankError, NativeBank};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Errors from pool operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error("Pool insolvent: custody {custody}, ledger total {total}")]
    Insolvent { custody: Amount, total: Amount },

    #[error("Corrupt ledger state: {0}")]
    Corrupted(#[from] InvariantError),

    #[error("State export/import error: {0}")]
    StateError(String),
}

/// Statistics about the pool
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolStatistics {
    pub total_value: Amount,
    pub depositor_count: u64,
    pub custody: Amount,
    pub total_minted: Amount,
    pub event_count: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StakingPool {
    ledger: Ledger,
    bank: NativeBank,
}

impl StakingPool {
    pub fn new() -> Self {
        Self::with_bank(NativeBank::new())
    }

    /// Start an empty ledger on top of an existing bank
    pub fn with_bank(bank: NativeBank) -> Self {
        Self {
            ledger: Ledger::new(),
            bank,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn bank(&self) -> &NativeBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut NativeBank {
        &mut self.bank
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Credit `amount` to the caller's wallet from the faucet
    pub fn fund(&mut self, caller: Address, amount: Amount) -> Result<(), PoolError> {
        self.bank.mint(caller, amount)?;
        Ok(())
    }

    /// Deposit `amount` from the caller's wallet into the ledger
    pub fn stake(&mut self, caller: Address, amount: Amount) -> Result<(), PoolError> {
        let bank = &mut self.bank;
        self.ledger.transact(|ledger| {
            ledger.deposit(caller, amount)?;
            bank.lock_into_custody(&caller, amount)?;
            Ok::<_, PoolError>(())
        })?;

        debug!(%caller, %amount, custody = %self.bank.custody(), "staked");
        Ok(())
    }

    /// Withdraw `amount` of the caller's stake back to their wallet
    pub fn withdraw(&mut self, caller: Address, amount: Amount) -> Result<(), PoolError> {
        self.ledger.withdraw(caller, amount, &mut self.bank)?;
        Ok(())
    }

    /// Make `account` refuse incoming transfers, so its withdrawals fail
    pub fn reject_incoming(&mut self, account: Address) {
        self.bank.reject_incoming(account);
    }

    pub fn accept_incoming(&mut self, account: &Address) {
        self.bank.accept_incoming(account);
    }

    // ========================================================================
    // READS
    // ========================================================================

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn total_value(&self) -> Amount {
        self.ledger.total_value()
    }

    pub fn depositor_count(&self) -> u64 {
        self.ledger.depositor_count()
    }

    pub fn wallet_balance(&self, account: &Address) -> Amount {
        self.bank.wallet_balance(account)
    }

    pub fn events(&self) -> &EventLog {
        self.ledger.events()
    }

    pub fn statistics(&self) -> PoolStatistics {
        PoolStatistics {
            total_value: self.ledger.total_value(),
            depositor_count: self.ledger.depositor_count(),
            custody: self.bank.custody(),
            total_minted: self.bank.total_minted(),
            event_count: self.ledger.events().len(),
        }
    }

    /// Verify that custody backs the ledger total exactly
    pub fn check_solvency(&self) -> Result<(), PoolError> {
        let custody = self.bank.custody();
        let total = self.ledger.total_value();
        if custody != total {
            error!(%custody, %total, "custody does not match ledger total");
            return Err(PoolError::Insolvent { custody, total });
        }
        Ok(())
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    /// Serialize the pool to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, PoolError> {
        postcard::to_allocvec(self).map_err(|e| PoolError::StateError(e.to_string()))
    }

    /// Deserialize a pool from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PoolError> {
        let pool: Self =
            postcard::from_bytes(bytes).map_err(|e| PoolError::StateError(e.to_string()))?;
        pool.ledger.check_invariants().map_err(|e| {
            error!(error = %e, "decoded ledger is inconsistent");
            PoolError::Corrupted(e)
        })?;
        pool.check_solvency()?;
        Ok(pool)
    }
}
