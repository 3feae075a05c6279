// Ledger - per-account staked balances plus the global aggregates
//
// Invariants after every committed operation:
//   total == sum(balances)
//   depositors == |{a : balance[a] > 0}|
//   no account is stored with a zero balance

use crate::identity::Address;
use crate::ledger::event::{EventLog, LedgerEvent};
use crate::ledger::journal::{Journal, JournalEntry};
use crate::ledger::Amount;
use crate::transfer::{AssetTransfer, TransferError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that reject a ledger operation. A rejected operation leaves no trace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: deposit must be greater than zero")]
    InvalidAmount,

    /// Covers both a zero withdrawal and a withdrawal above the balance
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Amount, requested: Amount },

    #[error("Transfer failed: {0}")]
    TransferFailed(TransferError),

    #[error("Balance would overflow")]
    BalanceOverflow,
}

/// A ledger whose stored aggregates disagree with its balances. Only a
/// decoded ledger can be in this state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("Total mismatch: recorded {recorded}, balances sum to {computed}")]
    TotalMismatch { recorded: Amount, computed: Amount },

    #[error("Balances overflow when summed")]
    SumOverflow,

    #[error("Depositor count mismatch: recorded {recorded}, {counted} positive balances")]
    DepositorMismatch { recorded: u64, counted: u64 },

    #[error("Zero balance stored for {0}")]
    ZeroBalance(Address),
}

/// The staking ledger
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Accounts with a strictly positive balance
    balances: BTreeMap<Address, Amount>,
    /// Sum of all balances
    total: Amount,
    /// Number of entries in `balances`, tracked independently
    depositors: u64,
    /// Committed events
    events: EventLog,
    #[serde(skip)]
    journal: Journal,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            events: EventLog::new(),
            ..Self::default()
        }
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Balance staked by `account`; zero if it never deposited
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Sum of every account's balance
    pub fn total_value(&self) -> Amount {
        self.total
    }

    /// Number of accounts with a positive balance
    pub fn depositor_count(&self) -> u64 {
        self.depositors
    }

    pub fn is_depositor(&self, account: &Address) -> bool {
        self.balances.contains_key(account)
    }

    /// Accounts with a positive balance, ordered by address
    pub fn depositors(&self) -> impl Iterator<Item = (&Address, Amount)> {
        self.balances.iter().map(|(a, b)| (a, *b))
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// True while an operation is in progress, e.g. inside a transfer callback
    pub fn in_transaction(&self) -> bool {
        self.journal.depth() > 0
    }

    /// Recompute the aggregates from the balances and compare.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        if let Some(account) = self
            .balances
            .iter()
            .find_map(|(account, balance)| balance.is_zero().then_some(*account))
        {
            return Err(InvariantError::ZeroBalance(account));
        }

        let computed = self
            .balances
            .values()
            .try_fold(Amount::ZERO, |sum, balance| sum.checked_add(*balance))
            .ok_or(InvariantError::SumOverflow)?;
        if computed != self.total {
            return Err(InvariantError::TotalMismatch {
                recorded: self.total,
                computed,
            });
        }

        let counted = self.balances.len() as u64;
        if counted != self.depositors {
            return Err(InvariantError::DepositorMismatch {
                recorded: self.depositors,
                counted,
            });
        }
        Ok(())
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Credit `amount` to `caller`.
    pub fn deposit(&mut self, caller: Address, amount: Amount) -> Result<(), LedgerError> {
        if amount.is_zero() {
            debug!(%caller, "deposit rejected: zero amount");
            return Err(LedgerError::InvalidAmount);
        }

        let previous = self.balance_of(&caller);
        let balance = previous
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        let total = self
            .total
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.transact(|ledger| {
            ledger.set_balance(caller, balance);
            ledger.set_total(total);
            if previous.is_zero() {
                let depositors = ledger.depositors + 1;
                ledger.set_depositors(depositors);
            }
            ledger.emit(LedgerEvent::Deposited {
                account: caller,
                amount,
            });
            Ok::<_, LedgerError>(())
        })?;

        debug!(%caller, %amount, %balance, "deposited");
        Ok(())
    }

    /// Debit `amount` from `caller` and pay it out through `transfer`.
    ///
    /// The debit is applied before `transfer` runs, so a transfer that calls
    /// back into this ledger sees the reduced balance. If the transfer fails,
    /// the debit and anything the callback did are reverted and the call
    /// returns [`LedgerError::TransferFailed`].
    pub fn withdraw<T>(
        &mut self,
        caller: Address,
        amount: Amount,
        transfer: &mut T,
    ) -> Result<(), LedgerError>
    where
        T: AssetTransfer + ?Sized,
    {
        let available = self.balance_of(&caller);
        let insufficient = LedgerError::InsufficientBalance {
            available,
            requested: amount,
        };

        if amount.is_zero() {
            debug!(%caller, "withdraw rejected: zero amount");
            return Err(insufficient);
        }
        let Some(remaining) = available.checked_sub(amount) else {
            debug!(%caller, %amount, %available, "withdraw rejected: exceeds balance");
            return Err(insufficient);
        };
        // total >= available >= amount whenever check_invariants holds
        debug_assert!(self.total >= amount, "ledger total below an account balance");
        let total = self.total.checked_sub(amount).unwrap_or(Amount::ZERO);

        self.transact(|ledger| {
            ledger.set_balance(caller, remaining);
            ledger.set_total(total);
            if remaining.is_zero() {
                let depositors = ledger.depositors.saturating_sub(1);
                ledger.set_depositors(depositors);
            }

            transfer.transfer(ledger, &caller, amount).map_err(|e| {
                warn!(%caller, %amount, error = %e, "transfer failed, reverting withdrawal");
                LedgerError::TransferFailed(e)
            })?;

            ledger.emit(LedgerEvent::Withdrew {
                account: caller,
                amount,
            });
            Ok::<_, LedgerError>(())
        })?;

        debug!(%caller, %amount, %remaining, "withdrew");
        Ok(())
    }

    /// Run `f` atomically: if it returns `Err`, every ledger write made
    /// inside it (including nested operations) is undone.
    pub fn transact<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let checkpoint = self.journal.checkpoint();
        match f(self) {
            Ok(value) => {
                self.journal.commit(checkpoint);
                Ok(value)
            }
            Err(err) => {
                let undo = self.journal.unwind(checkpoint);
                let reverted = undo.len();
                for entry in undo {
                    self.undo(entry);
                }
                debug!(reverted, "ledger transaction rolled back");
                Err(err)
            }
        }
    }

    // ========================================================================
    // JOURNALED WRITES
    // ========================================================================

    fn set_balance(&mut self, account: Address, balance: Amount) {
        let previous = self.balance_of(&account);
        self.journal.record(JournalEntry::Balance { account, previous });
        self.write_balance(account, balance);
    }

    fn set_total(&mut self, total: Amount) {
        self.journal.record(JournalEntry::Total {
            previous: self.total,
        });
        self.total = total;
    }

    fn set_depositors(&mut self, depositors: u64) {
        self.journal.record(JournalEntry::Depositors {
            previous: self.depositors,
        });
        self.depositors = depositors;
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.journal.record(JournalEntry::Event);
        self.events.push(event);
    }

    fn write_balance(&mut self, account: Address, balance: Amount) {
        if balance.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }

    fn undo(&mut self, entry: JournalEntry) {
        match entry {
            JournalEntry::Balance { account, previous } => self.write_balance(account, previous),
            JournalEntry::Total { previous } => self.total = previous,
            JournalEntry::Depositors { previous } => self.depositors = previous,
            JournalEntry::Event => {
                self.events.pop();
            }
        }
    }
}
