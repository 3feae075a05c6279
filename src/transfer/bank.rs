// NativeBank - holder of the native asset outside the ledger
//
// Tracks every participant's spendable wallet balance and the value held in
// custody on behalf of the ledger. Withdrawals pay out of custody through the
// AssetTransfer impl below.

use crate::identity::Address;
use crate::ledger::{Amount, Ledger};
use crate::transfer::{AssetTransfer, TransferError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// Errors from bank operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Faucet limit exceeded: limit {limit}, requested {requested}")]
    FaucetLimitExceeded { limit: Amount, requested: Amount },

    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: Amount, required: Amount },

    #[error("Balance would overflow")]
    Overflow,
}

/// Native-asset balances outside the ledger
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NativeBank {
    /// Spendable balance per participant (zero entries are not stored)
    wallets: BTreeMap<Address, Amount>,
    /// Value held on behalf of the ledger
    custody: Amount,
    /// Recipients that refuse incoming transfers
    rejecting: BTreeSet<Address>,
    /// Largest single faucet request, if limited
    faucet_limit: Option<Amount>,
    /// Everything the faucet ever created
    minted: Amount,
}

impl NativeBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap each faucet request at `limit`
    pub fn with_faucet_limit(mut self, limit: Amount) -> Self {
        self.faucet_limit = Some(limit);
        self
    }

    pub fn set_faucet_limit(&mut self, limit: Option<Amount>) {
        self.faucet_limit = limit;
    }

    pub fn faucet_limit(&self) -> Option<Amount> {
        self.faucet_limit
    }

    // ========================================================================
    // BALANCES
    // ========================================================================

    /// Spendable balance of `account`
    pub fn wallet_balance(&self, account: &Address) -> Amount {
        self.wallets.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Value held on behalf of the ledger
    pub fn custody(&self) -> Amount {
        self.custody
    }

    /// Total value created by the faucet
    pub fn total_minted(&self) -> Amount {
        self.minted
    }

    /// Sum of all wallets plus custody. Equals `total_minted` at all times.
    pub fn total_supply(&self) -> Amount {
        let wallets: u128 = self.wallets.values().map(Amount::base_units).sum();
        Amount::from_base_units(wallets + self.custody.base_units())
    }

    // ========================================================================
    // FAUCET
    // ========================================================================

    /// Create `amount` of fresh value in `to`'s wallet
    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<(), BankError> {
        if amount.is_zero() {
            return Err(BankError::ZeroAmount);
        }
        if let Some(limit) = self.faucet_limit {
            if amount > limit {
                return Err(BankError::FaucetLimitExceeded {
                    limit,
                    requested: amount,
                });
            }
        }

        let minted = self.minted.checked_add(amount).ok_or(BankError::Overflow)?;
        let balance = self
            .wallet_balance(&to)
            .checked_add(amount)
            .ok_or(BankError::Overflow)?;

        self.minted = minted;
        self.wallets.insert(to, balance);
        debug!(%to, %amount, "faucet mint");
        Ok(())
    }

    // ========================================================================
    // RECIPIENT BEHAVIOUR
    // ========================================================================

    /// Make `account` refuse every incoming transfer
    pub fn reject_incoming(&mut self, account: Address) {
        self.rejecting.insert(account);
    }

    /// Undo `reject_incoming`
    pub fn accept_incoming(&mut self, account: &Address) {
        self.rejecting.remove(account);
    }

    pub fn rejects(&self, account: &Address) -> bool {
        self.rejecting.contains(account)
    }

    // ========================================================================
    // CUSTODY
    // ========================================================================

    /// Move value attached to a deposit from `from`'s wallet into custody
    pub fn lock_into_custody(&mut self, from: &Address, amount: Amount) -> Result<(), BankError> {
        let available = self.wallet_balance(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(BankError::InsufficientFunds {
                available,
                required: amount,
            })?;
        let custody = self.custody.checked_add(amount).ok_or(BankError::Overflow)?;

        self.set_wallet(*from, remaining);
        self.custody = custody;
        Ok(())
    }

    fn set_wallet(&mut self, account: Address, balance: Amount) {
        if balance.is_zero() {
            self.wallets.remove(&account);
        } else {
            self.wallets.insert(account, balance);
        }
    }
}

impl AssetTransfer for NativeBank {
    fn transfer(
        &mut self,
        _ledger: &mut Ledger,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if self.rejects(to) {
            return Err(TransferError::Rejected(*to));
        }

        let custody = self
            .custody
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientCustody {
                available: self.custody,
                required: amount,
            })?;
        let balance = self
            .wallet_balance(to)
            .checked_add(amount)
            .ok_or(TransferError::RecipientOverflow)?;

        self.custody = custody;
        self.set_wallet(*to, balance);
        debug!(%to, %amount, "paid out of custody");
        Ok(())
    }
}
