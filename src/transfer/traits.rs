// Asset transfer - the call-out a withdrawal makes to pay the caller

use crate::identity::Address;
use crate::ledger::{Amount, Ledger, LedgerError};
use thiserror::Error;

/// Reasons a transfer of the native asset can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Recipient {0} rejected the transfer")]
    Rejected(Address),

    #[error("Insufficient custody: available {available}, required {required}")]
    InsufficientCustody { available: Amount, required: Amount },

    #[error("Recipient balance would overflow")]
    RecipientOverflow,

    /// The recipient called back into the ledger and that call failed
    #[error("Reentrant ledger call failed: {0}")]
    Reentered(Box<LedgerError>),
}

impl From<LedgerError> for TransferError {
    fn from(err: LedgerError) -> Self {
        TransferError::Reentered(Box::new(err))
    }
}

/// Moves native value out of the ledger's custody to a recipient.
///
/// Called by [`Ledger::withdraw`] after the caller's balance has already been
/// debited. The ledger is handed in mutably so the recipient can call back
/// into it; any error aborts and reverts the whole withdrawal.
pub trait AssetTransfer {
    fn transfer(
        &mut self,
        ledger: &mut Ledger,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError>;
}

impl<F> AssetTransfer for F
where
    F: FnMut(&mut Ledger, &Address, Amount) -> Result<(), TransferError>,
{
    fn transfer(
        &mut self,
        ledger: &mut Ledger,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self(ledger, to, amount)
    }
}
