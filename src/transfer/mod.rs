// Transfer module - moving native value out of the ledger
// The AssetTransfer seam called by withdrawals, and the in-process bank
// that implements it

mod bank;
mod traits;

pub use bank::{BankError, NativeBank};
pub use traits::{AssetTransfer, TransferError};
