// Ledger module - THE ACCOUNTING CORE
// Staked balances, global aggregates, events, and the undo journal behind
// every atomic operation

mod amount;
mod event;
mod journal;
mod state;

pub use amount::{Amount, AmountError, DECIMALS};
pub use event::{EventLog, EventRecord, LedgerEvent};
pub use state::{InvariantError, Ledger, LedgerError};
