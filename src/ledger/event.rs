// Ledger events - the externally observable record of each committed operation

use crate::identity::Address;
use crate::ledger::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// `account` deposited `amount`
    Deposited { account: Address, amount: Amount },
    /// `amount` was withdrawn by and transferred to `account`
    Withdrew { account: Address, amount: Amount },
}

impl LedgerEvent {
    pub fn account(&self) -> &Address {
        match self {
            Self::Deposited { account, .. } | Self::Withdrew { account, .. } => account,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Self::Deposited { amount, .. } | Self::Withdrew { amount, .. } => *amount,
        }
    }

    pub fn is_deposit(&self) -> bool {
        matches!(self, Self::Deposited { .. })
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposited { account, amount } => write!(f, "Deposited({}, {})", account, amount),
            Self::Withdrew { account, amount } => write!(f, "Withdrew({}, {})", account, amount),
        }
    }
}

/// An event together with its position in the log
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    seq: u64,
    event: LedgerEvent,
}

impl EventRecord {
    /// Sequence number, starting at 1
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn event(&self) -> &LedgerEvent {
        &self.event
    }
}

/// Append-only log of ledger events
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
    next_seq: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_seq: 1,
        }
    }

    /// Append an event and return its sequence number
    pub fn push(&mut self, event: LedgerEvent) -> u64 {
        // Default-constructed logs start at 0; normalise to 1
        let seq = self.next_seq.max(1);
        self.records.push(EventRecord { seq, event });
        self.next_seq = seq + 1;
        seq
    }

    /// Remove the most recent event; used only when rolling back
    pub(crate) fn pop(&mut self) -> Option<EventRecord> {
        let record = self.records.pop()?;
        self.next_seq = record.seq;
        Some(record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&LedgerEvent> {
        self.records.last().map(|r| &r.event)
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.records.iter().map(|r| &r.event)
    }

    /// Events concerning a single account, oldest first
    pub fn for_account<'a>(&'a self, account: &'a Address) -> impl Iterator<Item = &'a LedgerEvent> + 'a {
        self.iter().filter(move |e| e.account() == account)
    }
}
