// Journal - undo log for ledger mutations
//
// Every write to ledger state inside an open checkpoint records the value it
// overwrote. Reverting a checkpoint replays those records newest-first, which
// also discards anything a nested (reentrant) operation committed inside it.

use crate::identity::Address;
use crate::ledger::Amount;

/// A single undoable write
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum JournalEntry {
    Balance { account: Address, previous: Amount },
    Total { previous: Amount },
    Depositors { previous: u64 },
    Event,
}

/// Handle to an open checkpoint; must be closed by `commit` or `unwind`
#[derive(Debug)]
#[must_use = "a checkpoint must be committed or unwound"]
pub(crate) struct Checkpoint {
    index: usize,
    depth: usize,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Journal {
    entries: Vec<JournalEntry>,
    depth: usize,
}

impl Journal {
    /// Open a new checkpoint nested inside any currently open one
    pub fn checkpoint(&mut self) -> Checkpoint {
        self.depth += 1;
        Checkpoint {
            index: self.entries.len(),
            depth: self.depth,
        }
    }

    /// Record a write. Outside any checkpoint nothing can be reverted, so
    /// nothing is kept.
    pub fn record(&mut self, entry: JournalEntry) {
        if self.depth > 0 {
            self.entries.push(entry);
        }
    }

    /// Close a checkpoint keeping its writes. Writes stay journaled until the
    /// outermost checkpoint commits, so an enclosing revert still undoes them.
    pub fn commit(&mut self, checkpoint: Checkpoint) {
        self.close(&checkpoint);
        if self.depth == 0 {
            self.entries.clear();
        }
    }

    /// Close a checkpoint and hand back its writes, newest first, for undoing
    pub fn unwind(&mut self, checkpoint: Checkpoint) -> Vec<JournalEntry> {
        self.close(&checkpoint);
        let mut undo: Vec<JournalEntry> = self.entries.drain(checkpoint.index..).collect();
        undo.reverse();
        undo
    }

    /// Number of open checkpoints
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn close(&mut self, checkpoint: &Checkpoint) {
        debug_assert_eq!(
            checkpoint.depth, self.depth,
            "checkpoints must be closed innermost first"
        );
        self.depth = self.depth.saturating_sub(1);
    }
}
