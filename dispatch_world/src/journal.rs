// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Undo log for world state.
//!
//! Every state change appends the information needed to undo it. A frame remembers the journal
//! length when it starts and, if it fails, undoes everything after that point.

use dispatch_tape::word::{Address, Word};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Change {
    Storage {
        address: Address,
        key: Word,
        prev: Option<Word>,
    },
    Created {
        address: Address,
    },
    Nonce {
        address: Address,
        prev: u64,
    },
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    changes: Vec<Change>,
}

/// A position in the journal to roll back to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Checkpoint(usize);

impl Journal {
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.changes.len())
    }

    pub(crate) fn record(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Removes and returns the changes made since `cp`, newest first.
    pub(crate) fn unwind(&mut self, cp: Checkpoint) -> impl Iterator<Item = Change> + '_ {
        let at = cp.0.min(self.changes.len());
        self.changes.drain(at..).rev()
    }

    /// Forgets every change; nothing before this point can be rolled back.
    pub(crate) fn clear(&mut self) {
        self.changes.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.changes.len()
    }
}
