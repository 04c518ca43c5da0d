//! Mutation journal used to roll back groups of account writes
//!
//! Every journaled write pushes the value it overwrote. Reverting to a
//! snapshot replays the entries above it newest-first.

use crate::state::address::Address;
use num_bigint::BigUint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    /// The account did not exist before this entry
    Created { address: Address },
    Nonce { address: Address, previous: u64 },
    Balance { address: Address, previous: BigUint },
    Code { address: Address, previous: Vec<u8> },
    /// One registration record was pushed onto the account
    RegistrationAppended { address: Address },
}

impl JournalEntry {
    pub fn address(&self) -> &Address {
        match self {
            JournalEntry::Created { address }
            | JournalEntry::Nonce { address, .. }
            | JournalEntry::Balance { address, .. }
            | JournalEntry::Code { address, .. }
            | JournalEntry::RegistrationAppended { address } => address,
        }
    }
}

#[derive(Debug, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Remove every entry recorded after `snapshot`, newest first.
    /// Returns `None` when the snapshot lies beyond the journal.
    pub fn take_since(&mut self, snapshot: usize) -> Option<Vec<JournalEntry>> {
        if snapshot > self.entries.len() {
            return None;
        }
        let mut undone = self.entries.split_off(snapshot);
        undone.reverse();
        Some(undone)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
