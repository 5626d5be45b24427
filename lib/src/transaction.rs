//! Undo log for an active transaction.

use std::thread::ThreadId;
use std::time::Instant;

use crate::errors::Result;
use crate::index::{IdTriple, TripleIndexSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Change {
    Added(IdTriple),
    Removed(IdTriple),
}

/// Undo a batch of changes, newest first.
pub(crate) fn rollback(indexes: &mut TripleIndexSet, changes: &[Change]) -> Result<()> {
    for change in changes.iter().rev() {
        match change {
            Change::Added(spo) => {
                indexes.remove(*spo)?;
            }
            Change::Removed(spo) => {
                indexes.insert(*spo)?;
            }
        }
    }
    Ok(())
}

#[derive(Debug)]
pub(crate) struct Transaction {
    owner: ThreadId,
    started: Instant,
    undo: Vec<Change>,
}

impl Transaction {
    pub fn begin() -> Self {
        Self {
            owner: std::thread::current().id(),
            started: Instant::now(),
            undo: Vec::new(),
        }
    }

    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    pub fn is_owned_by_current(&self) -> bool {
        self.owner == std::thread::current().id()
    }

    pub fn record(&mut self, changes: Vec<Change>) {
        self.undo.extend(changes);
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    /// Restore the triple set as it was at `begin`.
    pub fn abort(self, indexes: &mut TripleIndexSet) -> Result<usize> {
        rollback(indexes, &self.undo)?;
        Ok(self.undo.len())
    }
}
