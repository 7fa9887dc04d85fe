// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-level undo for the last retype operation.
//!
//! The log is an owned value object, not process-wide state: whoever owns
//! the [`crate::session::RetypeSession`] owns the log, and concurrent-call
//! misuse becomes a visible borrow, not a data race.

use crate::ident::{EdgeHandle, TypeKey};
use crate::record::PathSlotRef;

/// The logged result of the last retype operation.
///
/// Lifecycle: created empty, populated atomically after a successful batch,
/// consumed and cleared by a revert. At most one record is live at a time;
/// a new retype discards the previous record. Single-step undo is a
/// deliberate simplification, not a missing history stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoRecord {
    /// Graph-form batch: restore `source` on every listed replacement edge.
    Edges {
        /// Type the replaced edges had before the batch.
        source: TypeKey,
        /// Handles created by the batch, in scan order.
        created: Vec<EdgeHandle>,
    },
    /// Building-scoped batch: restore each slot's previous type directly.
    Paths {
        /// Previous value per rewritten slot.
        slots: Vec<(PathSlotRef, TypeKey)>,
    },
}

/// Holder for the at-most-one live [`UndoRecord`].
#[derive(Debug, Default)]
pub struct UndoLog {
    record: Option<UndoRecord>,
}

impl UndoLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` iff a non-empty record is pending.
    #[must_use]
    pub fn has_undo(&self) -> bool {
        match &self.record {
            Some(UndoRecord::Edges { created, .. }) => !created.is_empty(),
            Some(UndoRecord::Paths { slots }) => !slots.is_empty(),
            None => false,
        }
    }

    /// Records a graph-form batch, discarding any previous record.
    ///
    /// An empty created set clears the log instead: there is nothing to
    /// revert, and `has_undo` must report accordingly.
    pub fn record_edges(&mut self, source: TypeKey, created: Vec<EdgeHandle>) {
        self.record = if created.is_empty() {
            None
        } else {
            Some(UndoRecord::Edges { source, created })
        };
    }

    /// Records a building-scoped batch, discarding any previous record.
    pub fn record_paths(&mut self, slots: Vec<(PathSlotRef, TypeKey)>) {
        self.record = if slots.is_empty() {
            None
        } else {
            Some(UndoRecord::Paths { slots })
        };
    }

    /// Consumes and returns the pending record, leaving the log empty.
    pub fn take(&mut self) -> Option<UndoRecord> {
        self.record.take()
    }

    /// Drops any pending record.
    pub fn clear(&mut self) {
        self.record = None;
    }
}
