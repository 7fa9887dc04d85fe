// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Session facade: the surface exposed to callers (tooling, UI hosts).
//!
//! A session owns the retype engine, the type catalog, and the single-level
//! undo log. Host storage is still borrowed per call; the session retains
//! nothing across calls except the undo record.

use crate::catalog::{EdgeTypeRecord, TypeCatalog};
use crate::engine::{PathRetypeOutcome, RetypeEngine, RetypeError, RetypeOutcome};
use crate::filter::{find_candidates, FilterOptions};
use crate::host::{EdgeHost, PathHost};
use crate::ident::TypeKey;
use crate::provenance::{classify, Provenance};
use crate::record::PathSlotRef;
use crate::undo::{UndoLog, UndoRecord};

/// No-op [`PathHost`] for callers whose universe has no building records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPaths;

impl PathHost for NoPaths {
    fn path_type(&self, _loc: PathSlotRef) -> Option<TypeKey> {
        None
    }

    fn set_path_type(&mut self, _loc: PathSlotRef, _ty: TypeKey) -> bool {
        false
    }
}

/// Orchestrates retype operations over a borrowed host.
#[derive(Debug)]
pub struct RetypeSession {
    catalog: TypeCatalog,
    engine: RetypeEngine,
    undo: UndoLog,
}

impl RetypeSession {
    /// Creates a session over a finalized catalog.
    #[must_use]
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            engine: RetypeEngine::new(),
            undo: UndoLog::new(),
        }
    }

    /// Read access to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Returns `true` while a batch is running (poll-only progress).
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.engine.is_in_progress()
    }

    /// Returns `true` iff the last operation can be reverted.
    #[must_use]
    pub fn has_undo(&self) -> bool {
        self.undo.has_undo()
    }

    /// Retypes every interior edge of `source` to `target` and arms the
    /// undo log with the result. A previous undo record, if any, is
    /// discarded even when the new batch replaced nothing.
    ///
    /// # Errors
    /// Propagates [`RetypeError`] rejections from the engine; no mutation
    /// has happened when an error is returned.
    pub fn retype<H: EdgeHost>(
        &mut self,
        host: &mut H,
        source: TypeKey,
        target: TypeKey,
    ) -> Result<RetypeOutcome, RetypeError> {
        let outcome = self.engine.retype(host, &self.catalog, source, target)?;
        self.undo.record_edges(source, outcome.created.clone());
        Ok(outcome)
    }

    /// Overwrites the listed building path slots with `target` and arms the
    /// undo log with the previous values.
    ///
    /// # Errors
    /// Propagates [`RetypeError`] rejections from the engine.
    pub fn retype_paths<P: PathHost>(
        &mut self,
        paths: &mut P,
        locs: &[PathSlotRef],
        target: TypeKey,
    ) -> Result<PathRetypeOutcome, RetypeError> {
        let outcome = self.engine.retype_paths(paths, locs, target)?;
        self.undo.record_paths(outcome.changed.clone());
        Ok(outcome)
    }

    /// Replays the inverse of the last operation.
    ///
    /// Graph-form records re-run the replacement loop in reverse (boundary
    /// check skipped; those edges were interior when first replaced).
    /// Path records restore each slot's previous type directly. Returns
    /// `false` when there is nothing to revert; a second call after a
    /// successful revert is a no-op.
    pub fn revert<H: EdgeHost, P: PathHost>(&mut self, host: &mut H, paths: &mut P) -> bool {
        match self.undo.take() {
            Some(UndoRecord::Edges { source, created }) => {
                self.engine.retype_listed(host, &created, source).is_ok()
            }
            Some(UndoRecord::Paths { slots }) => {
                for (loc, previous) in slots {
                    let _ = paths.set_path_type(loc, previous);
                }
                true
            }
            None => false,
        }
    }

    /// Computes the ordered candidate set for replacing `source`.
    #[must_use]
    pub fn find_candidates(&self, source: TypeKey, options: &FilterOptions) -> Vec<TypeKey> {
        find_candidates(&self.catalog, source, options)
    }

    /// Classifies a type's origin for display grouping.
    #[must_use]
    pub fn classify(&self, record: &EdgeTypeRecord) -> Provenance {
        classify(record)
    }
}
