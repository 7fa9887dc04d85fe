// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Retype engine: locate, replace, release.
//!
//! A retype batch scans the host's edge array in ascending handle order and
//! replaces every live edge of the source type with a freshly created edge of
//! the target type at the same topological position. The batch is **not**
//! transactional: each individual replacement is internally consistent, but a
//! fault mid-scan leaves completed replacements in place. Callers observe
//! progress only through [`RetypeEngine::is_in_progress`], which is cleared
//! on every exit path.

use thiserror::Error;

use crate::catalog::TypeCatalog;
use crate::host::{EdgeHost, PathHost};
use crate::ident::{EdgeHandle, TypeKey};
use crate::record::{EdgeFlags, PathSlotRef};
#[cfg(feature = "telemetry")]
use crate::telemetry;

/// Errors emitted when a retype request is rejected before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetypeError {
    /// Source and target name the same type; retyping would churn handles
    /// for no observable change.
    #[error("source and target are the same type")]
    SameType,
    /// The null sentinel was supplied for source or target.
    #[error("null type selection")]
    NullSelection,
    /// The source type is not registered in the catalog.
    #[error("unknown source type")]
    UnknownSource,
    /// The target type is not registered in the catalog.
    #[error("unknown target type")]
    UnknownTarget,
    /// A batch is already running on this engine.
    #[error("retype already in progress")]
    InProgress,
}

/// Result of a graph-form retype batch.
///
/// Per-edge recoverable conditions surface here as counts, never as errors;
/// see the crate's error taxonomy in the module docs of [`crate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetypeOutcome {
    /// Type every replaced edge had before the batch.
    pub source: TypeKey,
    /// Type every replacement edge carries.
    pub target: TypeKey,
    /// Handles of the replacement edges, in scan order.
    pub created: Vec<EdgeHandle>,
    /// Matching edges skipped because an endpoint is an outside connection.
    pub skipped_boundary: u32,
    /// Matching edges left untouched because the host refused the
    /// replacement allocation.
    pub failed_creates: u32,
}

/// Result of a building-scoped path retype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRetypeOutcome {
    /// Type every slot carries after the call.
    pub target: TypeKey,
    /// Previous value per rewritten slot, in argument order.
    pub changed: Vec<(PathSlotRef, TypeKey)>,
    /// Locators that named no valid slot.
    pub invalid: u32,
}

/// Clears the engine's in-progress flag when dropped, so a fault raised by a
/// host trait implementation mid-scan cannot leave the caller polling an
/// "operation in progress" state forever.
struct ScanGuard<'a> {
    flag: &'a mut bool,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// Performs retype batches against a borrowed host.
///
/// The engine owns no graph state; its only field is the completion flag
/// callers may poll. Mutual exclusion across engine calls is the host
/// environment's responsibility (single mutating execution context).
#[derive(Debug, Default)]
pub struct RetypeEngine {
    in_progress: bool,
}

impl RetypeEngine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a batch is running.
    ///
    /// There is no per-edge progress; the flag flips back to `false` only
    /// after the full scan completes or aborts.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Replaces every live, interior edge of `source` with a new edge of
    /// `target` at the same topological position.
    ///
    /// Edges with an outside-connection endpoint are skipped and counted.
    /// A refused creation leaves the original edge untouched and is counted;
    /// it never appears in the outcome's created set.
    ///
    /// # Errors
    /// Rejects the request before any mutation when source and target are
    /// equal ([`RetypeError::SameType`]), either key is the null sentinel
    /// ([`RetypeError::NullSelection`]) or unknown to the catalog
    /// ([`RetypeError::UnknownSource`] / [`RetypeError::UnknownTarget`]), or
    /// a batch is already running ([`RetypeError::InProgress`]).
    pub fn retype<H: EdgeHost>(
        &mut self,
        host: &mut H,
        catalog: &TypeCatalog,
        source: TypeKey,
        target: TypeKey,
    ) -> Result<RetypeOutcome, RetypeError> {
        if source.is_null() || target.is_null() {
            return Err(RetypeError::NullSelection);
        }
        if source == target {
            return Err(RetypeError::SameType);
        }
        if !catalog.contains(source) {
            return Err(RetypeError::UnknownSource);
        }
        if !catalog.contains(target) {
            return Err(RetypeError::UnknownTarget);
        }
        if self.in_progress {
            return Err(RetypeError::InProgress);
        }
        self.in_progress = true;
        let guard = ScanGuard {
            flag: &mut self.in_progress,
        };

        let mut outcome = RetypeOutcome {
            source,
            target,
            created: Vec::new(),
            skipped_boundary: 0,
            failed_creates: 0,
        };
        for index in 1..host.edge_capacity() {
            let handle = EdgeHandle(index);
            let Some(rec) = host.edge(handle) else {
                continue;
            };
            if rec.ty != source {
                continue;
            }
            let touches_boundary = [rec.start, rec.end].into_iter().any(|n| {
                host.node(n)
                    .is_some_and(crate::record::NodeRecord::is_outside_connection)
            });
            if touches_boundary {
                outcome.skipped_boundary += 1;
                #[cfg(feature = "telemetry")]
                telemetry::skipped_boundary(source, handle);
                continue;
            }
            match replace_edge(host, handle, target) {
                Some(new_handle) => {
                    #[cfg(feature = "telemetry")]
                    telemetry::replaced(source, handle, new_handle);
                    outcome.created.push(new_handle);
                }
                None => {
                    outcome.failed_creates += 1;
                    #[cfg(feature = "telemetry")]
                    telemetry::create_failed(source, handle);
                }
            }
        }

        #[cfg(feature = "telemetry")]
        telemetry::summary(
            source,
            outcome.created.len(),
            outcome.skipped_boundary,
            outcome.failed_creates,
        );
        drop(guard);
        Ok(outcome)
    }

    /// Replaces the listed edges (whatever their current type) with `target`.
    ///
    /// This is the reverse path used by undo: the listed handles were
    /// interior when first replaced, so the boundary check is skipped.
    /// Handles whose slot no longer holds a live edge are ignored. The
    /// outcome's `source` mirrors `target` here; the listed edges may have
    /// had mixed prior types.
    ///
    /// # Errors
    /// Returns [`RetypeError::NullSelection`] for a null target and
    /// [`RetypeError::InProgress`] when a batch is already running.
    pub fn retype_listed<H: EdgeHost>(
        &mut self,
        host: &mut H,
        handles: &[EdgeHandle],
        target: TypeKey,
    ) -> Result<RetypeOutcome, RetypeError> {
        if target.is_null() {
            return Err(RetypeError::NullSelection);
        }
        if self.in_progress {
            return Err(RetypeError::InProgress);
        }
        self.in_progress = true;
        let guard = ScanGuard {
            flag: &mut self.in_progress,
        };

        let mut outcome = RetypeOutcome {
            source: target,
            target,
            created: Vec::new(),
            skipped_boundary: 0,
            failed_creates: 0,
        };
        for &handle in handles {
            if host.edge(handle).is_none() {
                continue;
            }
            #[cfg(feature = "telemetry")]
            let previous = host.edge(handle).map_or(TypeKey::NULL, |rec| rec.ty);
            match replace_edge(host, handle, target) {
                Some(new_handle) => {
                    #[cfg(feature = "telemetry")]
                    telemetry::replaced(previous, handle, new_handle);
                    outcome.created.push(new_handle);
                }
                None => {
                    outcome.failed_creates += 1;
                    #[cfg(feature = "telemetry")]
                    telemetry::create_failed(previous, handle);
                }
            }
        }
        drop(guard);
        Ok(outcome)
    }

    /// Overwrites the type reference stored at each locator with `target`.
    ///
    /// Path references have no topology: there is no endpoint handling, no
    /// boundary check, and no create/release step. The outcome's `changed`
    /// list carries the previous values for direct restoration.
    ///
    /// # Errors
    /// Returns [`RetypeError::NullSelection`] for a null target and
    /// [`RetypeError::InProgress`] when a batch is already running.
    pub fn retype_paths<P: PathHost>(
        &mut self,
        paths: &mut P,
        locs: &[PathSlotRef],
        target: TypeKey,
    ) -> Result<PathRetypeOutcome, RetypeError> {
        if target.is_null() {
            return Err(RetypeError::NullSelection);
        }
        if self.in_progress {
            return Err(RetypeError::InProgress);
        }
        self.in_progress = true;
        let guard = ScanGuard {
            flag: &mut self.in_progress,
        };

        let mut outcome = PathRetypeOutcome {
            target,
            changed: Vec::new(),
            invalid: 0,
        };
        for &loc in locs {
            match paths.path_type(loc) {
                Some(previous) if paths.set_path_type(loc, target) => {
                    outcome.changed.push((loc, previous));
                }
                _ => outcome.invalid += 1,
            }
        }
        drop(guard);
        Ok(outcome)
    }
}

/// Replaces one live edge with a new edge of `target` at the same
/// topological position. Returns the new handle, or `None` when the host
/// refused the creation (the original is left untouched).
fn replace_edge<H: EdgeHost>(
    host: &mut H,
    handle: EdgeHandle,
    target: TypeKey,
) -> Option<EdgeHandle> {
    let rec = host.edge(handle)?.clone();
    // Create first: a refused allocation must leave the original edge
    // fully intact, including its type-owned runtime state.
    let new_handle = host.create_edge(
        target,
        rec.start,
        rec.end,
        rec.start_dir,
        rec.end_dir,
        rec.build_order,
        rec.flags.contains(EdgeFlags::INVERT),
    );
    if new_handle.is_none() {
        return None;
    }
    host.deactivate_type_state(handle);
    host.release_edge(handle);
    Some(new_handle)
}
