// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host storage ports consumed by the retype engine.
//!
//! The node/edge buffers and building path slots are owned by the host
//! environment; the engine borrows them for the duration of a call and never
//! retains them. [`crate::network::MemoryNetwork`] is the crate's reference
//! implementation, used by the engine's tests and the CLI.

use crate::ident::{EdgeHandle, NodeHandle, TypeKey};
use crate::record::{EdgeRecord, NodeRecord, PathSlotRef};

/// Port over the host's fixed-capacity edge/node arrays.
///
/// # Contract
/// - `edge_capacity` is fixed for the session; handles range over
///   `1..capacity` (slot zero is the null sentinel).
/// - `create_edge` returns [`EdgeHandle::NONE`] when the host refuses the
///   allocation; callers must check.
/// - `release_edge` is idempotent against an already-released handle and
///   must not fault.
pub trait EdgeHost {
    /// Size of the edge array, including the reserved sentinel slot.
    fn edge_capacity(&self) -> u32;

    /// Returns the record in `handle`'s slot when that slot holds a live edge.
    fn edge(&self, handle: EdgeHandle) -> Option<&EdgeRecord>;

    /// Returns the record in `handle`'s slot when that slot holds a live node.
    fn node(&self, handle: NodeHandle) -> Option<&NodeRecord>;

    /// Creates a new live edge and returns its handle, or
    /// [`EdgeHandle::NONE`] on failure (e.g. array exhaustion).
    #[allow(clippy::too_many_arguments)]
    fn create_edge(
        &mut self,
        ty: TypeKey,
        start: NodeHandle,
        end: NodeHandle,
        start_dir: [f32; 3],
        end_dir: [f32; 3],
        build_order: u32,
        invert: bool,
    ) -> EdgeHandle;

    /// Releases `handle`'s slot for reuse. Idempotent.
    fn release_edge(&mut self, handle: EdgeHandle);

    /// Tears down type-owned runtime state for `handle` before release.
    ///
    /// Invoked by the engine exactly once per replaced edge, before the
    /// original is released.
    fn deactivate_type_state(&mut self, handle: EdgeHandle);
}

/// Port over a building record's embedded path-slot type references.
pub trait PathHost {
    /// Returns the type stored at `loc`, when the locator is valid.
    fn path_type(&self, loc: PathSlotRef) -> Option<TypeKey>;

    /// Overwrites the type stored at `loc`; returns `false` when the
    /// locator is invalid (nothing is written).
    fn set_path_type(&mut self, loc: PathSlotRef, ty: TypeKey) -> bool;
}
