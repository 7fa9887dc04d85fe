// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Slot record types: edges and nodes as stored by the host arena.

use crate::ident::{NodeHandle, TypeKey};

/// Per-edge state bits.
///
/// Stored as a plain `u16`; the engine only ever inspects [`EdgeFlags::CREATED`]
/// (liveness) and copies [`EdgeFlags::INVERT`] onto replacements.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeFlags(pub u16);

impl EdgeFlags {
    /// Slot holds a live edge.
    pub const CREATED: EdgeFlags = EdgeFlags(1);
    /// Slot has been released and awaits reuse.
    pub const DELETED: EdgeFlags = EdgeFlags(1 << 1);
    /// Traffic runs against the edge's nominal direction.
    pub const INVERT: EdgeFlags = EdgeFlags(1 << 2);

    /// Returns `true` when all bits of `other` are set in `self`.
    #[must_use]
    pub fn contains(self, other: EdgeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of `self` and `other`.
    #[must_use]
    pub fn with(self, other: EdgeFlags) -> EdgeFlags {
        EdgeFlags(self.0 | other.0)
    }

    /// Returns `self` with the bits of `other` cleared.
    #[must_use]
    pub fn without(self, other: EdgeFlags) -> EdgeFlags {
        EdgeFlags(self.0 & !other.0)
    }
}

/// Per-node state bits.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeFlags(pub u16);

impl NodeFlags {
    /// Slot holds a live node.
    pub const CREATED: NodeFlags = NodeFlags(1);
    /// Node is a map-boundary connection; incident edges are never retyped.
    pub const OUTSIDE_CONNECTION: NodeFlags = NodeFlags(1 << 1);

    /// Returns `true` when all bits of `other` are set in `self`.
    #[must_use]
    pub fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of `self` and `other`.
    #[must_use]
    pub fn with(self, other: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | other.0)
    }
}

/// Materialised record for a single edge slot.
///
/// Invariants
/// - A live record (`flags` contains [`EdgeFlags::CREATED`]) has a non-null
///   type key and both endpoints referencing live nodes in the same host.
/// - A released record's slot may be reused by the host allocator; holders of
///   its old handle must not treat it as live.
/// - `build_order` is assigned by the host at creation and copied verbatim
///   onto replacement edges so rendering priority survives a retype.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRecord {
    /// Type key describing the edge.
    pub ty: TypeKey,
    /// Start endpoint node handle.
    pub start: NodeHandle,
    /// End endpoint node handle.
    pub end: NodeHandle,
    /// Outgoing direction at the start endpoint.
    pub start_dir: [f32; 3],
    /// Outgoing direction at the end endpoint.
    pub end_dir: [f32; 3],
    /// Host-assigned construction counter.
    pub build_order: u32,
    /// State bits.
    pub flags: EdgeFlags,
}

impl EdgeRecord {
    /// Returns `true` when the slot holds a live edge.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.flags.contains(EdgeFlags::CREATED) && !self.flags.contains(EdgeFlags::DELETED)
    }
}

/// Materialised record for a single node slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRecord {
    /// State bits.
    pub flags: NodeFlags,
}

impl NodeRecord {
    /// Returns `true` when the slot holds a live node.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.flags.contains(NodeFlags::CREATED)
    }

    /// Returns `true` when the node is a map-boundary connection.
    #[must_use]
    pub fn is_outside_connection(&self) -> bool {
        self.flags.contains(NodeFlags::OUTSIDE_CONNECTION)
    }
}

/// Locator for a type reference embedded in a building record's path slots.
///
/// Unlike an edge, a path reference has no independent identity or lifetime;
/// the `(sub, slot)` pair addresses it inside the owning building record, and
/// replacement is a direct type-key swap with no create/release step.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSlotRef {
    /// Index of the sub-structure inside the owning building record.
    pub sub: u32,
    /// Index of the path slot inside that sub-structure.
    pub slot: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::make_type_key;

    #[test]
    fn flag_ops_compose() {
        let f = EdgeFlags::CREATED.with(EdgeFlags::INVERT);
        assert!(f.contains(EdgeFlags::CREATED));
        assert!(f.contains(EdgeFlags::INVERT));
        assert!(!f.contains(EdgeFlags::DELETED));
        assert!(!f.without(EdgeFlags::INVERT).contains(EdgeFlags::INVERT));
    }

    #[test]
    fn released_edge_is_not_live() {
        let rec = EdgeRecord {
            ty: make_type_key("Basic Road"),
            start: NodeHandle(1),
            end: NodeHandle(2),
            start_dir: [0.0, 0.0, 1.0],
            end_dir: [0.0, 0.0, -1.0],
            build_order: 3,
            flags: EdgeFlags::CREATED.with(EdgeFlags::DELETED),
        };
        assert!(!rec.is_live());
    }

    #[test]
    fn outside_connection_bit_is_observable() {
        let n = NodeRecord {
            flags: NodeFlags::CREATED.with(NodeFlags::OUTSIDE_CONNECTION),
        };
        assert!(n.is_live());
        assert!(n.is_outside_connection());
    }
}
