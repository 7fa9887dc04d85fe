// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Minimal in-memory network store used by the retype engine and tests.
//!
//! Slot arrays with explicit live flags and free-list reuse, matching the
//! host environment's memory model: edges are addressed by dense integer
//! handle into a fixed-capacity reusable slot array, with slot zero
//! permanently reserved as the null sentinel.

use crate::host::{EdgeHost, PathHost};
use crate::ident::{EdgeHandle, NodeHandle, TypeKey};
use crate::record::{EdgeFlags, EdgeRecord, NodeFlags, NodeRecord, PathSlotRef};

fn dead_edge() -> EdgeRecord {
    EdgeRecord {
        ty: TypeKey::NULL,
        start: NodeHandle::NONE,
        end: NodeHandle::NONE,
        start_dir: [0.0; 3],
        end_dir: [0.0; 3],
        build_order: 0,
        flags: EdgeFlags::default(),
    }
}

/// Arena-backed network store.
///
/// The edge array's size is fixed at construction; released slots return to
/// a free list and are reused last-in-first-out. The node array grows on
/// demand (node churn is outside this crate's concern).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryNetwork {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    free_edges: Vec<u32>,
    next_fresh: u32,
    build_counter: u32,
    #[cfg_attr(feature = "serde", serde(skip))]
    deactivated: Vec<EdgeHandle>,
}

impl MemoryNetwork {
    /// Creates a store whose edge array holds `edge_capacity` slots
    /// (including the reserved sentinel slot zero).
    #[must_use]
    pub fn new(edge_capacity: u32) -> Self {
        let capacity = edge_capacity.max(1);
        Self {
            nodes: vec![NodeRecord {
                flags: NodeFlags::default(),
            }],
            edges: vec![dead_edge(); capacity as usize],
            free_edges: Vec::new(),
            next_fresh: 1,
            build_counter: 0,
            deactivated: Vec::new(),
        }
    }

    /// Adds a live node and returns its handle.
    pub fn add_node(&mut self, flags: NodeFlags) -> NodeHandle {
        let handle = NodeHandle(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(NodeRecord {
            flags: flags.with(NodeFlags::CREATED),
        });
        handle
    }

    /// Adds a live edge between two existing nodes and returns its handle,
    /// or [`EdgeHandle::NONE`] when the array is exhausted.
    pub fn add_edge(&mut self, ty: TypeKey, start: NodeHandle, end: NodeHandle) -> EdgeHandle {
        let order = self.build_counter;
        self.build_counter = self.build_counter.wrapping_add(1);
        self.create_edge(ty, start, end, [0.0, 0.0, 1.0], [0.0, 0.0, -1.0], order, false)
    }

    /// Handles of all live edges, ascending.
    #[must_use]
    pub fn live_edges(&self) -> Vec<EdgeHandle> {
        (1..self.edge_capacity())
            .map(EdgeHandle)
            .filter(|&h| self.edge(h).is_some())
            .collect()
    }

    /// Edges deactivated via the type-teardown hook, in invocation order.
    #[must_use]
    pub fn deactivated(&self) -> &[EdgeHandle] {
        &self.deactivated
    }

    fn slot(&self, handle: EdgeHandle) -> Option<&EdgeRecord> {
        if handle.is_none() {
            return None;
        }
        self.edges.get(handle.index() as usize)
    }
}

impl EdgeHost for MemoryNetwork {
    fn edge_capacity(&self) -> u32 {
        u32::try_from(self.edges.len()).unwrap_or(u32::MAX)
    }

    fn edge(&self, handle: EdgeHandle) -> Option<&EdgeRecord> {
        self.slot(handle).filter(|rec| rec.is_live())
    }

    fn node(&self, handle: NodeHandle) -> Option<&NodeRecord> {
        if handle.is_none() {
            return None;
        }
        self.nodes
            .get(handle.index() as usize)
            .filter(|rec| rec.is_live())
    }

    fn create_edge(
        &mut self,
        ty: TypeKey,
        start: NodeHandle,
        end: NodeHandle,
        start_dir: [f32; 3],
        end_dir: [f32; 3],
        build_order: u32,
        invert: bool,
    ) -> EdgeHandle {
        if ty.is_null() || self.node(start).is_none() || self.node(end).is_none() {
            return EdgeHandle::NONE;
        }
        let index = if let Some(index) = self.free_edges.pop() {
            index
        } else if (self.next_fresh as usize) < self.edges.len() {
            let index = self.next_fresh;
            self.next_fresh += 1;
            index
        } else {
            return EdgeHandle::NONE;
        };
        let mut flags = EdgeFlags::CREATED;
        if invert {
            flags = flags.with(EdgeFlags::INVERT);
        }
        self.edges[index as usize] = EdgeRecord {
            ty,
            start,
            end,
            start_dir,
            end_dir,
            build_order,
            flags,
        };
        EdgeHandle(index)
    }

    fn release_edge(&mut self, handle: EdgeHandle) {
        if handle.is_none() {
            return;
        }
        let index = handle.index();
        let Some(rec) = self.edges.get_mut(index as usize) else {
            return;
        };
        if !rec.is_live() {
            // Already released; must not fault or double-free the slot.
            return;
        }
        *rec = dead_edge();
        rec.flags = EdgeFlags::DELETED;
        self.free_edges.push(index);
    }

    fn deactivate_type_state(&mut self, handle: EdgeHandle) {
        if self.edge(handle).is_some() {
            self.deactivated.push(handle);
        }
    }
}

/// Building record holding path-embedded type references, grouped by
/// sub-structure.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryBuilding {
    subs: Vec<Vec<TypeKey>>,
}

impl MemoryBuilding {
    /// Creates a building from its per-sub-structure path slots.
    #[must_use]
    pub fn new(subs: Vec<Vec<TypeKey>>) -> Self {
        Self { subs }
    }

    /// All valid slot locators, in (sub, slot) order.
    #[must_use]
    pub fn slots(&self) -> Vec<PathSlotRef> {
        let mut out = Vec::new();
        for (sub, slots) in self.subs.iter().enumerate() {
            for slot in 0..slots.len() {
                out.push(PathSlotRef {
                    sub: u32::try_from(sub).unwrap_or(u32::MAX),
                    slot: u32::try_from(slot).unwrap_or(u32::MAX),
                });
            }
        }
        out
    }
}

impl PathHost for MemoryBuilding {
    fn path_type(&self, loc: PathSlotRef) -> Option<TypeKey> {
        self.subs
            .get(loc.sub as usize)
            .and_then(|slots| slots.get(loc.slot as usize))
            .copied()
    }

    fn set_path_type(&mut self, loc: PathSlotRef, ty: TypeKey) -> bool {
        match self
            .subs
            .get_mut(loc.sub as usize)
            .and_then(|slots| slots.get_mut(loc.slot as usize))
        {
            Some(slot) => {
                *slot = ty;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::make_type_key;

    #[test]
    fn slot_zero_is_never_allocated() {
        let mut net = MemoryNetwork::new(8);
        let a = net.add_node(NodeFlags::default());
        let b = net.add_node(NodeFlags::default());
        let e = net.add_edge(make_type_key("Basic Road"), a, b);
        assert_eq!(e, EdgeHandle(1));
        assert!(net.edge(EdgeHandle::NONE).is_none());
    }

    #[test]
    fn released_slots_are_reused() {
        let mut net = MemoryNetwork::new(8);
        let a = net.add_node(NodeFlags::default());
        let b = net.add_node(NodeFlags::default());
        let ty = make_type_key("Basic Road");
        let e1 = net.add_edge(ty, a, b);
        let e2 = net.add_edge(ty, a, b);
        net.release_edge(e1);
        assert!(net.edge(e1).is_none());
        let e3 = net.add_edge(ty, a, b);
        assert_eq!(e3, e1);
        assert_ne!(e3, e2);
    }

    #[test]
    fn release_is_idempotent() {
        let mut net = MemoryNetwork::new(4);
        let a = net.add_node(NodeFlags::default());
        let b = net.add_node(NodeFlags::default());
        let ty = make_type_key("Basic Road");
        let e1 = net.add_edge(ty, a, b);
        net.release_edge(e1);
        net.release_edge(e1);
        let e2 = net.add_edge(ty, a, b);
        let e3 = net.add_edge(ty, a, b);
        // A double release must not hand the same slot out twice.
        assert_ne!(e2, e3);
    }

    #[test]
    fn exhausted_array_returns_the_sentinel() {
        let mut net = MemoryNetwork::new(3);
        let a = net.add_node(NodeFlags::default());
        let b = net.add_node(NodeFlags::default());
        let ty = make_type_key("Basic Road");
        assert!(!net.add_edge(ty, a, b).is_none());
        assert!(!net.add_edge(ty, a, b).is_none());
        assert!(net.add_edge(ty, a, b).is_none());
    }

    #[test]
    fn path_slots_swap_in_place() {
        let road = make_type_key("Basic Road");
        let rail = make_type_key("Train Track");
        let mut building = MemoryBuilding::new(vec![vec![road, road], vec![road]]);
        let loc = PathSlotRef { sub: 1, slot: 0 };
        assert_eq!(building.path_type(loc), Some(road));
        assert!(building.set_path_type(loc, rail));
        assert_eq!(building.path_type(loc), Some(rail));
        assert!(!building.set_path_type(PathSlotRef { sub: 2, slot: 0 }, rail));
    }
}
