// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON network document: a catalog plus an edge universe, named by type
//! display name so documents stay hand-editable.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use regraft_core::{
    make_type_key, Category, EdgeHost, EdgeTypeDecl, LaneDecl, MemoryNetwork, NodeFlags,
    NodeHandle, StopClass, StructuralVariants, TypeCatalog, TypeKey,
};
use serde::{Deserialize, Serialize};

/// One edge type declaration, with variant links by display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDoc {
    /// Unique display name.
    pub name: String,
    /// Half of the cross-section width.
    pub half_width: f32,
    /// Behavioural category.
    pub category: Category,
    /// Stop classification per traffic lane.
    #[serde(default)]
    pub lane_stops: Vec<StopClass>,
    /// Slope counterpart name.
    #[serde(default)]
    pub slope: Option<String>,
    /// Elevated counterpart name.
    #[serde(default)]
    pub elevated: Option<String>,
    /// Bridge counterpart name.
    #[serde(default)]
    pub bridge: Option<String>,
    /// Tunnel counterpart name.
    #[serde(default)]
    pub tunnel: Option<String>,
}

/// One node slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDoc {
    /// Map-boundary connection flag.
    #[serde(default)]
    pub outside: bool,
}

/// One live edge, endpoints as 1-based node positions in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDoc {
    /// Type display name.
    pub ty: String,
    /// Start node position.
    pub start: u32,
    /// End node position.
    pub end: u32,
}

/// A complete network document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDoc {
    /// The type universe.
    pub types: Vec<TypeDoc>,
    /// Node slots, in handle order.
    pub nodes: Vec<NodeDoc>,
    /// Live edges.
    pub edges: Vec<EdgeDoc>,
}

impl NetworkDoc {
    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("malformed network document")
    }

    /// Builds the catalog declared by this document.
    pub fn build_catalog(&self) -> Result<TypeCatalog> {
        let mut catalog = TypeCatalog::new();
        for ty in &self.types {
            let link = |name: &Option<String>| name.as_deref().map(make_type_key);
            catalog
                .insert(EdgeTypeDecl {
                    name: ty.name.clone(),
                    half_width: ty.half_width,
                    category: ty.category,
                    lanes: ty.lane_stops.iter().map(|&stop| LaneDecl { stop }).collect(),
                    variants: StructuralVariants {
                        slope: link(&ty.slope),
                        elevated: link(&ty.elevated),
                        bridge: link(&ty.bridge),
                        tunnel: link(&ty.tunnel),
                    },
                })
                .with_context(|| format!("registering type {:?}", ty.name))?;
        }
        catalog.finalize();
        Ok(catalog)
    }

    /// Materialises the edge universe into an in-memory host.
    pub fn build_network(&self, catalog: &TypeCatalog) -> Result<MemoryNetwork> {
        let capacity = u32::try_from(self.edges.len() * 2 + 8).unwrap_or(u32::MAX);
        let mut net = MemoryNetwork::new(capacity);
        for node in &self.nodes {
            let flags = if node.outside {
                NodeFlags::OUTSIDE_CONNECTION
            } else {
                NodeFlags::default()
            };
            net.add_node(flags);
        }
        for (i, edge) in self.edges.iter().enumerate() {
            let key = make_type_key(&edge.ty);
            if !catalog.contains(key) {
                bail!("edge {} names unknown type {:?}", i, edge.ty);
            }
            let handle = net.add_edge(key, NodeHandle(edge.start), NodeHandle(edge.end));
            if handle.is_none() {
                bail!("edge {} references invalid nodes or exhausted the array", i);
            }
        }
        Ok(net)
    }

    /// Rebuilds the document's edge list from the network's live edges,
    /// keeping types and nodes as declared.
    pub fn refresh_edges(&mut self, catalog: &TypeCatalog, net: &MemoryNetwork) -> Result<()> {
        let names: BTreeMap<TypeKey, &str> =
            catalog.iter().map(|r| (r.key, r.name.as_str())).collect();
        let mut edges = Vec::new();
        for handle in net.live_edges() {
            let Some(rec) = net.edge(handle) else {
                continue;
            };
            let Some(name) = names.get(&rec.ty) else {
                bail!("live edge {handle} carries a type missing from the catalog");
            };
            edges.push(EdgeDoc {
                ty: (*name).to_owned(),
                start: rec.start.index(),
                end: rec.end.index(),
            });
        }
        self.edges = edges;
        Ok(())
    }

    /// Serializes the document as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing network document")
    }
}
