// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier and hashing utilities.
use blake3::Hasher;

/// Canonical 256-bit hash used for addressing edge types by name.
pub type Hash = [u8; 32];

/// Strongly typed key for an edge type (prototype) in the catalog.
///
/// `TypeKey` values are produced by [`make_type_key`] which hashes the type's
/// unique display-independent name; using a dedicated wrapper prevents
/// accidental mixing with arena handles.
///
/// Tooling must not assume a `TypeKey` is reversible back into its name; the
/// catalog owns that mapping.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeKey(pub Hash);

impl TypeKey {
    /// Reserved "no type" sentinel carried by dead edge slots.
    pub const NULL: TypeKey = TypeKey([0u8; 32]);

    /// Returns `true` when this key is the null sentinel.
    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Returns the canonical byte representation of this key.
    #[must_use]
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Returns a short hex form (first 8 bytes) for logs and tables.
    #[must_use]
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[0..8])
    }
}

/// Produces a stable, domain-separated type key (prefix `b"edge-type:"`) using BLAKE3.
pub fn make_type_key(name: &str) -> TypeKey {
    let mut hasher = Hasher::new();
    hasher.update(b"edge-type:");
    hasher.update(name.as_bytes());
    TypeKey(hasher.finalize().into())
}

/// Dense handle for an edge slot in the host's fixed-capacity edge array.
///
/// # Invariants
/// - Handle `0` is the reserved null sentinel ([`EdgeHandle::NONE`]); the
///   host never allocates it.
/// - A handle is only meaningful against the host that issued it; slots are
///   reused after release, so a stale handle may name a different live edge.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeHandle(pub u32);

impl EdgeHandle {
    /// Reserved "no edge" sentinel (slot zero).
    pub const NONE: EdgeHandle = EdgeHandle(0);

    /// Returns `true` when this handle is the null sentinel.
    #[must_use]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for EdgeHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Dense handle for a node slot in the host's node array.
///
/// Handle `0` is the reserved null sentinel, mirroring [`EdgeHandle`].
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeHandle(pub u32);

impl NodeHandle {
    /// Reserved "no node" sentinel (slot zero).
    pub const NONE: NodeHandle = NodeHandle(0);

    /// Returns `true` when this handle is the null sentinel.
    #[must_use]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "n{}", self.0)
    }
}
