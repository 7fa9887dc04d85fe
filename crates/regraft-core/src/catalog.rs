// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Edge type catalog: the read-only universe of known edge types.
//!
//! The catalog owns declared attributes (half-width, category, lanes,
//! structural-variant links) plus two values it resolves once at load time:
//! each type's [`StructuralRole`] and the station flag derived from lane stop
//! classes. Filter calls re-read the catalog on every invocation; nothing in
//! here caches candidate sets.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::ident::{make_type_key, TypeKey};

/// Display names beginning with this prefix are treated as structurally
/// `Bridge` even when the declaring pack never links them as a bridge
/// variant. Certain third-party elevated station tracks ship without the
/// bridge link; matching the name is the only signal available.
pub const ELEVATED_STATION_PREFIX: &str = "Station Track Eleva";

/// Behavioural category of an edge type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Vehicular road.
    Road,
    /// Heavy rail track.
    RailTrack,
    /// Metro track.
    MetroTrack,
    /// Pedestrian path.
    Pedestrian,
    /// Decorative / non-traffic segment.
    Decoration,
    /// Anything else.
    Other,
}

/// Symmetric category pairs whose types interoperate when their structural
/// roles match. Third-party packs implement logically-equivalent track on
/// the other category's underlying behaviour; the filter admits them both
/// ways.
const EQUIVALENT_CATEGORIES: &[(Category, Category)] = &[(Category::RailTrack, Category::MetroTrack)];

impl Category {
    /// Returns `true` when `self` and `other` are linked by the fixed
    /// equivalence table (checked in both orders, so the relation is
    /// symmetric by construction).
    #[must_use]
    pub fn is_equivalent_to(self, other: Category) -> bool {
        EQUIVALENT_CATEGORIES
            .iter()
            .any(|&(a, b)| (a == self && b == other) || (a == other && b == self))
    }
}

/// Structural form of an edge type within its variant family.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructuralRole {
    /// Ground-level form.
    #[default]
    Plain,
    /// Transition ramp between levels.
    Slope,
    /// Elevated form.
    Elevated,
    /// Bridge form.
    Bridge,
    /// Tunnel form.
    Tunnel,
}

/// Optional links from a type to its structural counterparts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructuralVariants {
    /// Slope counterpart, when declared.
    pub slope: Option<TypeKey>,
    /// Elevated counterpart, when declared.
    pub elevated: Option<TypeKey>,
    /// Bridge counterpart, when declared.
    pub bridge: Option<TypeKey>,
    /// Tunnel counterpart, when declared.
    pub tunnel: Option<TypeKey>,
}

/// Stop classification of a traffic lane.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopClass {
    /// Lane has no stop.
    #[default]
    None,
    /// Passenger boarding stop.
    Passenger,
    /// Cargo loading stop.
    Cargo,
}

/// Declared traffic lane attributes (only what the catalog needs).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneDecl {
    /// Stop classification for this lane.
    pub stop: StopClass,
}

/// Declaration supplied by the host's type registry when loading a type.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeTypeDecl {
    /// Unique name; also the display name.
    pub name: String,
    /// Half of the type's cross-section width.
    pub half_width: f32,
    /// Behavioural category.
    pub category: Category,
    /// Declared traffic lanes.
    pub lanes: Vec<LaneDecl>,
    /// Structural-variant links.
    pub variants: StructuralVariants,
}

/// Catalog record for a single edge type.
///
/// `key`, `station`, and `role` are resolved by the catalog; everything else
/// is carried over from the declaration.
#[derive(Clone, Debug)]
pub struct EdgeTypeRecord {
    /// Stable key derived from `name`.
    pub key: TypeKey,
    /// Unique display name.
    pub name: String,
    /// Half of the type's cross-section width.
    pub half_width: f32,
    /// Behavioural category.
    pub category: Category,
    /// True when any lane carries a non-none stop classification.
    pub station: bool,
    /// Structural-variant links.
    pub variants: StructuralVariants,
    /// Structural role resolved at load time (see [`TypeCatalog::finalize`]).
    pub role: StructuralRole,
}

/// Errors emitted while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A type with the same name was already registered.
    #[error("duplicate type name: {0}")]
    DuplicateName(String),
    /// The catalog was mutated after finalization.
    #[error("catalog already finalized")]
    Finalized,
}

/// Read-only universe of known edge types.
///
/// Records keep insertion order, which doubles as the identity-order
/// tiebreak for candidate sorting. Lookup goes through an `FxHashMap` keyed
/// by [`TypeKey`].
#[derive(Debug, Default)]
pub struct TypeCatalog {
    records: Vec<EdgeTypeRecord>,
    index: FxHashMap<TypeKey, usize>,
    finalized: bool,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type declaration and returns its key.
    ///
    /// The station flag is derived here: true iff any declared lane has a
    /// non-none stop classification.
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateName`] when a type with the same
    /// name was already registered, or [`CatalogError::Finalized`] after
    /// [`TypeCatalog::finalize`] has run.
    pub fn insert(&mut self, decl: EdgeTypeDecl) -> Result<TypeKey, CatalogError> {
        if self.finalized {
            return Err(CatalogError::Finalized);
        }
        let key = make_type_key(&decl.name);
        if self.index.contains_key(&key) {
            return Err(CatalogError::DuplicateName(decl.name));
        }
        let station = decl.lanes.iter().any(|lane| lane.stop != StopClass::None);
        let record = EdgeTypeRecord {
            key,
            name: decl.name,
            half_width: decl.half_width,
            category: decl.category,
            station,
            variants: decl.variants,
            role: StructuralRole::Plain,
        };
        self.index.insert(key, self.records.len());
        self.records.push(record);
        Ok(key)
    }

    /// Resolves each record's structural role from the variant links.
    ///
    /// A type is `Slope`/`Elevated`/`Bridge`/`Tunnel` when any record's
    /// corresponding variant link names it; otherwise `Plain`. Types whose
    /// display name starts with [`ELEVATED_STATION_PREFIX`] and resolved
    /// `Plain` are reassigned `Bridge` (packs that omit the bridge link).
    ///
    /// Idempotent; call once after the registry enumeration completes.
    pub fn finalize(&mut self) {
        let mut roles: FxHashMap<TypeKey, StructuralRole> = FxHashMap::default();
        for record in &self.records {
            let links = [
                (record.variants.slope, StructuralRole::Slope),
                (record.variants.elevated, StructuralRole::Elevated),
                (record.variants.bridge, StructuralRole::Bridge),
                (record.variants.tunnel, StructuralRole::Tunnel),
            ];
            for (link, role) in links {
                if let Some(key) = link {
                    roles.insert(key, role);
                }
            }
        }
        for record in &mut self.records {
            record.role = roles.get(&record.key).copied().unwrap_or_default();
            if record.role == StructuralRole::Plain
                && record.name.starts_with(ELEVATED_STATION_PREFIX)
            {
                record.role = StructuralRole::Bridge;
            }
        }
        self.finalized = true;
    }

    /// Returns the record for `key` when it exists.
    #[must_use]
    pub fn get(&self, key: TypeKey) -> Option<&EdgeTypeRecord> {
        self.index.get(&key).map(|&i| &self.records[i])
    }

    /// Returns `true` when `key` names a registered type.
    #[must_use]
    pub fn contains(&self, key: TypeKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Iterates all records in insertion (identity) order.
    ///
    /// Restartable: every filter call re-enumerates from the start, so a
    /// universe that grew between calls is picked up without invalidation.
    pub fn iter(&self) -> impl Iterator<Item = &EdgeTypeRecord> {
        self.records.iter()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insertion position of `key`, used as the candidate-sort tiebreak.
    #[must_use]
    pub fn identity_order(&self, key: TypeKey) -> Option<usize> {
        self.index.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, category: Category) -> EdgeTypeDecl {
        EdgeTypeDecl {
            name: name.to_owned(),
            half_width: 3.0,
            category,
            lanes: Vec::new(),
            variants: StructuralVariants::default(),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut catalog = TypeCatalog::new();
        catalog.insert(decl("Basic Road", Category::Road)).unwrap();
        let err = catalog.insert(decl("Basic Road", Category::Road)).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(_)));
    }

    #[test]
    fn station_flag_derives_from_lane_stops() {
        let mut catalog = TypeCatalog::new();
        let mut with_stop = decl("Train Station Track", Category::RailTrack);
        with_stop.lanes = vec![
            LaneDecl { stop: StopClass::None },
            LaneDecl {
                stop: StopClass::Passenger,
            },
        ];
        let mut without = decl("Train Track", Category::RailTrack);
        without.lanes = vec![LaneDecl { stop: StopClass::None }];
        let a = catalog.insert(with_stop).unwrap();
        let b = catalog.insert(without).unwrap();
        assert!(catalog.get(a).unwrap().station);
        assert!(!catalog.get(b).unwrap().station);
    }

    #[test]
    fn finalize_resolves_roles_from_links() {
        let mut catalog = TypeCatalog::new();
        let elevated_key = make_type_key("Train Track Elevated");
        let mut ground = decl("Train Track", Category::RailTrack);
        ground.variants.elevated = Some(elevated_key);
        catalog.insert(ground).unwrap();
        catalog
            .insert(decl("Train Track Elevated", Category::RailTrack))
            .unwrap();
        catalog.finalize();
        assert_eq!(
            catalog.get(elevated_key).unwrap().role,
            StructuralRole::Elevated
        );
        assert_eq!(
            catalog.get(make_type_key("Train Track")).unwrap().role,
            StructuralRole::Plain
        );
    }

    #[test]
    fn elevated_station_prefix_resolves_to_bridge() {
        let mut catalog = TypeCatalog::new();
        let key = catalog
            .insert(decl("Station Track Elevated 01", Category::RailTrack))
            .unwrap();
        catalog.finalize();
        assert_eq!(catalog.get(key).unwrap().role, StructuralRole::Bridge);
    }

    #[test]
    fn linked_role_wins_over_name_prefix() {
        let mut catalog = TypeCatalog::new();
        let key = make_type_key("Station Track Elevated 02");
        let mut ground = decl("Station Track", Category::RailTrack);
        ground.variants.elevated = Some(key);
        catalog.insert(ground).unwrap();
        catalog
            .insert(decl("Station Track Elevated 02", Category::RailTrack))
            .unwrap();
        catalog.finalize();
        assert_eq!(catalog.get(key).unwrap().role, StructuralRole::Elevated);
    }

    #[test]
    fn category_equivalence_is_symmetric() {
        assert!(Category::RailTrack.is_equivalent_to(Category::MetroTrack));
        assert!(Category::MetroTrack.is_equivalent_to(Category::RailTrack));
        assert!(!Category::Road.is_equivalent_to(Category::MetroTrack));
    }

    #[test]
    fn insert_after_finalize_is_rejected() {
        let mut catalog = TypeCatalog::new();
        catalog.finalize();
        let err = catalog.insert(decl("Late", Category::Road)).unwrap_err();
        assert!(matches!(err, CatalogError::Finalized));
    }
}
