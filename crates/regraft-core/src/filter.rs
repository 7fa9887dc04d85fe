// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compatibility filter: the universe of valid replacement candidates.
//!
//! Candidates are recomputed fresh on every call; the type universe can
//! grow between calls (additional content loading) and nothing here caches.

use crate::catalog::{Category, EdgeTypeRecord, TypeCatalog};
use crate::ident::TypeKey;
use crate::provenance::{classify, Provenance};

/// Bit set of allowed [`Category`] values.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategorySet(u8);

impl CategorySet {
    /// The empty set.
    pub const EMPTY: CategorySet = CategorySet(0);
    /// Every category.
    pub const ALL: CategorySet = CategorySet(0x3f);

    const fn bit(category: Category) -> u8 {
        1 << category as u8
    }

    /// Returns a set holding exactly `category`.
    #[must_use]
    pub const fn only(category: Category) -> CategorySet {
        CategorySet(Self::bit(category))
    }

    /// Returns `self` with `category` added.
    #[must_use]
    pub const fn with(self, category: Category) -> CategorySet {
        CategorySet(self.0 | Self::bit(category))
    }

    /// Returns `true` when `category` is in the set.
    #[must_use]
    pub const fn contains(self, category: Category) -> bool {
        self.0 & Self::bit(category) != 0
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::ALL
    }
}

/// Toggles controlling candidate selection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterOptions {
    /// Restrict candidates to types whose half-width exactly equals the
    /// source's. On by default.
    pub same_width_only: bool,
    /// Restrict candidates to types whose station flag matches the
    /// source's.
    pub station_only: bool,
    /// Allowed categories.
    pub categories: CategorySet,
    /// Case-insensitive substring match against the display name; empty
    /// means no name filtering.
    pub name_filter: String,
    /// Exclude types classified as built-in.
    pub hide_built_in: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            same_width_only: true,
            station_only: false,
            categories: CategorySet::ALL,
            name_filter: String::new(),
            hide_built_in: false,
        }
    }
}

fn category_admits(source: &EdgeTypeRecord, candidate: &EdgeTypeRecord, mask: CategorySet) -> bool {
    if mask.contains(candidate.category) {
        return true;
    }
    // Rail-category types interoperate with metro-category types (and vice
    // versa) when their structural roles match; third-party packs implement
    // logically-equivalent track on the other category's behaviour.
    candidate.category.is_equivalent_to(source.category) && candidate.role == source.role
}

/// Computes the ordered candidate set for replacing `source`.
///
/// Filters apply in a fixed order with short-circuiting and no side
/// effects: category membership, width, station flag, name substring,
/// built-in exclusion. The source type itself is never a candidate. An
/// unknown or null `source` yields an empty (never panicking) set.
///
/// Ordering: display name ascending, catalog insertion order as the
/// tiebreak.
#[must_use]
pub fn find_candidates(
    catalog: &TypeCatalog,
    source: TypeKey,
    options: &FilterOptions,
) -> Vec<TypeKey> {
    let Some(src) = catalog.get(source) else {
        return Vec::new();
    };
    let needle = options.name_filter.to_lowercase();
    let mut matched: Vec<(&str, usize, TypeKey)> = Vec::new();
    for (order, candidate) in catalog.iter().enumerate() {
        if candidate.key == src.key {
            continue;
        }
        if !category_admits(src, candidate, options.categories) {
            continue;
        }
        if options.same_width_only && candidate.half_width != src.half_width {
            continue;
        }
        if options.station_only && candidate.station != src.station {
            continue;
        }
        if !needle.is_empty() && !candidate.name.to_lowercase().contains(&needle) {
            continue;
        }
        if options.hide_built_in && classify(candidate) == Provenance::BuiltIn {
            continue;
        }
        matched.push((candidate.name.as_str(), order, candidate.key));
    }
    matched.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(&b.1)));
    matched.into_iter().map(|(_, _, key)| key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EdgeTypeDecl, LaneDecl, StopClass, StructuralVariants};
    use crate::ident::make_type_key;

    fn insert(
        catalog: &mut TypeCatalog,
        name: &str,
        half_width: f32,
        category: Category,
        station: bool,
    ) -> TypeKey {
        let lanes = if station {
            vec![LaneDecl {
                stop: StopClass::Passenger,
            }]
        } else {
            Vec::new()
        };
        catalog
            .insert(EdgeTypeDecl {
                name: name.to_owned(),
                half_width,
                category,
                lanes,
                variants: StructuralVariants::default(),
            })
            .unwrap()
    }

    #[test]
    fn worked_example_road_universe() {
        let mut catalog = TypeCatalog::new();
        let road_a = insert(&mut catalog, "RoadA", 3.0, Category::Road, false);
        let road_b = insert(&mut catalog, "RoadB", 3.0, Category::Road, false);
        let _rail_x = insert(&mut catalog, "RailX", 2.0, Category::RailTrack, false);
        catalog.finalize();
        let options = FilterOptions {
            categories: CategorySet::only(Category::Road),
            ..FilterOptions::default()
        };
        let candidates = find_candidates(&catalog, road_a, &options);
        assert_eq!(candidates, vec![road_b]);
    }

    #[test]
    fn unknown_source_yields_empty() {
        let catalog = TypeCatalog::new();
        let candidates = find_candidates(
            &catalog,
            make_type_key("Nothing"),
            &FilterOptions::default(),
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn station_toggle_matches_flag_equality() {
        let mut catalog = TypeCatalog::new();
        let plain = insert(&mut catalog, "Track", 2.0, Category::RailTrack, false);
        let _station = insert(&mut catalog, "Station Track", 2.0, Category::RailTrack, true);
        let plain_b = insert(&mut catalog, "Track B", 2.0, Category::RailTrack, false);
        catalog.finalize();
        let options = FilterOptions {
            station_only: true,
            categories: CategorySet::only(Category::RailTrack),
            ..FilterOptions::default()
        };
        let candidates = find_candidates(&catalog, plain, &options);
        assert_eq!(candidates, vec![plain_b]);
    }

    #[test]
    fn name_filter_is_case_insensitive() {
        let mut catalog = TypeCatalog::new();
        let source = insert(&mut catalog, "RoadA", 3.0, Category::Road, false);
        let wide = insert(&mut catalog, "Wide Avenue", 3.0, Category::Road, false);
        let _other = insert(&mut catalog, "RoadB", 3.0, Category::Road, false);
        catalog.finalize();
        let options = FilterOptions {
            name_filter: "AVE".to_owned(),
            ..FilterOptions::default()
        };
        assert_eq!(find_candidates(&catalog, source, &options), vec![wide]);
    }

    #[test]
    fn candidates_sort_by_display_name() {
        let mut catalog = TypeCatalog::new();
        let source = insert(&mut catalog, "Source", 3.0, Category::Road, false);
        let c = insert(&mut catalog, "Cedar Road", 3.0, Category::Road, false);
        let a = insert(&mut catalog, "Alder Road", 3.0, Category::Road, false);
        let b = insert(&mut catalog, "Birch Road", 3.0, Category::Road, false);
        catalog.finalize();
        let candidates = find_candidates(&catalog, source, &FilterOptions::default());
        assert_eq!(candidates, vec![a, b, c]);
    }

    #[test]
    fn rail_metro_equivalence_requires_matching_role() {
        let mut catalog = TypeCatalog::new();
        let elevated_rail = make_type_key("Rail Elevated");
        let elevated_metro = make_type_key("Metro Elevated");
        let mut rail = EdgeTypeDecl {
            name: "Rail".to_owned(),
            half_width: 2.0,
            category: Category::RailTrack,
            lanes: Vec::new(),
            variants: StructuralVariants::default(),
        };
        rail.variants.elevated = Some(elevated_rail);
        catalog.insert(rail).unwrap();
        let mut metro = EdgeTypeDecl {
            name: "Metro".to_owned(),
            half_width: 2.0,
            category: Category::MetroTrack,
            lanes: Vec::new(),
            variants: StructuralVariants::default(),
        };
        metro.variants.elevated = Some(elevated_metro);
        catalog.insert(metro).unwrap();
        insert(&mut catalog, "Rail Elevated", 2.0, Category::RailTrack, false);
        insert(&mut catalog, "Metro Elevated", 2.0, Category::MetroTrack, false);
        catalog.finalize();

        // Mask admits rail only; the elevated metro track rides in through
        // the equivalence rule because the roles line up.
        let options = FilterOptions {
            categories: CategorySet::only(Category::RailTrack),
            ..FilterOptions::default()
        };
        let candidates = find_candidates(&catalog, elevated_rail, &options);
        assert!(candidates.contains(&elevated_metro));

        // A ground metro track has a different role and stays out.
        let ground_metro = make_type_key("Metro");
        assert!(!candidates.contains(&ground_metro));
    }
}
