// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Provenance classification for display grouping.
//!
//! Best-effort name/category heuristics, order-sensitive and first-match
//! wins. Types using unanticipated naming will be misclassified; nothing
//! downstream depends on this being exact, and the pattern tables below are
//! covered by their own test table so additions never touch filter or
//! engine logic.

use crate::catalog::{Category, EdgeTypeRecord};

/// Origin classification of an edge type, for display grouping only.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Provenance {
    /// Shipped with the base distribution.
    BuiltIn,
    /// Shipped by an official extension pack.
    ExtensionPack,
    /// Subscribed third-party content.
    ThirdPartyMod,
}

/// Markers of known mods that imitate extension-pack naming; checked before
/// the generic extension patterns so genuinely third-party content is not
/// folded into the extension group.
const THIRD_PARTY_OVERRIDE_MARKERS: &[&str] = &["NExt2", "Vanilla+"];

/// Extension-pack name prefixes.
const EXTENSION_PREFIXES: &[&str] = &["Tram ", "Monorail ", "Trolleybus ", "Ferry "];

/// Extension-pack exact names.
const EXTENSION_EXACT: &[&str] = &["Cable Car Track"];

/// Returns `true` when the name opens with a numeric-dot package prefix
/// (`"123456.Name"`), the workshop's published-content convention.
fn has_package_prefix(name: &str) -> bool {
    let Some((head, _)) = name.split_once('.') else {
        return false;
    };
    !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit())
}

/// Classifies a type's origin from its identity string and category.
///
/// Order, first match wins:
/// 1. numeric-dot package prefix → [`Provenance::ThirdPartyMod`];
/// 2. known third-party override markers → [`Provenance::ThirdPartyMod`];
/// 3. extension-pack patterns (prefix, exact name, or metro-category
///    namespace) → [`Provenance::ExtensionPack`];
/// 4. otherwise [`Provenance::BuiltIn`].
#[must_use]
pub fn classify(record: &EdgeTypeRecord) -> Provenance {
    let name = record.name.as_str();
    if has_package_prefix(name) {
        return Provenance::ThirdPartyMod;
    }
    if THIRD_PARTY_OVERRIDE_MARKERS.iter().any(|m| name.contains(m)) {
        return Provenance::ThirdPartyMod;
    }
    if EXTENSION_PREFIXES.iter().any(|p| name.starts_with(p))
        || EXTENSION_EXACT.iter().any(|e| name == *e)
        || (record.category == Category::MetroTrack && name.starts_with("Metro "))
    {
        return Provenance::ExtensionPack;
    }
    Provenance::BuiltIn
}
