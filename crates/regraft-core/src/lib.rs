// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! regraft-core: atomic typed network edge retyping engine.
//!
//! Given a host-owned arena of typed edges, a retype batch atomically
//! replaces every interior edge of a source type with newly created edges of
//! a structurally compatible target type at the same topological positions,
//! records a single-level undo, and computes the candidate universe of
//! compatible replacement types.
//!
//! # Error taxonomy
//! - Per-edge recoverable conditions (boundary protection, refused
//!   creation) are aggregated into counts on [`RetypeOutcome`]; they are
//!   never surfaced as errors.
//! - Per-call rejections ([`RetypeError`]) happen before any mutation.
//! - A fault raised mid-scan by a host implementation aborts the rest of
//!   that scan and leaves completed replacements in place; the engine
//!   guarantees only that its in-progress flag is cleared (the batch is not
//!   transactional).
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::float_cmp,
    clippy::option_if_let_else
)]

mod catalog;
mod engine;
mod filter;
mod host;
mod ident;
mod network;
mod provenance;
mod record;
mod session;
#[cfg(feature = "telemetry")]
mod telemetry;
mod undo;

// Re-exports for stable public API
/// Edge type catalog: categories, structural roles, and declared attributes.
pub use catalog::{
    Category, EdgeTypeDecl, EdgeTypeRecord, LaneDecl, StopClass, StructuralRole,
    StructuralVariants, TypeCatalog, CatalogError, ELEVATED_STATION_PREFIX,
};
/// Retype engine, outcomes, and per-call rejections.
pub use engine::{PathRetypeOutcome, RetypeEngine, RetypeError, RetypeOutcome};
/// Compatibility filter options and candidate computation.
pub use filter::{find_candidates, CategorySet, FilterOptions};
/// Host storage ports consumed by the engine.
pub use host::{EdgeHost, PathHost};
/// Core identifier types and constructors.
pub use ident::{make_type_key, EdgeHandle, Hash, NodeHandle, TypeKey};
/// In-memory reference host used by tests and tooling.
pub use network::{MemoryBuilding, MemoryNetwork};
/// Provenance classification for display grouping.
pub use provenance::{classify, Provenance};
/// Slot record types and flags.
pub use record::{EdgeFlags, EdgeRecord, NodeFlags, NodeRecord, PathSlotRef};
/// Session facade: the caller-facing surface.
pub use session::{NoPaths, RetypeSession};
/// Single-level undo log.
pub use undo::{UndoLog, UndoRecord};
