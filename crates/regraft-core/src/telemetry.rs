// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

// Telemetry helpers for JSONL logging when the `telemetry` feature is enabled.
// Manually formats JSON to avoid pulling serde_json into the core.

use crate::ident::{EdgeHandle, TypeKey};

fn ts_micros() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros()
}

fn emit_edge(kind: &str, source: TypeKey, old: EdgeHandle, new: EdgeHandle) {
    use std::io::Write as _;
    let mut out = std::io::stdout().lock();
    let _ = write!(
        out,
        r#"{{"timestamp_micros":{},"event":"{}","source_type":"{}","old_edge":{},"new_edge":{}}}"#,
        ts_micros(),
        kind,
        source.short_hex(),
        old.index(),
        new.index()
    );
    let _ = out.write_all(b"\n");
}

/// Emits a `replaced` event for one successfully retyped edge.
///
/// Best-effort: I/O errors are ignored and timestamps fall back to 0 on
/// clock errors.
pub fn replaced(source: TypeKey, old: EdgeHandle, new: EdgeHandle) {
    emit_edge("replaced", source, old, new);
}

/// Emits a `skipped_boundary` event for an edge protected by an outside
/// connection. Best-effort, same caveats as [`replaced`].
pub fn skipped_boundary(source: TypeKey, edge: EdgeHandle) {
    emit_edge("skipped_boundary", source, edge, EdgeHandle::NONE);
}

/// Emits a `create_failed` event when the host refused a replacement edge.
/// Best-effort, same caveats as [`replaced`].
pub fn create_failed(source: TypeKey, edge: EdgeHandle) {
    emit_edge("create_failed", source, edge, EdgeHandle::NONE);
}

/// Emits a `summary` event with the batch counts at the end of a scan.
/// Best-effort, same caveats as [`replaced`].
pub fn summary(source: TypeKey, created: usize, skipped: u32, failed: u32) {
    use std::io::Write as _;
    let mut out = std::io::stdout().lock();
    let _ = write!(
        out,
        r#"{{"timestamp_micros":{},"event":"summary","source_type":"{}","created":{},"skipped_boundary":{},"create_failed":{}}}"#,
        ts_micros(),
        source.short_hex(),
        created,
        skipped,
        failed
    );
    let _ = out.write_all(b"\n");
}
