// ============================================================================
// mustable - Snapshot Comparers
// Policies deciding whether a before/after snapshot pair is a no-op
// ============================================================================

use std::mem::discriminant;

use crate::core::snapshot::Snapshot;

// =============================================================================
// COMPARERS
// =============================================================================

/// Never the same: every invocation of the member counts as a change.
///
/// The policy for mutators whose effect has no cheap snapshot.
pub fn always_changing(_before: &Snapshot, _after: &Snapshot) -> bool {
    false
}

/// Scalar value equality; composite snapshots are never the same.
///
/// `Seq` and `Map` captures are fresh per invocation, so two of them are
/// distinct observations even when their contents coincide - use
/// [`top_level_seq_shallow_same`] or [`deep_same`] to look inside.
pub fn shallow_same(before: &Snapshot, after: &Snapshot) -> bool {
    match (before, after) {
        (Snapshot::Absent, Snapshot::Absent) => true,
        (Snapshot::Unit, Snapshot::Unit) => true,
        (Snapshot::Bool(a), Snapshot::Bool(b)) => a == b,
        (Snapshot::Int(a), Snapshot::Int(b)) => a == b,
        (Snapshot::Float(a), Snapshot::Float(b)) => a == b,
        (Snapshot::Text(a), Snapshot::Text(b)) => a == b,
        (Snapshot::Instant(a), Snapshot::Instant(b)) => a == b,
        (Snapshot::Opaque(a), Snapshot::Opaque(b)) => a.opaque_eq(&**b),
        _ => false,
    }
}

/// Element-wise [`shallow_same`] over two sequences of equal length; anything
/// else falls back to [`shallow_same`] on the pair itself.
///
/// The default policy when a member declares a snapshot without naming a
/// comparer: snapshots are typically small argument or element sequences,
/// and one level of structure is exactly what they need.
pub fn top_level_seq_shallow_same(before: &Snapshot, after: &Snapshot) -> bool {
    match (before, after) {
        (Snapshot::Seq(a), Snapshot::Seq(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| shallow_same(x, y))
        }
        _ => shallow_same(before, after),
    }
}

/// Full structural equality: recurses through sequences and mappings,
/// compares date-likes by instant and regex-likes by source text.
pub fn deep_same(before: &Snapshot, after: &Snapshot) -> bool {
    if discriminant(before) != discriminant(after) {
        return false;
    }
    match (before, after) {
        (Snapshot::Seq(a), Snapshot::Seq(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| deep_same(x, y))
        }
        (Snapshot::Map(a), Snapshot::Map(b)) => {
            a.len() == b.len()
                && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| {
                    ka == kb && deep_same(va, vb)
                })
        }
        (Snapshot::Instant(a), Snapshot::Instant(b)) => a == b,
        (Snapshot::Pattern(a), Snapshot::Pattern(b)) => a == b,
        _ => shallow_same(before, after),
    }
}

// =============================================================================
// TESTS
// =============================================================================
