// ============================================================================
// mustable - A Typed Reactivity Bridge for Wrapped Class Instances
// ============================================================================
//
// Wrap plain mutable objects in facades that observe their mutating members,
// snapshot the affected state around each call, and bump a version counter
// only when something actually changed. The owning rendering unit subscribes
// to that version through a scheduler callback, so equal-value writes and
// no-op structural calls never cost a re-render.
// ============================================================================

pub mod collections;
pub mod core;
pub mod error;
mod macros;
pub mod primitives;
pub mod reactivity;

// Re-export core items at crate root for ergonomic access
pub use crate::core::registry::table_for;
pub use crate::core::snapshot::{OpaqueValue, Snapshot, SnapshotArgs};
pub use crate::core::types::{
    classify, ComparerFn, MemberBinding, MemberDescriptor, MemberShape, MemberTable,
    MemberTableBuilder, Mustable, MustableOptions, SnapshotFn,
};

// Re-export primitives at crate root
pub use crate::error::MustableError;
pub use crate::primitives::facade::Facade;
pub use crate::primitives::lifecycle::{Deps, MemoSlot, MustableRef, MustableRegistry};
pub use crate::primitives::scheduler::{Scheduler, VersionUpdater};

// Re-export snapshot comparers
pub use crate::reactivity::comparers::{
    always_changing, deep_same, shallow_same, top_level_seq_shallow_same,
};

// Re-export collections
pub use crate::collections::{MustableArray, MustableMap, MustableSet};

// =============================================================================
// TESTS
// =============================================================================
