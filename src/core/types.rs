// ============================================================================
// mustable - Member Classification & Metadata
// Descriptors, the decoration builder, and the wrapped-base capability
// ============================================================================

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::core::snapshot::{Snapshot, SnapshotArgs};
use crate::reactivity::comparers::top_level_seq_shallow_same;

// =============================================================================
// FUNCTION TYPES
// =============================================================================

/// Captures a lightweight snapshot from a wrapped instance and, for methods,
/// the arguments the member was called with. The `&dyn Any` is the instance;
/// implementations downcast to their own class.
pub type SnapshotFn = fn(&dyn Any, &SnapshotArgs) -> Snapshot;

/// Decides whether two snapshots are the same (true = no-op, suppress the
/// version bump). Must be pure and total.
pub type ComparerFn = fn(&Snapshot, &Snapshot) -> bool;

// =============================================================================
// MEMBER SHAPES
// =============================================================================

/// What kind of class member a descriptor covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberShape {
    /// Plain data field.
    Field,
    /// Accessor pair (at least a setter).
    Property,
    /// Invocable member.
    Method,
}

/// What the declarer knows about a member at decoration time. The classifier
/// turns this into a [`MemberShape`], or nothing when the member cannot be
/// classified.
#[derive(Debug, Clone, Copy)]
pub enum MemberBinding {
    /// The member's value is invocable.
    Invocable,
    /// A plain stored value, no accessors.
    Value,
    /// Accessor-backed member.
    Accessor { get: bool, set: bool },
}

/// Classify a member binding into a shape.
///
/// Invocable values are methods; members with no accessors are fields; a
/// setter (with or without a getter) makes a property. A getter-only member
/// has no recognized shape and is skipped - it stays pass-through.
pub fn classify(binding: MemberBinding) -> Option<MemberShape> {
    match binding {
        MemberBinding::Invocable => Some(MemberShape::Method),
        MemberBinding::Value | MemberBinding::Accessor { get: false, set: false } => {
            Some(MemberShape::Field)
        }
        MemberBinding::Accessor { set: true, .. } => Some(MemberShape::Property),
        MemberBinding::Accessor { get: true, set: false } => None,
    }
}

// =============================================================================
// MUSTABLE OPTIONS
// =============================================================================

/// Configuration bundle for the mutating marker.
#[derive(Clone, Copy, Default)]
pub struct MustableOptions {
    /// When true, a function-valued field's *invocation* is the mutating
    /// event rather than its assignment. Has no effect on methods.
    pub is_mustable_fn: bool,
    /// Lightweight snapshot of the state this member affects.
    pub snapshot: Option<SnapshotFn>,
    /// Custom comparer for the before/after snapshots.
    pub comparer: Option<ComparerFn>,
}

impl MustableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mustable_fn(mut self) -> Self {
        self.is_mustable_fn = true;
        self
    }

    pub fn snapshot(mut self, f: SnapshotFn) -> Self {
        self.snapshot = Some(f);
        self
    }

    pub fn comparer(mut self, f: ComparerFn) -> Self {
        self.comparer = Some(f);
        self
    }

    /// A snapshot without a comparer gets the top-level-sequence default; a
    /// comparer without a snapshot is meaningless and silently dropped.
    pub(crate) fn normalized(mut self) -> Self {
        if self.snapshot.is_some() {
            self.comparer
                .get_or_insert(top_level_seq_shallow_same as ComparerFn);
        } else {
            self.comparer = None;
        }
        self
    }
}

impl fmt::Debug for MustableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MustableOptions")
            .field("is_mustable_fn", &self.is_mustable_fn)
            .field("snapshot", &self.snapshot.is_some())
            .field("comparer", &self.comparer.is_some())
            .finish()
    }
}

// =============================================================================
// MEMBER DESCRIPTOR
// =============================================================================

/// Per-member metadata, created once at class registration and read-only
/// afterwards.
pub struct MemberDescriptor {
    pub name: &'static str,
    pub shape: MemberShape,
    pub is_mustable_fn: bool,
    pub snapshot: Option<SnapshotFn>,
    pub comparer: Option<ComparerFn>,
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("is_mustable_fn", &self.is_mustable_fn)
            .field("snapshot", &self.snapshot.is_some())
            .field("comparer", &self.comparer.is_some())
            .finish()
    }
}

// =============================================================================
// MEMBER TABLE
// =============================================================================

/// The descriptor set of one wrapped class: which members are mustable, with
/// what snapshot policy, plus the audit list of members explicitly marked
/// pass-through.
pub struct MemberTable {
    class: &'static str,
    members: HashMap<&'static str, MemberDescriptor>,
    pass_through: Vec<&'static str>,
}

impl MemberTable {
    pub fn builder(class: &'static str) -> MemberTableBuilder {
        MemberTableBuilder {
            class,
            members: HashMap::new(),
            pass_through: Vec::new(),
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    /// Look up the descriptor for a member; `None` means pass-through.
    pub fn descriptor(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.get(name)
    }

    /// Number of mustable members.
    pub fn mustable_count(&self) -> usize {
        self.members.len()
    }

    /// Whether a member has been explicitly decorated one way or the other.
    /// Supports the "no member left undecorated" audit convention.
    pub fn is_classified(&self, name: &str) -> bool {
        self.members.contains_key(name) || self.pass_through.contains(&name)
    }

    pub fn mustable_members(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.values()
    }

    pub fn pass_through_members(&self) -> &[&'static str] {
        &self.pass_through
    }
}

impl fmt::Debug for MemberTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberTable")
            .field("class", &self.class)
            .field("mustable", &self.members.len())
            .field("pass_through", &self.pass_through.len())
            .finish()
    }
}

// =============================================================================
// DECORATION API
// =============================================================================

/// The two declarative markers applied to class members while defining a
/// [`Mustable`] class.
///
/// `mustable` / `mustable_with` classify the member and write a descriptor;
/// members whose binding cannot be classified are skipped and stay
/// pass-through. `immustable` writes no descriptor - it only records that the
/// member was deliberately excluded, so a class can be audited for members
/// that were never decorated at all.
pub struct MemberTableBuilder {
    class: &'static str,
    members: HashMap<&'static str, MemberDescriptor>,
    pass_through: Vec<&'static str>,
}

impl MemberTableBuilder {
    /// Mark a member as mutating with default options.
    pub fn mustable(self, name: &'static str, binding: MemberBinding) -> Self {
        self.mustable_with(name, binding, MustableOptions::default())
    }

    /// Mark a member as mutating with an explicit options bundle.
    pub fn mustable_with(
        mut self,
        name: &'static str,
        binding: MemberBinding,
        options: MustableOptions,
    ) -> Self {
        let options = options.normalized();
        if let Some(shape) = classify(binding) {
            self.members.insert(
                name,
                MemberDescriptor {
                    name,
                    shape,
                    is_mustable_fn: options.is_mustable_fn,
                    snapshot: options.snapshot,
                    comparer: options.comparer,
                },
            );
        }
        self
    }

    /// Mark a member as deliberately pass-through.
    pub fn immustable(mut self, name: &'static str) -> Self {
        self.pass_through.push(name);
        self
    }

    pub fn build(self) -> MemberTable {
        MemberTable {
            class: self.class,
            members: self.members,
            pass_through: self.pass_through,
        }
    }
}

// =============================================================================
// WRAPPED-BASE CAPABILITY
// =============================================================================

/// The wrapped-base capability: a class that can be observed through a
/// [`Facade`](crate::Facade).
///
/// Implementing this is the explicit, construction-time equivalent of
/// extending a reflective base class: the member table declares, once per
/// class, which members are mutating and under what snapshot policy. Tables
/// are memoized per class by the class registry.
///
/// Member names `version` and `instance` are reserved for the facade's own
/// accessors; in this typed rendition they live on the facade type itself, so
/// a user member can never shadow them.
pub trait Mustable: Any {
    /// Declare this class's member descriptors.
    fn define_members(builder: MemberTableBuilder) -> MemberTable
    where
        Self: Sized;
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactivity::comparers::shallow_same;

    fn len_snapshot(_instance: &dyn Any, _args: &SnapshotArgs) -> Snapshot {
        Snapshot::Int(0)
    }

    #[test]
    fn classification_table() {
        assert_eq!(classify(MemberBinding::Invocable), Some(MemberShape::Method));
        assert_eq!(classify(MemberBinding::Value), Some(MemberShape::Field));
        assert_eq!(
            classify(MemberBinding::Accessor { get: false, set: false }),
            Some(MemberShape::Field)
        );
        assert_eq!(
            classify(MemberBinding::Accessor { get: true, set: true }),
            Some(MemberShape::Property)
        );
        assert_eq!(
            classify(MemberBinding::Accessor { get: false, set: true }),
            Some(MemberShape::Property)
        );
        // Getter-only members have no recognized shape
        assert_eq!(
            classify(MemberBinding::Accessor { get: true, set: false }),
            None
        );
    }

    #[test]
    fn snapshot_gets_default_comparer() {
        let options = MustableOptions::new().snapshot(len_snapshot).normalized();
        assert!(options.comparer.is_some());
    }

    #[test]
    fn comparer_without_snapshot_is_dropped() {
        let options = MustableOptions::new().comparer(shallow_same).normalized();
        assert!(options.comparer.is_none());
    }

    #[test]
    fn explicit_comparer_survives_normalization() {
        let options = MustableOptions::new()
            .snapshot(len_snapshot)
            .comparer(shallow_same)
            .normalized();
        assert_eq!(options.comparer, Some(shallow_same as ComparerFn));
    }

    #[test]
    fn unclassifiable_member_writes_no_descriptor() {
        let table = MemberTable::builder("Sample")
            .mustable("readable", MemberBinding::Accessor { get: true, set: false })
            .mustable("writable", MemberBinding::Accessor { get: true, set: true })
            .build();

        assert!(table.descriptor("readable").is_none());
        assert!(table.descriptor("writable").is_some());
        assert!(!table.is_classified("readable"));
    }

    #[test]
    fn pass_through_marker_is_audit_only() {
        let table = MemberTable::builder("Sample")
            .mustable("touch", MemberBinding::Invocable)
            .immustable("peek")
            .build();

        assert!(table.descriptor("peek").is_none());
        assert!(table.is_classified("peek"));
        assert!(table.is_classified("touch"));
        assert!(!table.is_classified("unlisted"));
        assert_eq!(table.mustable_count(), 1);
    }
}
