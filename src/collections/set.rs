// ============================================================================
// mustable - Mustable Set
// Uniqueness container with facade-routed mutators, insertion-ordered
// ============================================================================

use std::any::Any;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;

use crate::core::snapshot::{Snapshot, SnapshotArgs};
use crate::core::types::{MemberBinding, MemberTable, MemberTableBuilder, Mustable, MustableOptions};
use crate::primitives::facade::Facade;
use crate::reactivity::comparers::shallow_same;

// =============================================================================
// MUSTABLE SET
// =============================================================================

/// A uniqueness container designed to be wrapped in a [`Facade`].
///
/// Iteration order is insertion order. Inserting an element already present
/// and removing one that is absent are suppressed no-ops; every mutator
/// snapshots the element count.
#[derive(Clone, PartialEq)]
pub struct MustableSet<T: Eq + Hash> {
    items: IndexSet<T>,
}

impl<T> MustableSet<T>
where
    T: Eq + Hash + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            items: IndexSet::new(),
        }
    }

    /// Build from a list; duplicates collapse to their first occurrence.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Detached copy of the contents, in iteration order.
    pub fn to_set(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    /// A new independent container with the same contents.
    pub fn shallow_clone(&self) -> Self {
        self.clone()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn values(&self) -> Vec<T> {
        self.to_set()
    }

    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        self.items.iter().for_each(&mut f);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Replace the entire contents; duplicates collapse to their first
    /// occurrence.
    pub fn replace_from(&mut self, items: Vec<T>) {
        self.items = items.into_iter().collect();
    }

    /// Add `item`; returns whether it was newly added.
    pub fn insert(&mut self, item: T) -> bool {
        self.items.insert(item)
    }

    /// Remove `item`, preserving the order of the remaining elements;
    /// returns whether it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        self.items.shift_remove(item)
    }

    /// Remove every listed element; absent elements are ignored.
    pub fn remove_all(&mut self, items: &[T]) {
        for item in items {
            self.items.shift_remove(item);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    fn size_snapshot(instance: &dyn Any, _args: &SnapshotArgs) -> Snapshot {
        let Some(set) = instance.downcast_ref::<Self>() else {
            return Snapshot::Absent;
        };
        Snapshot::from(set.len())
    }
}

impl<T> Default for MustableSet<T>
where
    T: Eq + Hash + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for MustableSet<T>
where
    T: Eq + Hash + Clone + 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: fmt::Debug + Eq + Hash> fmt::Debug for MustableSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

// =============================================================================
// MEMBER TABLE
// =============================================================================

impl<T> Mustable for MustableSet<T>
where
    T: Eq + Hash + Clone + 'static,
{
    fn define_members(builder: MemberTableBuilder) -> MemberTable {
        builder
            // Membership mutators: the element count is the whole observable
            // effect, so it doubles as the no-op detector (insert-present,
            // remove-absent, clear-empty)
            .mustable_with(
                "insert",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::size_snapshot)
                    .comparer(shallow_same),
            )
            .mustable_with(
                "remove",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::size_snapshot)
                    .comparer(shallow_same),
            )
            .mustable_with(
                "remove_all",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::size_snapshot)
                    .comparer(shallow_same),
            )
            .mustable_with(
                "clear",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::size_snapshot)
                    .comparer(shallow_same),
            )
            .mustable("replace_from", MemberBinding::Invocable)
            .immustable("to_set")
            .immustable("shallow_clone")
            .immustable("contains")
            .immustable("values")
            .immustable("for_each")
            .immustable("len")
            .immustable("is_empty")
            .build()
    }
}

// =============================================================================
// FACADE SURFACE
// =============================================================================

impl<T> Facade<MustableSet<T>>
where
    T: Eq + Hash + Clone + 'static,
{
    pub fn to_set(&self) -> Vec<T> {
        self.read(MustableSet::to_set)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.read(|set| set.contains(item))
    }

    pub fn values(&self) -> Vec<T> {
        self.read(MustableSet::values)
    }

    pub fn len(&self) -> usize {
        self.read(MustableSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(MustableSet::is_empty)
    }

    pub fn replace_from(&self, items: Vec<T>) -> Option<()> {
        self.invoke("replace_from", SnapshotArgs::none(), move |set| {
            set.replace_from(items)
        })
    }

    pub fn insert(&self, item: T) -> Option<bool> {
        self.invoke("insert", SnapshotArgs::none(), move |set| set.insert(item))
    }

    pub fn remove(&self, item: &T) -> Option<bool> {
        let item = item.clone();
        self.invoke("remove", SnapshotArgs::none(), move |set| set.remove(&item))
    }

    pub fn remove_all(&self, items: Vec<T>) -> Option<()> {
        self.invoke("remove_all", SnapshotArgs::none(), move |set| {
            set.remove_all(&items)
        })
    }

    pub fn clear(&self) -> Option<()> {
        self.invoke("clear", SnapshotArgs::none(), MustableSet::clear)
    }
}

// =============================================================================
// TESTS
// =============================================================================
