// ============================================================================
// mustable - Mustable Map
// Keyed container with facade-routed mutators, insertion-ordered
// ============================================================================

use std::any::Any;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::core::snapshot::{Snapshot, SnapshotArgs};
use crate::core::types::{MemberBinding, MemberTable, MemberTableBuilder, Mustable, MustableOptions};
use crate::primitives::facade::Facade;
use crate::reactivity::comparers::shallow_same;
use crate::snapshot_args;

// =============================================================================
// MUSTABLE MAP
// =============================================================================

/// A keyed container designed to be wrapped in a [`Facade`].
///
/// Iteration order is insertion order, and re-inserting an existing key keeps
/// its original position. Re-inserting a key with an equal value is a
/// suppressed no-op; structural mutators snapshot the entry count so removing
/// an absent key never bumps.
#[derive(Clone, PartialEq)]
pub struct MustableMap<K: Eq + Hash, V> {
    entries: IndexMap<K, V>,
}

impl<K, V> MustableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Build from pairs; a repeated key keeps the last value, first position.
    pub fn from_entries(pairs: Vec<(K, V)>) -> Self {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.entries.insert(key, value);
        }
        map
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Detached copy of the contents as plain pairs, in iteration order.
    pub fn to_map(&self) -> Vec<(K, V)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// A new independent container with the same contents.
    pub fn shallow_clone(&self) -> Self {
        self.clone()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> Vec<K> {
        self.entries.keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<V> {
        self.entries.values().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(K, V)> {
        self.to_map()
    }

    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (key, value) in &self.entries {
            f(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Replace the entire contents; a repeated key in `pairs` keeps the last
    /// value.
    pub fn replace_from(&mut self, pairs: Vec<(K, V)>) {
        self.entries = IndexMap::new();
        for (key, value) in pairs {
            self.entries.insert(key, value);
        }
    }

    /// Write `value` under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Remove `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.shift_remove(key)
    }

    /// Remove every listed key; absent keys are ignored.
    pub fn remove_all(&mut self, keys: &[K]) {
        for key in keys {
            self.entries.shift_remove(key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    fn size_snapshot(instance: &dyn Any, _args: &SnapshotArgs) -> Snapshot {
        let Some(map) = instance.downcast_ref::<Self>() else {
            return Snapshot::Absent;
        };
        Snapshot::from(map.len())
    }

    /// The value under the key being written (first snapshot argument).
    fn value_snapshot(instance: &dyn Any, args: &SnapshotArgs) -> Snapshot {
        let Some(map) = instance.downcast_ref::<Self>() else {
            return Snapshot::Absent;
        };
        args.get::<K>(0)
            .and_then(|key| map.get(key))
            .map(|value| Snapshot::opaque(value.clone()))
            .unwrap_or(Snapshot::Absent)
    }
}

impl<K, V> Default for MustableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for MustableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K: fmt::Debug + Eq + Hash, V: fmt::Debug> fmt::Debug for MustableMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

// =============================================================================
// MEMBER TABLE
// =============================================================================

impl<K, V> Mustable for MustableMap<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    fn define_members(builder: MemberTableBuilder) -> MemberTable {
        builder
            // Keyed write: snapshot the value under the key so an equal
            // re-insert is suppressed
            .mustable_with(
                "insert",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::value_snapshot)
                    .comparer(shallow_same),
            )
            // Structural mutators: an entry-count snapshot catches removing
            // an absent key and clearing an already empty map
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
            .immustable("to_map")
            .immustable("shallow_clone")
            .immustable("get")
            .immustable("contains_key")
            .immustable("keys")
            .immustable("values")
            .immustable("entries")
            .immustable("for_each")
            .immustable("len")
            .immustable("is_empty")
            .build()
    }
}

// =============================================================================
// FACADE SURFACE
// =============================================================================

impl<K, V> Facade<MustableMap<K, V>>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    pub fn to_map(&self) -> Vec<(K, V)> {
        self.read(MustableMap::to_map)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.read(|map| map.get(key).cloned())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.read(|map| map.contains_key(key))
    }

    pub fn keys(&self) -> Vec<K> {
        self.read(MustableMap::keys)
    }

    pub fn values(&self) -> Vec<V> {
        self.read(MustableMap::values)
    }

    pub fn entries(&self) -> Vec<(K, V)> {
        self.read(MustableMap::entries)
    }

    pub fn len(&self) -> usize {
        self.read(MustableMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(MustableMap::is_empty)
    }

    pub fn replace_from(&self, pairs: Vec<(K, V)>) -> Option<()> {
        self.invoke("replace_from", SnapshotArgs::none(), move |map| {
            map.replace_from(pairs)
        })
    }

    pub fn insert(&self, key: K, value: V) -> Option<Option<V>> {
        let snapshot_key = key.clone();
        self.invoke("insert", snapshot_args![snapshot_key], move |map| {
            map.insert(key, value)
        })
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let key = key.clone();
        self.invoke("remove", SnapshotArgs::none(), move |map| map.remove(&key))
            .flatten()
    }

    pub fn remove_all(&self, keys: Vec<K>) -> Option<()> {
        self.invoke("remove_all", SnapshotArgs::none(), move |map| {
            map.remove_all(&keys)
        })
    }

    pub fn clear(&self) -> Option<()> {
        self.invoke("clear", SnapshotArgs::none(), MustableMap::clear)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::lifecycle::MustableRegistry;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn wrapped(
        pairs: Vec<(&'static str, i32)>,
    ) -> (MustableRegistry, Rc<Facade<MustableMap<&'static str, i32>>>) {
        let registry = MustableRegistry::new();
        let facade = registry.register(
            &Rc::new(RefCell::new(MustableMap::from_entries(pairs))),
            true,
        );
        (registry, facade)
    }

    #[test]
    fn insert_bumps_and_returns_previous() {
        let (_registry, map) = wrapped(vec![]);
        assert_eq!(map.insert("a", 1), Some(None));
        assert_eq!(map.insert("a", 2), Some(Some(1)));
        assert_eq!(map.version(), 2);
        assert_eq!(map.get(&"a"), Some(2));
    }

    #[test]
    fn equal_reinsert_is_suppressed() {
        let (_registry, map) = wrapped(vec![("a", 1)]);
        map.insert("a", 1);
        assert_eq!(map.version(), 0);

        map.insert("a", 2);
        assert_eq!(map.version(), 1);
    }

    #[test]
    fn remove_absent_key_is_suppressed() {
        let (_registry, map) = wrapped(vec![("a", 1)]);
        assert_eq!(map.remove(&"missing"), None);
        assert_eq!(map.version(), 0);

        assert_eq!(map.remove(&"a"), Some(1));
        assert_eq!(map.version(), 1);
    }

    #[test]
    fn remove_all_of_absent_keys_is_suppressed() {
        let (_registry, map) = wrapped(vec![("a", 1), ("b", 2)]);
        map.remove_all(vec!["x", "y"]);
        assert_eq!(map.version(), 0);

        map.remove_all(vec!["a", "x"]);
        assert_eq!(map.version(), 1);
        assert_eq!(map.keys(), vec!["b"]);
    }

    #[test]
    fn clear_on_empty_is_suppressed() {
        let (_registry, map) = wrapped(vec![]);
        map.clear();
        assert_eq!(map.version(), 0);

        map.insert("a", 1);
        map.clear();
        assert_eq!(map.version(), 2);
        assert!(map.is_empty());
    }

    #[test]
    fn iteration_order_is_insertion_order() {
        let (_registry, map) = wrapped(vec![]);
        map.insert("b", 2);
        map.insert("a", 1);
        map.insert("c", 3);
        // Re-inserting an existing key keeps its original position
        map.insert("b", 9);

        assert_eq!(map.keys(), vec!["b", "a", "c"]);
        assert_eq!(map.values(), vec![9, 1, 3]);
    }

    #[test]
    fn removal_preserves_remaining_order() {
        let (_registry, map) = wrapped(vec![("a", 1), ("b", 2), ("c", 3)]);
        map.remove(&"b");
        assert_eq!(map.keys(), vec!["a", "c"]);
    }

    #[test]
    fn from_entries_dedups_by_last_value() {
        let map = MustableMap::from_entries(vec![("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"a"), Some(&3));
        assert_eq!(map.keys(), vec!["a", "b"]);
    }

    #[test]
    fn to_map_round_trip() {
        let (_registry, map) = wrapped(vec![("a", 1), ("b", 2)]);
        let copied = MustableMap::from_entries(map.to_map());
        assert_eq!(copied.entries(), vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn reads_never_bump() {
        let (_registry, map) = wrapped(vec![("a", 1)]);
        assert!(map.contains_key(&"a"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries(), vec![("a", 1)]);
        assert_eq!(map.version(), 0);
    }
}
