// ============================================================================
// mustable - Mustable Array
// Ordered container with facade-routed mutators
// ============================================================================

use std::any::Any;
use std::fmt;
use std::ops::Range;

use crate::core::snapshot::{Snapshot, SnapshotArgs};
use crate::core::types::{MemberBinding, MemberTable, MemberTableBuilder, Mustable, MustableOptions};
use crate::primitives::facade::Facade;
use crate::reactivity::comparers::shallow_same;
use crate::snapshot_args;

// =============================================================================
// MUSTABLE ARRAY
// =============================================================================

/// An ordered, index-addressed container designed to be wrapped in a
/// [`Facade`]. Its mutators are declared mustable with snapshot policies
/// tuned per member, so equal-value writes and no-op structural calls never
/// cost a re-render.
///
/// # Example
///
/// ```
/// use mustable::MustableArray;
///
/// let mut numbers = MustableArray::new();
/// numbers.push(1);
/// numbers.push(2);
/// assert_eq!(numbers.to_array(), vec![1, 2]);
/// ```
#[derive(Clone, PartialEq)]
pub struct MustableArray<T> {
    items: Vec<T>,
}

impl<T: Clone + PartialEq + 'static> MustableArray<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Self { items }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Detached copy of the contents as a plain vector.
    pub fn to_array(&self) -> Vec<T> {
        self.items.clone()
    }

    /// A new independent container with the same contents.
    pub fn shallow_clone(&self) -> Self {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Index of the first element equal to `item`.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }

    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        self.items.iter().for_each(&mut f);
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Vec<U> {
        self.items.iter().map(f).collect()
    }

    pub fn filter(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        self.items.iter().filter(|item| pred(item)).cloned().collect()
    }

    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| pred(item))
    }

    pub fn all(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.items.iter().all(pred)
    }

    pub fn any(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.items.iter().any(pred)
    }

    /// Concatenate the elements' display forms with `separator` between.
    pub fn join(&self, separator: &str) -> String
    where
        T: fmt::Display,
    {
        self.items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Copy of the elements in `range`, end clamped to the length.
    pub fn slice(&self, range: Range<usize>) -> Vec<T> {
        let start = range.start.min(self.items.len());
        let end = range.end.min(self.items.len());
        self.items[start..end].to_vec()
    }

    /// A new container holding this one's elements followed by `other`'s.
    pub fn concat(&self, other: &Self) -> Self {
        let mut items = self.items.clone();
        items.extend(other.items.iter().cloned());
        Self { items }
    }

    pub fn flat_map<U>(&self, f: impl FnMut(&T) -> Vec<U>) -> Vec<U> {
        self.items.iter().flat_map(f).collect()
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Replace the entire contents.
    pub fn replace_from(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Write `item` at `index`. Out-of-range writes are ignored; growing the
    /// container is [`push`](Self::push)'s job.
    pub fn set(&mut self, index: usize, item: T) {
        if let Some(slot) = self.items.get_mut(index) {
            *slot = item;
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Insert at `index`, shifting the tail. Out-of-range inserts append.
    pub fn insert(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Remove and return the element at `index`; `None` when out of range.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn extend(&mut self, items: Vec<T>) {
        self.items.extend(items);
    }

    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn retain(&mut self, pred: impl FnMut(&T) -> bool) {
        self.items.retain(pred);
    }

    /// Overwrite every element with a copy of `item`.
    pub fn fill(&mut self, item: T) {
        self.items.fill(item);
    }

    /// Replace the elements in `range` (end clamped) with `replacement`,
    /// returning the removed elements.
    pub fn splice(&mut self, range: Range<usize>, replacement: Vec<T>) -> Vec<T> {
        let start = range.start.min(self.items.len());
        let end = range.end.min(self.items.len()).max(start);
        self.items.splice(start..end, replacement).collect()
    }

    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.items.sort();
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) {
        self.items.sort_by(compare);
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    fn len_snapshot(instance: &dyn Any, _args: &SnapshotArgs) -> Snapshot {
        let Some(array) = instance.downcast_ref::<Self>() else {
            return Snapshot::Absent;
        };
        Snapshot::from(array.len())
    }

    /// The element at the index being written (first snapshot argument).
    fn element_snapshot(instance: &dyn Any, args: &SnapshotArgs) -> Snapshot {
        let Some(array) = instance.downcast_ref::<Self>() else {
            return Snapshot::Absent;
        };
        args.get::<usize>(0)
            .and_then(|index| array.get(*index))
            .map(|item| Snapshot::opaque(item.clone()))
            .unwrap_or(Snapshot::Absent)
    }
}

impl<T: Clone + PartialEq + 'static> MustableArray<MustableArray<T>> {
    /// One level of flattening: the elements of each nested container, in
    /// order, as a single container.
    pub fn flatten(&self) -> MustableArray<T> {
        MustableArray {
            items: self
                .items
                .iter()
                .flat_map(|inner| inner.items.iter().cloned())
                .collect(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Default for MustableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> From<Vec<T>> for MustableArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_items(items)
    }
}

impl<T: Clone + PartialEq + 'static> FromIterator<T> for MustableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MustableArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

// =============================================================================
// MEMBER TABLE
// =============================================================================

impl<T: Clone + PartialEq + 'static> Mustable for MustableArray<T> {
    fn define_members(builder: MemberTableBuilder) -> MemberTable {
        builder
            // Structural mutators: a length snapshot catches the no-op cases
            // (pop on empty, extend with nothing, truncate past the end,
            // retain that drops nothing)
            .mustable_with(
                "push",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::len_snapshot)
                    .comparer(shallow_same),
            )
            .mustable_with(
                "pop",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::len_snapshot)
                    .comparer(shallow_same),
            )
            .mustable_with(
                "remove",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::len_snapshot)
                    .comparer(shallow_same),
            )
            .mustable_with(
                "extend",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::len_snapshot)
                    .comparer(shallow_same),
            )
            .mustable_with(
                "truncate",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::len_snapshot)
                    .comparer(shallow_same),
            )
            .mustable_with(
                "clear",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::len_snapshot)
                    .comparer(shallow_same),
            )
            .mustable_with(
                "retain",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::len_snapshot)
                    .comparer(shallow_same),
            )
            // Indexed write: snapshot the element under the index so writing
            // the same value back is suppressed
            .mustable_with(
                "set",
                MemberBinding::Invocable,
                MustableOptions::new()
                    .snapshot(Self::element_snapshot)
                    .comparer(shallow_same),
            )
            // Content mutators with no cheap snapshot: always bump
            .mustable("replace_from", MemberBinding::Invocable)
            .mustable("insert", MemberBinding::Invocable)
            .mustable("fill", MemberBinding::Invocable)
            .mustable("splice", MemberBinding::Invocable)
            .mustable("reverse", MemberBinding::Invocable)
            .mustable("sort", MemberBinding::Invocable)
            .mustable("sort_by", MemberBinding::Invocable)
            // Pure members, audited pass-through
            .immustable("to_array")
            .immustable("shallow_clone")
            .immustable("len")
            .immustable("is_empty")
            .immustable("get")
            .immustable("first")
            .immustable("last")
            .immustable("contains")
            .immustable("position")
            .immustable("for_each")
            .immustable("map")
            .immustable("filter")
            .immustable("find")
            .immustable("all")
            .immustable("any")
            .immustable("join")
            .immustable("slice")
            .immustable("concat")
            .immustable("flat_map")
            .immustable("flatten")
            .build()
    }
}

// =============================================================================
// FACADE SURFACE
// =============================================================================

/// The array surface re-exposed on its facade. Mutators route through the
/// mutation protocol and return `None` when the host deferred the update;
/// reads touch the live instance directly.
impl<T: Clone + PartialEq + 'static> Facade<MustableArray<T>> {
    pub fn to_array(&self) -> Vec<T> {
        self.read(MustableArray::to_array)
    }

    pub fn len(&self) -> usize {
        self.read(MustableArray::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(MustableArray::is_empty)
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.read(|array| array.get(index).cloned())
    }

    pub fn first(&self) -> Option<T> {
        self.read(|array| array.first().cloned())
    }

    pub fn last(&self) -> Option<T> {
        self.read(|array| array.last().cloned())
    }

    pub fn contains(&self, item: &T) -> bool {
        self.read(|array| array.contains(item))
    }

    pub fn position(&self, item: &T) -> Option<usize> {
        self.read(|array| array.position(item))
    }

    pub fn slice(&self, range: Range<usize>) -> Vec<T> {
        self.read(|array| array.slice(range))
    }

    pub fn join(&self, separator: &str) -> String
    where
        T: fmt::Display,
    {
        self.read(|array| array.join(separator))
    }

    pub fn replace_from(&self, items: Vec<T>) -> Option<()> {
        self.invoke("replace_from", SnapshotArgs::none(), move |array| {
            array.replace_from(items)
        })
    }

    pub fn set(&self, index: usize, item: T) -> Option<()> {
        self.invoke("set", snapshot_args![index], move |array| {
            array.set(index, item)
        })
    }

    pub fn push(&self, item: T) -> Option<()> {
        self.invoke("push", SnapshotArgs::none(), move |array| array.push(item))
    }

    pub fn pop(&self) -> Option<T> {
        self.invoke("pop", SnapshotArgs::none(), MustableArray::pop)
            .flatten()
    }

    pub fn insert(&self, index: usize, item: T) -> Option<()> {
        self.invoke("insert", SnapshotArgs::none(), move |array| {
            array.insert(index, item)
        })
    }

    pub fn remove(&self, index: usize) -> Option<T> {
        self.invoke("remove", SnapshotArgs::none(), move |array| {
            array.remove(index)
        })
        .flatten()
    }

    pub fn extend(&self, items: Vec<T>) -> Option<()> {
        self.invoke("extend", SnapshotArgs::none(), move |array| {
            array.extend(items)
        })
    }

    pub fn truncate(&self, len: usize) -> Option<()> {
        self.invoke("truncate", SnapshotArgs::none(), move |array| {
            array.truncate(len)
        })
    }

    pub fn clear(&self) -> Option<()> {
        self.invoke("clear", SnapshotArgs::none(), MustableArray::clear)
    }

    pub fn retain(&self, pred: impl FnMut(&T) -> bool + 'static) -> Option<()> {
        self.invoke("retain", SnapshotArgs::none(), move |array| {
            array.retain(pred)
        })
    }

    pub fn fill(&self, item: T) -> Option<()> {
        self.invoke("fill", SnapshotArgs::none(), move |array| array.fill(item))
    }

    pub fn splice(&self, range: Range<usize>, replacement: Vec<T>) -> Option<Vec<T>> {
        self.invoke("splice", SnapshotArgs::none(), move |array| {
            array.splice(range, replacement)
        })
    }

    pub fn reverse(&self) -> Option<()> {
        self.invoke("reverse", SnapshotArgs::none(), MustableArray::reverse)
    }

    pub fn sort(&self) -> Option<()>
    where
        T: Ord,
    {
        self.invoke("sort", SnapshotArgs::none(), MustableArray::sort)
    }

    pub fn sort_by(
        &self,
        compare: impl FnMut(&T, &T) -> std::cmp::Ordering + 'static,
    ) -> Option<()> {
        self.invoke("sort_by", SnapshotArgs::none(), move |array| {
            array.sort_by(compare)
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
