// ============================================================================
// mustable - Snapshot Values
// Lightweight, comparer-friendly captures of wrapped-instance state
// ============================================================================

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::SystemTime;

// =============================================================================
// OPAQUE VALUES
// =============================================================================

/// Erased value that still knows how to compare itself to another one.
///
/// This is how arbitrary user element types (array items, map values) end up
/// inside a [`Snapshot`] without the snapshot model having to know about them:
/// two opaque values are equal iff they hold the same concrete type and that
/// type's `PartialEq` says so.
pub trait OpaqueValue: Any {
    fn opaque_eq(&self, other: &dyn OpaqueValue) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T: PartialEq + 'static> OpaqueValue for T {
    fn opaque_eq(&self, other: &dyn OpaqueValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// A cheap capture of observable state, taken immediately before and after a
/// mutating call so a comparer can decide whether anything actually changed.
///
/// Snapshots are meant to be lightweight - a length, a single element, a
/// shallow copy of a small sequence. Never a deep clone of the whole instance.
///
/// `Absent` stands in for "no value" (a missing key, an out-of-range index);
/// it compares like any other scalar, with no special-casing.
#[derive(Clone)]
pub enum Snapshot {
    Absent,
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Date-like value, compared by underlying instant.
    Instant(SystemTime),
    /// Regex-like value, compared by its canonical source text.
    Pattern(String),
    Seq(Vec<Snapshot>),
    Map(BTreeMap<String, Snapshot>),
    /// Arbitrary `PartialEq` value captured from the wrapped instance.
    Opaque(Rc<dyn OpaqueValue>),
}

impl Snapshot {
    /// Capture an arbitrary `PartialEq` value.
    pub fn opaque<T: PartialEq + 'static>(value: T) -> Self {
        Snapshot::Opaque(Rc::new(value))
    }

    /// Build a sequence snapshot from anything convertible element-wise.
    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Snapshot>,
    {
        Snapshot::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Build a mapping snapshot from key/value pairs.
    pub fn map_of<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Snapshot>,
        I: IntoIterator<Item = (K, V)>,
    {
        Snapshot::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Snapshot::Absent)
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Absent => write!(f, "Absent"),
            Snapshot::Unit => write!(f, "Unit"),
            Snapshot::Bool(v) => write!(f, "Bool({v})"),
            Snapshot::Int(v) => write!(f, "Int({v})"),
            Snapshot::Float(v) => write!(f, "Float({v})"),
            Snapshot::Text(v) => write!(f, "Text({v:?})"),
            Snapshot::Instant(v) => write!(f, "Instant({v:?})"),
            Snapshot::Pattern(v) => write!(f, "Pattern({v:?})"),
            Snapshot::Seq(v) => f.debug_tuple("Seq").field(v).finish(),
            Snapshot::Map(v) => f.debug_tuple("Map").field(v).finish(),
            Snapshot::Opaque(_) => write!(f, "Opaque(..)"),
        }
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<()> for Snapshot {
    fn from(_: ()) -> Self {
        Snapshot::Unit
    }
}

impl From<bool> for Snapshot {
    fn from(v: bool) -> Self {
        Snapshot::Bool(v)
    }
}

impl From<i32> for Snapshot {
    fn from(v: i32) -> Self {
        Snapshot::Int(v as i64)
    }
}

impl From<i64> for Snapshot {
    fn from(v: i64) -> Self {
        Snapshot::Int(v)
    }
}

impl From<u32> for Snapshot {
    fn from(v: u32) -> Self {
        Snapshot::Int(v as i64)
    }
}

impl From<usize> for Snapshot {
    fn from(v: usize) -> Self {
        Snapshot::Int(v as i64)
    }
}

impl From<f32> for Snapshot {
    fn from(v: f32) -> Self {
        Snapshot::Float(v as f64)
    }
}

impl From<f64> for Snapshot {
    fn from(v: f64) -> Self {
        Snapshot::Float(v)
    }
}

impl From<&str> for Snapshot {
    fn from(v: &str) -> Self {
        Snapshot::Text(v.to_string())
    }
}

impl From<String> for Snapshot {
    fn from(v: String) -> Self {
        Snapshot::Text(v)
    }
}

impl From<SystemTime> for Snapshot {
    fn from(v: SystemTime) -> Self {
        Snapshot::Instant(v)
    }
}

impl<T: Into<Snapshot>> From<Option<T>> for Snapshot {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Snapshot::Absent,
        }
    }
}

impl<T: Into<Snapshot>> From<Vec<T>> for Snapshot {
    fn from(v: Vec<T>) -> Self {
        Snapshot::seq(v)
    }
}

// =============================================================================
// SNAPSHOT ARGS
// =============================================================================

/// The arguments a mutating member was called with, handed to snapshot
/// functions so they can capture argument-dependent state (the element at the
/// index being written, the value under the key being replaced, ...).
///
/// Built with the [`snapshot_args!`](crate::snapshot_args) macro.
#[derive(Clone, Default)]
pub struct SnapshotArgs {
    values: Vec<Rc<dyn Any>>,
}

impl SnapshotArgs {
    /// No arguments (members whose snapshot depends only on the instance).
    pub fn none() -> Self {
        Self { values: Vec::new() }
    }

    pub fn from_values(values: Vec<Rc<dyn Any>>) -> Self {
        Self { values }
    }

    /// Typed access to the argument at `index`.
    pub fn get<T: 'static>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for SnapshotArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SnapshotArgs(len={})", self.values.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================
