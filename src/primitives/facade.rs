// ============================================================================
// mustable - Reactive Facade
// The wrapper presented to callers in place of the raw wrapped instance
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::core::registry::table_for;
use crate::core::snapshot::SnapshotArgs;
use crate::core::types::{MemberDescriptor, MemberShape, MemberTable, Mustable};
use crate::primitives::scheduler::Scheduler;

// =============================================================================
// FACADE
// =============================================================================

/// One facade per (wrapped instance, registration).
///
/// The facade never owns the instance's lifetime - it shares it through an
/// `Rc`, and the caller remains free to keep or drop their own handle. All
/// interaction with the instance is expected to flow through [`read`],
/// [`assign`] and [`invoke`], which route member access per the class's
/// member table: pass-through members touch the instance directly, mustable
/// members run the snapshot/compare/bump protocol.
///
/// `version` and `instance` are the two reserved accessors; they live on the
/// facade itself rather than in the member namespace, so wrapped classes
/// cannot collide with them.
///
/// [`read`]: Facade::read
/// [`assign`]: Facade::assign
/// [`invoke`]: Facade::invoke
pub struct Facade<T: Mustable> {
    instance: Rc<RefCell<T>>,
    /// Last version this facade produced. Shared with in-flight updaters so
    /// deferred application still lands here.
    version: Rc<Cell<u64>>,
    scheduler: Scheduler,
    table: Rc<MemberTable>,
}

impl<T: Mustable> Facade<T> {
    /// Build a facade over a wrapped instance, wired to the host's scheduler.
    pub fn new(instance: Rc<RefCell<T>>, scheduler: Scheduler) -> Self {
        Self {
            table: table_for::<T>(),
            instance,
            version: Rc::new(Cell::new(0)),
            scheduler,
        }
    }

    /// Count of effective (non-suppressed) mutations observed so far, as of
    /// the last update the host applied. Monotonically non-decreasing.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// The wrapped instance itself (reserved accessor).
    pub fn instance(&self) -> Rc<RefCell<T>> {
        Rc::clone(&self.instance)
    }

    /// This class's member table.
    pub fn member_table(&self) -> &MemberTable {
        &self.table
    }

    /// Address of the wrapped instance, used as its identity key.
    pub(crate) fn instance_addr(&self) -> *const () {
        Rc::as_ptr(&self.instance).cast()
    }

    // =========================================================================
    // ACCESS TRAPS
    // =========================================================================

    /// Pass-through read of the live instance. Never tracked, never bumps.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.instance.borrow())
    }

    /// Member write. A decorated member routes through the mutation protocol
    /// (callers should pass the new value as the single snapshot argument);
    /// an undecorated one is a direct pass-through assignment.
    ///
    /// Returns the closure's result when it ran synchronously; `None` when
    /// the host deferred the update.
    pub fn assign<R: 'static>(
        &self,
        member: &'static str,
        args: SnapshotArgs,
        write: impl FnOnce(&mut T) -> R + 'static,
    ) -> Option<R> {
        match self.table.descriptor(member) {
            Some(descriptor) => self.mutate_value(descriptor, args, write),
            None => Some(write(&mut self.instance.borrow_mut())),
        }
    }

    /// Member call. Methods always route through the mutation protocol, as do
    /// function-valued fields declared `is_mustable_fn`; any other invocable
    /// member is forwarded untracked and its result returned directly.
    pub fn invoke<R: 'static>(
        &self,
        member: &'static str,
        args: SnapshotArgs,
        call: impl FnOnce(&mut T) -> R + 'static,
    ) -> Option<R> {
        match self.table.descriptor(member) {
            Some(descriptor)
                if descriptor.shape == MemberShape::Method || descriptor.is_mustable_fn =>
            {
                self.mutate_value(descriptor, args, call)
            }
            _ => Some(call(&mut self.instance.borrow_mut())),
        }
    }

    // =========================================================================
    // MUTATION PROTOCOL
    // =========================================================================

    /// snapshot-before -> perform -> snapshot-after -> compare -> bump.
    ///
    /// Exactly one scheduler update is requested per invocation, no-ops
    /// included - deciding whether an unchanged version warrants a re-render
    /// is the host's job. The updater tolerates being invoked more than once
    /// for the same logical event: once it has produced a new version it is
    /// stamped with it and later invocations return the stamp, and the
    /// mutation itself runs at most once.
    ///
    /// A panicking snapshot or comparer propagates to the caller with the
    /// mutation already applied and no version recorded; there is no
    /// rollback.
    fn mutate_value<R: 'static>(
        &self,
        descriptor: &MemberDescriptor,
        args: SnapshotArgs,
        perform: impl FnOnce(&mut T) -> R + 'static,
    ) -> Option<R> {
        let instance = Rc::clone(&self.instance);
        let version = Rc::clone(&self.version);
        let member = descriptor.name;
        let snapshot = descriptor.snapshot;
        let comparer = descriptor.comparer;

        let applied: Cell<Option<u64>> = Cell::new(None);
        let mut perform = Some(perform);
        let out: Rc<RefCell<Option<R>>> = Rc::new(RefCell::new(None));
        let out_slot = Rc::clone(&out);

        self.scheduler.request_update(Box::new(move |prev| {
            if let Some(stamped) = applied.get() {
                return stamped;
            }

            let before = snapshot.map(|snap| snap(&*instance.borrow() as &dyn Any, &args));

            if let Some(run) = perform.take() {
                *out_slot.borrow_mut() = Some(run(&mut instance.borrow_mut()));
            }

            let after = snapshot.map(|snap| snap(&*instance.borrow() as &dyn Any, &args));

            if let (Some(before), Some(after), Some(same)) = (&before, &after, comparer) {
                if same(before, after) {
                    trace!(member, prev, "no-op mutation suppressed");
                    return prev;
                }
            }

            let next = prev + 1;
            applied.set(Some(next));
            version.set(next);
            trace!(member, next, "mutation observed");
            next
        }));

        let result = out.borrow_mut().take();
        result
    }
}

impl<T: Mustable> std::fmt::Debug for Facade<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facade")
            .field("class", &self.table.class())
            .field("version", &self.version.get())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::Snapshot;
    use crate::core::types::{MemberBinding, MemberTableBuilder, MustableOptions};
    use crate::reactivity::comparers::shallow_same;
    use crate::snapshot_args;

    struct Tally {
        total: i64,
        label: String,
    }

    impl Tally {
        fn new() -> Self {
            Self {
                total: 0,
                label: String::new(),
            }
        }
    }

    impl Mustable for Tally {
        fn define_members(builder: MemberTableBuilder) -> MemberTable {
            builder
                .mustable_with(
                    "total",
                    MemberBinding::Value,
                    MustableOptions::new()
                        .snapshot(|instance, _args| {
                            instance
                                .downcast_ref::<Tally>()
                                .map(|tally| Snapshot::Int(tally.total))
                                .unwrap_or(Snapshot::Absent)
                        })
                        .comparer(shallow_same),
                )
                .mustable("bump", MemberBinding::Invocable)
                .immustable("label")
                .build()
        }
    }

    fn facade() -> Facade<Tally> {
        let state = Rc::new(Cell::new(0));
        Facade::new(
            Rc::new(RefCell::new(Tally::new())),
            Scheduler::with_state(state, |_| {}),
        )
    }

    #[test]
    fn starts_at_version_zero() {
        assert_eq!(facade().version(), 0);
    }

    #[test]
    fn effective_assignment_bumps_once() {
        let f = facade();
        f.assign("total", snapshot_args![5i64], |t| t.total = 5);
        assert_eq!(f.version(), 1);
        assert_eq!(f.read(|t| t.total), 5);
    }

    #[test]
    fn noop_assignment_is_suppressed() {
        let f = facade();
        f.assign("total", snapshot_args![0i64], |t| t.total = 0);
        assert_eq!(f.version(), 0);
        // State was still written through
        assert_eq!(f.read(|t| t.total), 0);
    }

    #[test]
    fn undecorated_assignment_is_pass_through() {
        let f = facade();
        let result = f.assign("label", SnapshotArgs::none(), |t| {
            t.label = "named".to_string();
            t.label.len()
        });
        assert_eq!(result, Some(5));
        assert_eq!(f.version(), 0);
    }

    #[test]
    fn snapshotless_method_always_bumps() {
        let f = facade();
        f.invoke("bump", SnapshotArgs::none(), |t| t.total += 1);
        f.invoke("bump", SnapshotArgs::none(), |t| t.total += 0);
        assert_eq!(f.version(), 2);
    }

    #[test]
    fn unknown_member_invoke_is_pass_through() {
        let f = facade();
        let result = f.invoke("inspect", SnapshotArgs::none(), |t| t.total);
        assert_eq!(result, Some(0));
        assert_eq!(f.version(), 0);
    }

    #[test]
    fn version_is_monotonic() {
        let f = facade();
        let mut last = f.version();
        for step in 0..6 {
            if step % 2 == 0 {
                f.assign("total", snapshot_args![step as i64], move |t| {
                    t.total = step as i64;
                });
            } else {
                // Re-assign the same value: suppressed
                let same = f.read(|t| t.total);
                f.assign("total", snapshot_args![same], move |t| t.total = same);
            }
            assert!(f.version() >= last);
            last = f.version();
        }
    }

    #[test]
    fn double_invoking_updater_applies_once() {
        // Host that invokes every updater twice for the same logical event
        let state = Rc::new(Cell::new(0));
        let scheduler = Scheduler::new({
            let state = Rc::clone(&state);
            move |mut updater| {
                let prev = state.get();
                let _ = updater(prev);
                let next = updater(prev);
                if next != prev {
                    state.set(next);
                }
            }
        });

        let f = Facade::new(Rc::new(RefCell::new(Tally::new())), scheduler);
        f.invoke("bump", SnapshotArgs::none(), |t| t.total += 1);

        assert_eq!(f.version(), 1);
        // The mutation itself ran exactly once
        assert_eq!(f.read(|t| t.total), 1);
    }

    #[test]
    fn deferred_host_applies_later() {
        let queue: Rc<RefCell<Vec<crate::primitives::scheduler::VersionUpdater>>> =
            Rc::new(RefCell::new(Vec::new()));
        let scheduler = Scheduler::new({
            let queue = Rc::clone(&queue);
            move |updater| queue.borrow_mut().push(updater)
        });

        let f = Facade::new(Rc::new(RefCell::new(Tally::new())), scheduler);
        let result = f.invoke("bump", SnapshotArgs::none(), |t| t.total += 1);

        // Nothing happened yet, and no result surfaced
        assert_eq!(result, None);
        assert_eq!(f.version(), 0);
        assert_eq!(f.read(|t| t.total), 0);

        // Host applies the queued updater during its next pass
        let mut updater = queue.borrow_mut().pop().unwrap();
        assert_eq!(updater(0), 1);
        assert_eq!(f.version(), 1);
        assert_eq!(f.read(|t| t.total), 1);
    }
}
