// ============================================================================
// mustable - Lifecycle Registry
// Per-rendering-unit store of facades, with memoized creation
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::core::snapshot::Snapshot;
use crate::core::types::Mustable;
use crate::error::MustableError;
use crate::primitives::facade::Facade;
use crate::primitives::scheduler::Scheduler;
use crate::reactivity::comparers::shallow_same;

// =============================================================================
// IDENTITY KEYS
// =============================================================================

/// Anything that resolves to a wrapped instance's identity: the instance
/// handle itself, or a facade over it. Lets [`MustableRegistry::remove`]
/// accept either.
pub trait MustableRef {
    fn instance_key(&self) -> *const ();
}

impl<T: Mustable> MustableRef for Rc<RefCell<T>> {
    fn instance_key(&self) -> *const () {
        Rc::as_ptr(self).cast()
    }
}

impl<T: Mustable> MustableRef for Facade<T> {
    fn instance_key(&self) -> *const () {
        self.instance_addr()
    }
}

impl<T: Mustable> MustableRef for Rc<Facade<T>> {
    fn instance_key(&self) -> *const () {
        self.instance_addr()
    }
}

// =============================================================================
// DEPENDENCY LISTS
// =============================================================================

/// Ordered dependency list for memoized creation, compared element-wise by
/// scalar value equality between invocations - the same contract as the host
/// framework's own memoization dependency arrays.
///
/// Built with the [`deps!`](crate::deps) macro.
#[derive(Clone, Debug, Default)]
pub struct Deps {
    values: Vec<Snapshot>,
}

impl Deps {
    /// An empty list: never changes, so the factory runs exactly once.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_list(values: Vec<Snapshot>) -> Self {
        Self { values }
    }

    /// Whether `next` differs from this list (length or any element).
    pub fn changed(&self, next: &Deps) -> bool {
        self.values.len() != next.values.len()
            || self
                .values
                .iter()
                .zip(next.values.iter())
                .any(|(a, b)| !shallow_same(a, b))
    }
}

// =============================================================================
// MEMO SLOTS
// =============================================================================

/// Holds the previous dependency list and instance for one memoized-creation
/// call site. The rendering unit owns one slot per `use_mustable` site, the
/// way hook state belongs to a component.
pub struct MemoSlot<T: Mustable> {
    deps: RefCell<Option<Deps>>,
    held: RefCell<Option<Rc<RefCell<T>>>>,
}

impl<T: Mustable> MemoSlot<T> {
    pub fn new() -> Self {
        Self {
            deps: RefCell::new(None),
            held: RefCell::new(None),
        }
    }
}

impl<T: Mustable> Default for MemoSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// MUSTABLE REGISTRY
// =============================================================================

/// Per-rendering-unit facade store.
///
/// All facades registered here share one version counter and one scheduler,
/// so any contained facade's effective mutation re-renders the owning unit.
/// Dropping the registry (or calling [`clear`](Self::clear)) releases every
/// entry in bulk; there is no per-entry teardown hook.
pub struct MustableRegistry {
    facades: RefCell<HashMap<*const (), Rc<dyn Any>>>,
    version: Rc<Cell<u64>>,
    scheduler: Scheduler,
}

impl MustableRegistry {
    /// A registry with no re-render notifier (tests, headless use).
    pub fn new() -> Self {
        Self::with_notifier(|_| {})
    }

    /// A registry wired to the host: `notify` fires with the new shared
    /// version whenever any contained facade observes an effective mutation.
    pub fn with_notifier(notify: impl Fn(u64) + 'static) -> Self {
        let version = Rc::new(Cell::new(0));
        let scheduler = Scheduler::with_state(Rc::clone(&version), notify);
        Self {
            facades: RefCell::new(HashMap::new()),
            version,
            scheduler,
        }
    }

    /// The shared version. Not a per-instance count - it only reflects that
    /// *something* registered here changed.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// The scheduler facades built by this registry are wired to.
    pub fn scheduler(&self) -> Scheduler {
        self.scheduler.clone()
    }

    /// Number of facades currently kept.
    pub fn facade_count(&self) -> usize {
        self.facades.borrow().len()
    }

    // =========================================================================
    // REGISTER / REMOVE
    // =========================================================================

    /// Get the facade for an instance, building one on first sight.
    ///
    /// With `keep_ref` (the default mode) the facade is stored, so repeated
    /// registration of the same instance returns the identical facade. With
    /// `keep_ref = false` nothing is stored and every call builds afresh.
    pub fn register<T: Mustable>(
        &self,
        instance: &Rc<RefCell<T>>,
        keep_ref: bool,
    ) -> Rc<Facade<T>> {
        let key = instance.instance_key();

        if let Some(existing) = self.facades.borrow().get(&key) {
            if let Ok(facade) = Rc::clone(existing).downcast::<Facade<T>>() {
                return facade;
            }
        }

        let facade = Rc::new(Facade::new(Rc::clone(instance), self.scheduler.clone()));
        if keep_ref {
            self.facades
                .borrow_mut()
                .insert(key, Rc::clone(&facade) as Rc<dyn Any>);
        }
        debug!(class = facade.member_table().class(), keep_ref, "facade registered");
        facade
    }

    /// Drop the kept facade for an instance (or the instance behind a
    /// facade). No-op when absent.
    pub fn remove(&self, item: &dyn MustableRef) {
        self.facades.borrow_mut().remove(&item.instance_key());
    }

    /// Bulk teardown for the owning rendering unit's destruction.
    pub fn clear(&self) {
        self.facades.borrow_mut().clear();
    }

    // =========================================================================
    // MEMOIZED CREATION
    // =========================================================================

    /// Re-run `factory` only when `deps` changed element-wise since the last
    /// invocation at this slot; a recomputation first removes the previously
    /// held instance's facade. A `None` from the factory is tolerated and
    /// returned unregistered.
    pub fn use_nullable_mustable<T: Mustable>(
        &self,
        slot: &MemoSlot<T>,
        deps: Deps,
        factory: impl FnOnce() -> Option<Rc<RefCell<T>>>,
    ) -> Option<Rc<Facade<T>>> {
        let recompute = match &*slot.deps.borrow() {
            None => true,
            Some(previous) => previous.changed(&deps),
        };

        if recompute {
            if let Some(previous) = slot.held.borrow_mut().take() {
                self.remove(&previous);
            }
            let instance = factory();
            *slot.deps.borrow_mut() = Some(deps);
            *slot.held.borrow_mut() = instance.clone();
            instance.map(|instance| self.register(&instance, true))
        } else {
            let held = slot.held.borrow().clone();
            held.map(|instance| self.register(&instance, true))
        }
    }

    /// Like [`use_nullable_mustable`](Self::use_nullable_mustable), but a
    /// factory that produces nothing is a contract violation.
    pub fn use_mustable<T: Mustable>(
        &self,
        slot: &MemoSlot<T>,
        deps: Deps,
        factory: impl FnOnce() -> Option<Rc<RefCell<T>>>,
    ) -> Result<Rc<Facade<T>>, MustableError> {
        self.use_nullable_mustable(slot, deps, factory)
            .ok_or(MustableError::FactoryProducedNone)
    }
}

impl Default for MustableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MustableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MustableRegistry")
            .field("facades", &self.facades.borrow().len())
            .field("version", &self.version.get())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
