// ============================================================================
// mustable - Scheduler
// The callback contract with the host framework's state primitive
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

/// A pure function from the previous version to the next one.
///
/// Boxed and `'static` because a host is allowed to defer the updater (apply
/// it during a later render pass) and to invoke it more than once for the
/// same logical event; the mutation protocol's applied-token guard makes
/// repeated invocation harmless.
pub type VersionUpdater = Box<dyn FnMut(u64) -> u64>;

/// Handle to the host's version-update entry point.
///
/// The core never triggers a re-render directly: every observed mutation is
/// expressed as a [`VersionUpdater`] handed to the scheduler, and the host
/// decides when to apply it and whether the returned value warrants a
/// re-render (it should skip when the value is unchanged).
#[derive(Clone)]
pub struct Scheduler {
    apply: Rc<dyn Fn(VersionUpdater)>,
}

impl Scheduler {
    /// Wrap an arbitrary host entry point.
    pub fn new(apply: impl Fn(VersionUpdater) + 'static) -> Self {
        Self {
            apply: Rc::new(apply),
        }
    }

    /// A synchronous scheduler over a shared state cell, mirroring the host
    /// contract: run the updater against the current value and, only when the
    /// result differs, store it and fire the notifier.
    pub fn with_state(state: Rc<Cell<u64>>, notify: impl Fn(u64) + 'static) -> Self {
        Self::new(move |mut updater| {
            let prev = state.get();
            let next = updater(prev);
            if next != prev {
                state.set(next);
                notify(next);
            }
        })
    }

    /// Hand an updater to the host.
    pub fn request_update(&self, updater: VersionUpdater) {
        (self.apply)(updater);
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Scheduler")
    }
}

// =============================================================================
// TESTS
// =============================================================================
