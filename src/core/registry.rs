// ============================================================================
// mustable - Class Metadata Registry
// Thread-local side table mapping class identity to its member descriptors
// ============================================================================

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::core::types::{MemberTable, Mustable};

thread_local! {
    /// Member tables, keyed by class identity. Append-only: a class's table
    /// is built exactly once (on first touch) and never replaced. Distinct
    /// generic instantiations are distinct classes.
    static CLASS_TABLES: RefCell<HashMap<TypeId, Rc<MemberTable>>> = RefCell::new(HashMap::new());
}

/// Fetch (building on first use) the member table of a wrapped class.
///
/// Registration is the single-writer phase; after that the table is shared
/// read-only by every facade over instances of the class.
pub fn table_for<T: Mustable>() -> Rc<MemberTable> {
    let id = TypeId::of::<T>();

    if let Some(table) = CLASS_TABLES.with(|tables| tables.borrow().get(&id).cloned()) {
        return table;
    }

    // Build outside the borrow so a class definition may itself touch the
    // registry (e.g. a wrapper nesting another wrapped class).
    let table = Rc::new(T::define_members(MemberTable::builder(
        std::any::type_name::<T>(),
    )));
    tracing::debug!(class = table.class(), members = table.mustable_count(), "class registered");

    CLASS_TABLES.with(|tables| {
        Rc::clone(tables.borrow_mut().entry(id).or_insert(table))
    })
}

/// Number of classes registered on this thread. Mainly useful in tests.
pub fn class_count() -> usize {
    CLASS_TABLES.with(|tables| tables.borrow().len())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MemberBinding, MemberTableBuilder};
    use std::cell::Cell;

    thread_local! {
        static BUILD_COUNT: Cell<u32> = const { Cell::new(0) };
    }

    struct Counted;

    impl Mustable for Counted {
        fn define_members(builder: MemberTableBuilder) -> MemberTable {
            BUILD_COUNT.with(|count| count.set(count.get() + 1));
            builder.mustable("touch", MemberBinding::Invocable).build()
        }
    }

    struct Empty;

    impl Mustable for Empty {
        fn define_members(builder: MemberTableBuilder) -> MemberTable {
            builder.build()
        }
    }

    #[test]
    fn table_is_built_once_per_class() {
        let first = table_for::<Counted>();
        let second = table_for::<Counted>();

        assert!(Rc::ptr_eq(&first, &second));
        BUILD_COUNT.with(|count| assert_eq!(count.get(), 1));
    }

    #[test]
    fn undecorated_class_yields_empty_table() {
        let table = table_for::<Empty>();
        assert_eq!(table.mustable_count(), 0);
        assert!(table.descriptor("anything").is_none());
    }

    #[test]
    fn class_name_comes_from_type() {
        let table = table_for::<Counted>();
        assert!(table.class().ends_with("Counted"));
    }
}
