// ============================================================================
// mustable - Macros
// Ergonomic constructors for snapshot arguments and dependency lists
// ============================================================================

/// Build a [`SnapshotArgs`](crate::SnapshotArgs) from the values a member was
/// invoked with.
///
/// Each argument is boxed as `Rc<dyn Any>`; snapshot functions recover them
/// with [`SnapshotArgs::get`](crate::SnapshotArgs::get) by position and type.
///
/// # Example
///
/// ```
/// use mustable::snapshot_args;
///
/// let args = snapshot_args![3usize, "tag".to_string()];
/// assert_eq!(args.get::<usize>(0), Some(&3));
/// assert_eq!(args.get::<String>(1).map(String::as_str), Some("tag"));
/// assert!(snapshot_args![].is_empty());
/// ```
#[macro_export]
macro_rules! snapshot_args {
    () => {
        $crate::SnapshotArgs::none()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::SnapshotArgs::from_values(vec![
            $(::std::rc::Rc::new($arg) as ::std::rc::Rc<dyn ::std::any::Any>),+
        ])
    };
}

/// Build a [`Deps`](crate::Deps) list for memoized creation.
///
/// Every element must convert into a [`Snapshot`](crate::Snapshot); lists are
/// compared element-wise by scalar value equality between invocations.
///
/// # Example
///
/// ```
/// use mustable::deps;
///
/// assert!(!deps![1, "a"].changed(&deps![1, "a"]));
/// assert!(deps![1, "a"].changed(&deps![2, "a"]));
/// ```
#[macro_export]
macro_rules! deps {
    () => {
        $crate::Deps::none()
    };
    ($($dep:expr),+ $(,)?) => {
        $crate::Deps::from_list(vec![$($crate::Snapshot::from($dep)),+])
    };
}
