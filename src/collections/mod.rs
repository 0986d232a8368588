// ============================================================================
// mustable - Collections
// Container wrappers whose mutators route through the mutation protocol
// ============================================================================

pub mod array;
pub mod map;
pub mod set;

pub use array::MustableArray;
pub use map::MustableMap;
pub use set::MustableSet;
