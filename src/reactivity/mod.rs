// ============================================================================
// mustable - Reactivity
// Snapshot-diffing policies
// ============================================================================

pub mod comparers;
