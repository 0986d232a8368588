// ============================================================================
// mustable - Core
// Snapshot model, member metadata, and the class registry
// ============================================================================

pub mod registry;
pub mod snapshot;
pub mod types;
