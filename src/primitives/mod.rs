// ============================================================================
// mustable - Primitives
// Facade, scheduler wiring, and per-unit lifecycle
// ============================================================================

pub mod facade;
pub mod lifecycle;
pub mod scheduler;
