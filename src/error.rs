// ============================================================================
// mustable - Errors
// ============================================================================

use thiserror::Error;

/// Fatal conditions raised synchronously to the caller. There is no internal
/// retry, logging fallback, or degraded mode behind any of these.
///
/// Wrapping a value that is not a wrapped class cannot be represented:
/// facade construction is bounded by the [`Mustable`](crate::Mustable)
/// trait, so the type system rejects it at compile time.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MustableError {
    /// A non-nullable memoized factory produced no instance.
    #[error("mustable factory produced no instance")]
    FactoryProducedNone,
}
