//! Error kinds per the error-handling design: argument errors and I/O
//! failures propagate to the caller; candidate rejection is a value
//! (`validity::Outcome`), never an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpnError {
    /// Inputs violate validation (empty range, zero places/transitions,
    /// probability outside `[0, 1]`, etc). No recovery; surfaced as-is.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A solver produced an unexpected numerical failure on a matrix C5
    /// assembled correctly. Within `generate_dataset` this is downgraded to
    /// candidate rejection; surfaced directly only through `filter_spn`'s
    /// lower-level callers that want to see the failure itself.
    #[error("solver breakdown: {0}")]
    SolverBreakdown(String),

    /// Propagated from a caller-supplied persistence sink; this crate does
    /// not perform I/O itself but forwards failures a caller hands back in.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
