//! Definition-time errors.

use thiserror::Error;

/// Errors raised while defining states and transitions.
///
/// These are programmer errors caught at startup: the defining call
/// chain should fail fast (propagate with `?`) rather than try to
/// recover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("state name must not be empty")]
    EmptyStateName,

    #[error("`{0}` is reserved for wildcard transitions and cannot name a state")]
    ReservedStateName(String),

    #[error("state `{0}` is already defined")]
    DuplicateState(String),

    #[error("transition source `{0}` does not name a defined state")]
    UnknownSource(String),

    #[error("transition destination `{0}` does not name a defined state")]
    UnknownDestination(String),
}
