//! Runtime usage errors.

use crate::core::context::Phase;
use thiserror::Error;

/// Non-fatal errors from runtime operations on a machine.
///
/// Usage errors are rejected with zero observable effect and logged
/// through the diagnostic sink; the engine stays operable. Contrast
/// with [`DefinitionError`](crate::builder::DefinitionError), which is
/// fatal to the defining call chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("event `{0}` is not consumed by any transition")]
    UnknownEvent(String),

    #[error("`{0}` does not name a defined state")]
    UnknownState(String),

    #[error("event changes are not allowed while a `{0}` callback is executing")]
    EventChangeForbidden(Phase),

    #[error("machine has no states defined")]
    NoStates,
}
