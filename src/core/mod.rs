//! Core engine types: the machine itself, callback context and errors.

pub mod context;
pub mod error;
pub mod machine;
pub(crate) mod name;
pub(crate) mod state;
pub(crate) mod transition;

pub use context::{Context, Phase};
pub use error::UsageError;
pub use machine::{MachineOptions, StateMachine};
pub use name::canonical;
pub use state::{EnterCallback, LeaveCallback, RunCallback};
pub use transition::{ActivateCallback, CondCallback};
