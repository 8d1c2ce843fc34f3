//! Definition builders for states and transitions.
//!
//! Machines are defined incrementally: create the machine, then chain
//! [`add_state`](crate::StateMachine::add_state) and
//! [`add_transition`](crate::StateMachine::add_transition) calls, each
//! validating its definition as it is added. Definition errors are fatal
//! to the defining call chain and surface at startup.

pub mod error;
pub mod state;
pub mod transition;

pub use error::DefinitionError;
pub use state::StateDef;
pub use transition::TransitionDef;
