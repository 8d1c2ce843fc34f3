//! Fsmkit: a tick-driven finite state machine engine.
//!
//! Fsmkit drives application control flow on instruments and other
//! control-loop systems: the surrounding application calls
//! [`StateMachine::run`] once per loop tick, and the engine invokes the
//! current state's `run` callback, evaluates guard conditions and
//! performs at most one state change per tick. The engine owns no
//! threads and never blocks.
//!
//! # Core Concepts
//!
//! - **States**: named, with optional enter/leave/run callbacks; the
//!   first state defined is the initial state and is entered immediately.
//! - **Transitions**: ordered per state (first match wins), guarded by
//!   any conjunction of a dwell time, a raised event, required hardware
//!   flags and a predicate.
//! - **Environment**: clock, hardware flag queries and the display are
//!   supplied by the application through the [`Environment`] trait.
//! - **Export**: [`StateMachine::snapshot`] describes the whole graph
//!   for visualization; [`DotRenderer`] turns it into Graphviz text.
//!
//! # Example
//!
//! ```rust
//! use fsmkit::{StandaloneEnv, StateDef, StateMachine, TransitionDef};
//! use std::time::Duration;
//!
//! let mut machine = StateMachine::new("batcher", StandaloneEnv::new());
//! machine
//!     .add_state(StateDef::new("idle"))?
//!     .add_state(StateDef::new("filling").short("FILL"))?
//!     .add_state(StateDef::new("dumping"))?
//!     .add_transition(TransitionDef::new("idle", "filling").on_event("start"))?
//!     .add_transition(TransitionDef::new("filling", "dumping").after(Duration::from_secs(2)))?
//!     .add_transition(TransitionDef::from_all("idle").on_event("abort"))?;
//!
//! assert_eq!(machine.current_state(), Some("idle"));
//! machine.raise("start")?;
//! machine.run();
//! assert_eq!(machine.current_state(), Some("filling"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Definition-order hazard
//!
//! A wildcard transition ([`TransitionDef::from_all`]) expands over the
//! states defined *at the moment it is added*; states defined afterwards
//! do not receive it. Define wildcard transitions last.

pub mod builder;
pub mod core;
pub mod env;
pub mod export;

pub use crate::builder::{DefinitionError, StateDef, TransitionDef};
pub use crate::core::{Context, MachineOptions, Phase, StateMachine, UsageError};
pub use crate::env::{Environment, FlagFamily, StandaloneEnv};
pub use crate::export::{DotRenderer, GraphSnapshot, Render};
