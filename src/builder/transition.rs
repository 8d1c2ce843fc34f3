//! Builder for transition definitions.

use crate::core::context::Context;
use crate::core::transition::{ActivateCallback, CondCallback};
use std::rc::Rc;
use std::time::Duration;

/// Source of a transition: one named state, or every state defined so
/// far (wildcard).
pub(crate) enum Source {
    State(String),
    All,
}

/// Definition of one transition, passed to
/// [`StateMachine::add_transition`](crate::StateMachine::add_transition).
///
/// All guards are optional and conjoined: the transition fires on the
/// first tick in which every present guard holds. With no guards at all
/// it fires on the next tick spent in the source state.
///
/// # Example
///
/// ```rust
/// use fsmkit::TransitionDef;
/// use std::time::Duration;
///
/// let start = TransitionDef::new("idle", "filling")
///     .on_event("start")
///     .after(Duration::from_millis(500))
///     .status(["zero"]);
/// let abort = TransitionDef::from_all("idle").on_event("abort");
/// ```
pub struct TransitionDef {
    pub(crate) source: Source,
    pub(crate) dest: String,
    pub(crate) name: Option<String>,
    pub(crate) cond: Option<CondCallback>,
    pub(crate) min_dwell: Option<Duration>,
    pub(crate) event: Option<String>,
    pub(crate) status: Vec<String>,
    pub(crate) io: Vec<String>,
    pub(crate) setpoint: Vec<String>,
    pub(crate) activate: Option<ActivateCallback>,
}

impl TransitionDef {
    /// Transition from one named state to another. Both states must
    /// already be defined when the transition is added.
    pub fn new(from: impl Into<String>, dest: impl Into<String>) -> Self {
        Self::with_source(Source::State(from.into()), dest.into())
    }

    /// Wildcard transition: expands, at the time it is added, into one
    /// concrete transition from every state defined *so far* (except the
    /// destination itself).
    ///
    /// Definition-order hazard: states defined after the wildcard is
    /// added do NOT receive the transition. Add wildcard transitions
    /// after all states they should cover.
    pub fn from_all(dest: impl Into<String>) -> Self {
        Self::with_source(Source::All, dest.into())
    }

    fn with_source(source: Source, dest: String) -> Self {
        Self {
            source,
            dest,
            name: None,
            cond: None,
            min_dwell: None,
            event: None,
            status: Vec::new(),
            io: Vec::new(),
            setpoint: Vec::new(),
            activate: None,
        }
    }

    /// Diagnostic name, defaulting to `"<from>-<dest>"`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Boolean guard predicate, re-evaluated every tick. Must be
    /// side-effect-free.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.cond = Some(Rc::new(predicate));
        self
    }

    /// Minimum time the source state must have been current before the
    /// transition becomes eligible.
    pub fn after(mut self, dwell: Duration) -> Self {
        self.min_dwell = Some(dwell);
        self
    }

    /// Event that must be raised for the transition to fire. Adding the
    /// transition registers the event machine-wide for `raise`/`clear`.
    pub fn on_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Status flags that must all be asserted. Appends to any flags
    /// already required.
    pub fn status<I>(mut self, flags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.status.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Digital I/O flags that must all be asserted. Appends.
    pub fn io<I>(mut self, flags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.io.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Setpoint flags that must all be asserted. Appends.
    pub fn setpoint<I>(mut self, flags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.setpoint.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Side effect run when the transition fires: after the destination
    /// becomes current, before its enter callback. Receives the previous
    /// state's name.
    pub fn on_activate<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Context<'_>, Option<&str>) + 'static,
    {
        self.activate = Some(Rc::new(callback));
        self
    }
}
