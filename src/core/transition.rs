//! Runtime transition representation and guard summaries.

use crate::core::context::Context;
use crate::core::name::{EventId, EventRegistry, StateId};
use std::rc::Rc;
use std::time::Duration;

/// Boolean guard predicate, evaluated every tick the source state is
/// current. Must be side-effect-free.
pub type CondCallback = Rc<dyn Fn() -> bool>;

/// Side effect run when a transition fires: after the destination has
/// become current, before its enter callback. The argument is the name
/// of the previous state.
///
/// Shared (`Rc`) rather than boxed because a wildcard transition expands
/// into one concrete transition per source state, all sharing the hook.
pub type ActivateCallback = Rc<dyn Fn(&mut Context<'_>, Option<&str>)>;

/// A concrete transition out of one state.
///
/// All present guards are conjoined; a transition with no guards at all
/// fires unconditionally on the next tick.
pub(crate) struct Transition {
    /// Diagnostic name, defaulting to `"<from>-<to>"`.
    pub(crate) name: String,
    pub(crate) dest: StateId,
    pub(crate) cond: Option<CondCallback>,
    /// Minimum time the source state must have been current.
    pub(crate) min_dwell: Option<Duration>,
    /// Event that must be in the raised set.
    pub(crate) event: Option<EventId>,
    /// Status flags that must all be asserted.
    pub(crate) status: Vec<String>,
    /// Digital I/O flags that must all be asserted.
    pub(crate) io: Vec<String>,
    /// Setpoint flags that must all be asserted.
    pub(crate) setpoint: Vec<String>,
    pub(crate) activate: Option<ActivateCallback>,
}

impl Transition {
    /// Human-readable summary of the guards on this transition, in
    /// evaluation order. Used by the graph export.
    pub(crate) fn guard_summary(&self, events: &EventRegistry) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(dwell) = self.min_dwell {
            out.push(format!("time >= {}s", dwell.as_secs_f64()));
        }
        if let Some(event) = self.event {
            out.push(format!("event = {}", events.name(event)));
        }
        if !self.status.is_empty() {
            out.push(format!("status[{}]", self.status.join(", ")));
        }
        if !self.io.is_empty() {
            out.push(format!("io[{}]", self.io.join(", ")));
        }
        if !self.setpoint.is_empty() {
            out.push(format!("setpoint[{}]", self.setpoint.join(", ")));
        }
        if self.cond.is_some() {
            out.push("cond".to_string());
        }
        out
    }
}
