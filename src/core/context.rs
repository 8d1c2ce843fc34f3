//! Callback context, phase tracking and deferred work.
//!
//! Enter, leave and activate callbacks run while the engine is mid
//! state-change, so raising or clearing events from inside them would
//! let a callback re-trigger the very evaluation that invoked it. The
//! engine forbids this with an explicit phase flag rather than a lock:
//! execution is single-threaded, so the flag is sufficient.

use crate::core::error::UsageError;
use crate::core::name::{EventId, EventRegistry, StateId};
use std::collections::HashSet;
use std::fmt;

/// Which callback, if any, the engine is currently executing.
///
/// Event mutation is only permitted while the phase is [`Phase::Idle`];
/// `run` callbacks and deferred jobs execute in the idle phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Leaving,
    Activating,
    Entering,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Leaving => "leave",
            Self::Activating => "activate",
            Self::Entering => "enter",
        };
        f.write_str(name)
    }
}

/// Job queued by [`Context::defer`], run after the current tick completes.
pub(crate) type DeferredJob = Box<dyn for<'a> FnOnce(&mut Context<'a>)>;

/// Mutable per-machine session state: everything that changes after
/// definition time, apart from the per-state activation timestamps.
pub(crate) struct Session {
    pub(crate) current: Option<StateId>,
    pub(crate) raised: HashSet<EventId>,
    pub(crate) phase: Phase,
    pub(crate) deferred: Vec<DeferredJob>,
    pub(crate) warned_no_state: bool,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self {
            current: None,
            raised: HashSet::new(),
            phase: Phase::Idle,
            deferred: Vec::new(),
            warned_no_state: false,
        }
    }

    /// Raise an event flag. Rejected during enter/leave/activate and for
    /// events no transition consumes; rejection has no observable effect.
    pub(crate) fn raise(
        &mut self,
        events: &EventRegistry,
        machine: &str,
        event: &str,
    ) -> Result<(), UsageError> {
        self.check_phase(machine, event, "raise")?;
        let id = self.resolve(events, machine, event, "raise")?;
        self.raised.insert(id);
        Ok(())
    }

    /// Clear an event flag. Clearing an event that is not raised is a
    /// successful no-op; the same rejections as [`Session::raise`] apply.
    pub(crate) fn clear(
        &mut self,
        events: &EventRegistry,
        machine: &str,
        event: &str,
    ) -> Result<(), UsageError> {
        self.check_phase(machine, event, "clear")?;
        let id = self.resolve(events, machine, event, "clear")?;
        self.raised.remove(&id);
        Ok(())
    }

    fn check_phase(&self, machine: &str, event: &str, op: &str) -> Result<(), UsageError> {
        if self.phase == Phase::Idle {
            return Ok(());
        }
        tracing::warn!(
            machine = %machine,
            event = %event,
            phase = %self.phase,
            "{op} rejected: event changes are forbidden inside state-change callbacks"
        );
        Err(UsageError::EventChangeForbidden(self.phase))
    }

    fn resolve(
        &self,
        events: &EventRegistry,
        machine: &str,
        event: &str,
        op: &str,
    ) -> Result<EventId, UsageError> {
        events.lookup(event).ok_or_else(|| {
            tracing::warn!(
                machine = %machine,
                event = %event,
                "{op} rejected: event is not consumed by any transition"
            );
            UsageError::UnknownEvent(event.to_string())
        })
    }
}

/// Handle passed to state and transition callbacks.
///
/// Callbacks cannot touch the machine directly (it is mutably borrowed
/// while they run); the context exposes the operations they are allowed
/// to perform. `raise`/`clear` are rejected while a `leave`, `activate`
/// or `enter` callback is executing — callbacks needing to mutate events
/// from those phases should use [`Context::defer`] instead.
///
/// # Example
///
/// ```rust
/// use fsmkit::{Context, StateDef};
///
/// let state = StateDef::new("weighing").on_enter(|ctx: &mut Context, _prev| {
///     // A direct raise would be rejected in the enter phase.
///     ctx.defer(|ctx| {
///         let _ = ctx.raise("settled");
///     });
/// });
/// ```
pub struct Context<'m> {
    session: &'m mut Session,
    events: &'m EventRegistry,
    machine: &'m str,
}

impl<'m> Context<'m> {
    pub(crate) fn new(
        session: &'m mut Session,
        events: &'m EventRegistry,
        machine: &'m str,
    ) -> Self {
        Self {
            session,
            events,
            machine,
        }
    }

    /// Name of the machine this callback belongs to.
    pub fn machine(&self) -> &str {
        self.machine
    }

    /// The engine phase this callback is executing in.
    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Raise an event flag for event-guarded transitions to consume.
    pub fn raise(&mut self, event: &str) -> Result<(), UsageError> {
        self.session.raise(self.events, self.machine, event)
    }

    /// Clear a raised event flag.
    pub fn clear(&mut self, event: &str) -> Result<(), UsageError> {
        self.session.clear(self.events, self.machine, event)
    }

    /// Check whether an event is currently raised.
    pub fn is_raised(&self, event: &str) -> bool {
        self.events
            .lookup(event)
            .is_some_and(|id| self.session.raised.contains(&id))
    }

    /// Queue work to run after the current tick completes.
    ///
    /// Jobs queued during a tick run at the end of that `run()` call,
    /// with the phase back at idle; jobs queued by another deferred job
    /// (or outside a tick) run at the end of the next `run()`.
    pub fn defer<F>(&mut self, job: F)
    where
        F: for<'a> FnOnce(&mut Context<'a>) + 'static,
    {
        self.session.deferred.push(Box::new(job));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(events: &[&str]) -> EventRegistry {
        let mut reg = EventRegistry::default();
        for event in events {
            reg.intern(event);
        }
        reg
    }

    #[test]
    fn raise_and_clear_round_trip() {
        let reg = registry_with(&["go"]);
        let mut session = Session::new();
        let mut ctx = Context::new(&mut session, &reg, "test");

        assert!(!ctx.is_raised("go"));
        ctx.raise("go").unwrap();
        assert!(ctx.is_raised("go"));
        ctx.clear("go").unwrap();
        assert!(!ctx.is_raised("go"));
    }

    #[test]
    fn clear_of_unraised_event_is_a_no_op() {
        let reg = registry_with(&["go"]);
        let mut session = Session::new();
        let mut ctx = Context::new(&mut session, &reg, "test");

        assert_eq!(ctx.clear("go"), Ok(()));
    }

    #[test]
    fn unknown_event_is_rejected() {
        let reg = registry_with(&["go"]);
        let mut session = Session::new();
        let mut ctx = Context::new(&mut session, &reg, "test");

        assert_eq!(
            ctx.raise("stop"),
            Err(UsageError::UnknownEvent("stop".to_string()))
        );
    }

    #[test]
    fn event_changes_forbidden_outside_idle_phase() {
        let reg = registry_with(&["go"]);
        let mut session = Session::new();
        session.phase = Phase::Entering;
        let mut ctx = Context::new(&mut session, &reg, "test");

        assert_eq!(
            ctx.raise("go"),
            Err(UsageError::EventChangeForbidden(Phase::Entering))
        );
        assert!(!ctx.is_raised("go"));
        assert_eq!(
            ctx.clear("go"),
            Err(UsageError::EventChangeForbidden(Phase::Entering))
        );
    }

    #[test]
    fn event_lookup_is_canonical() {
        let reg = registry_with(&["Start Fill"]);
        let mut session = Session::new();
        let mut ctx = Context::new(&mut session, &reg, "test");

        ctx.raise("startfill").unwrap();
        assert!(ctx.is_raised("START FILL"));
    }

    #[test]
    fn phase_displays_callback_names() {
        assert_eq!(Phase::Idle.to_string(), "idle");
        assert_eq!(Phase::Leaving.to_string(), "leave");
        assert_eq!(Phase::Activating.to_string(), "activate");
        assert_eq!(Phase::Entering.to_string(), "enter");
    }
}
