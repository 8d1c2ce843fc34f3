//! The state machine engine: definition, evaluation and execution.
//!
//! The engine owns no threads; the surrounding application drives it by
//! calling [`StateMachine::run`] once per control-loop tick. Each tick
//! invokes the current state's `run` callback, evaluates that state's
//! transitions in definition order, and performs at most one state
//! change.

use crate::builder::error::DefinitionError;
use crate::builder::state::StateDef;
use crate::builder::transition::{Source, TransitionDef};
use crate::core::context::{Context, Phase, Session};
use crate::core::error::UsageError;
use crate::core::name::{canonical, EventRegistry, StateId, RESERVED_ALL};
use crate::core::state::StateNode;
use crate::core::transition::Transition;
use crate::env::{Environment, FlagFamily};
use crate::export::{GraphSnapshot, StateInfo, TransitionInfo};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Machine configuration, fixed at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MachineOptions {
    /// Mirror the current state's short label to the display surface on
    /// every state change.
    pub show_state: bool,
    /// Emit a diagnostic line on every state change.
    pub trace: bool,
}

/// A tick-driven finite state machine.
///
/// States and transitions are defined incrementally with
/// [`add_state`](Self::add_state) and
/// [`add_transition`](Self::add_transition); the first state defined
/// becomes current immediately. Once defined, the machine is driven by
/// calling [`run`](Self::run) once per tick from a single control
/// thread.
///
/// # Example
///
/// ```rust
/// use fsmkit::{StandaloneEnv, StateDef, StateMachine, TransitionDef};
///
/// let mut machine = StateMachine::new("demo", StandaloneEnv::new());
/// machine
///     .add_state(StateDef::new("idle"))?
///     .add_state(StateDef::new("busy"))?
///     .add_transition(TransitionDef::new("idle", "busy").on_event("go"))?;
///
/// assert_eq!(machine.current_state(), Some("idle"));
/// machine.raise("go")?;
/// machine.run();
/// assert_eq!(machine.current_state(), Some("busy"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StateMachine<E: Environment> {
    name: String,
    options: MachineOptions,
    env: E,
    states: Vec<StateNode>,
    ids: HashMap<String, StateId>,
    events: EventRegistry,
    session: Session,
}

impl<E: Environment> fmt::Debug for StateMachine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: Environment> StateMachine<E> {
    /// Create an empty machine with default options.
    pub fn new(name: impl Into<String>, env: E) -> Self {
        Self::with_options(name, MachineOptions::default(), env)
    }

    /// Create an empty machine with explicit options.
    pub fn with_options(name: impl Into<String>, options: MachineOptions, env: E) -> Self {
        Self {
            name: name.into(),
            options,
            env,
            states: Vec::new(),
            ids: HashMap::new(),
            events: EventRegistry::default(),
            session: Session::new(),
        }
    }

    /// Machine name, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> MachineOptions {
        self.options
    }

    /// The environment this machine queries for clock, flags and display.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Register a state.
    ///
    /// The very first state defined becomes current immediately: its
    /// enter callback fires during this call, with no previous state.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty, the reserved wildcard name `all`, or
    /// already defined. These are startup programmer errors; propagate
    /// them rather than recovering.
    pub fn add_state(&mut self, def: StateDef) -> Result<&mut Self, DefinitionError> {
        let key = canonical(&def.name);
        if key.is_empty() {
            return Err(DefinitionError::EmptyStateName);
        }
        if key == RESERVED_ALL {
            return Err(DefinitionError::ReservedStateName(def.name));
        }
        if self.ids.contains_key(&key) {
            return Err(DefinitionError::DuplicateState(def.name));
        }

        let id = StateId(self.states.len());
        self.states.push(def.into_node());
        self.ids.insert(key, id);

        // First state defined is the initial state, entered right away.
        if self.states.len() == 1 {
            self.change_state(id, None);
        }
        Ok(self)
    }

    /// Register a transition.
    ///
    /// A wildcard source ([`TransitionDef::from_all`]) expands here, at
    /// definition time, into one concrete transition from every state
    /// defined so far except the destination; states defined later do
    /// not receive it. An event guard registers its event machine-wide.
    ///
    /// # Errors
    ///
    /// Fails if the source (when not wildcard) or destination does not
    /// name an already-defined state.
    pub fn add_transition(&mut self, def: TransitionDef) -> Result<&mut Self, DefinitionError> {
        let TransitionDef {
            source,
            dest,
            name,
            cond,
            min_dwell,
            event,
            status,
            io,
            setpoint,
            activate,
        } = def;

        let dest_id = self
            .lookup(&dest)
            .ok_or_else(|| DefinitionError::UnknownDestination(dest.clone()))?;
        let event_id = event.as_deref().map(|e| self.events.intern(e));
        let dest_name = self.states[dest_id.0].name.clone();

        let sources: Vec<StateId> = match source {
            Source::State(from) => {
                let src = self
                    .lookup(&from)
                    .ok_or(DefinitionError::UnknownSource(from))?;
                vec![src]
            }
            Source::All => (0..self.states.len())
                .map(StateId)
                .filter(|&id| id != dest_id)
                .collect(),
        };

        for src in sources {
            let transition = Transition {
                name: name
                    .clone()
                    .unwrap_or_else(|| format!("{}-{}", self.states[src.0].name, dest_name)),
                dest: dest_id,
                cond: cond.clone(),
                min_dwell,
                event: event_id,
                status: status.clone(),
                io: io.clone(),
                setpoint: setpoint.clone(),
                activate: activate.clone(),
            };
            self.states[src.0].transitions.push(transition);
        }
        Ok(self)
    }

    /// Perform one engine tick.
    ///
    /// Invokes the current state's `run` callback, then fires the first
    /// transition (in definition order) whose guards all hold, then runs
    /// any work deferred during the tick. Does nothing (beyond a one-time
    /// diagnostic) until a state has been defined.
    ///
    /// Callback panics are not caught; they propagate to the caller.
    pub fn run(&mut self) {
        let Some(current) = self.session.current else {
            if !self.session.warned_no_state {
                self.session.warned_no_state = true;
                tracing::warn!(
                    machine = %self.name,
                    "run() called before any state was defined"
                );
            }
            return;
        };

        // One clock sample per tick; dwell checks and the activation
        // timestamp of a fired transition both use it.
        let now = self.env.now();

        {
            let Self {
                states,
                session,
                events,
                name,
                ..
            } = self;
            if let Some(callback) = states[current.0].on_run.as_mut() {
                let mut ctx = Context::new(session, events, name);
                callback(&mut ctx);
            }
        }

        if let Some(index) = self.select_transition(current, now) {
            let dest = self.states[current.0].transitions[index].dest;
            self.change_state_at(dest, Some((current, index)), now);
        }

        self.drain_deferred();
    }

    /// First transition of the current state whose full guard
    /// conjunction holds, or `None`. Short-circuits per transition:
    /// dwell time, event, status, io, setpoint, predicate.
    fn select_transition(&self, current: StateId, now: Duration) -> Option<usize> {
        let state = &self.states[current.0];
        let elapsed = now.saturating_sub(state.entered_at.unwrap_or(now));

        state.transitions.iter().position(|t| {
            if let Some(min) = t.min_dwell {
                if elapsed < min {
                    return false;
                }
            }
            if let Some(event) = t.event {
                if !self.session.raised.contains(&event) {
                    return false;
                }
            }
            if !t.status.is_empty() && !self.env.flags_set(FlagFamily::Status, &t.status) {
                return false;
            }
            if !t.io.is_empty() && !self.env.flags_set(FlagFamily::Io, &t.io) {
                return false;
            }
            if !t.setpoint.is_empty() && !self.env.flags_set(FlagFamily::Setpoint, &t.setpoint) {
                return false;
            }
            t.cond.as_ref().map_or(true, |cond| cond())
        })
    }

    fn change_state(&mut self, dest: StateId, via: Option<(StateId, usize)>) {
        let now = self.env.now();
        self.change_state_at(dest, via, now);
    }

    /// The state-change procedure, shared by fired transitions and
    /// direct sets: trace, clear events, leave, switch + timestamp,
    /// display, activate, enter.
    fn change_state_at(&mut self, dest: StateId, via: Option<(StateId, usize)>, now: Duration) {
        let dest_name = self.states[dest.0].name.clone();
        if self.options.trace {
            tracing::debug!(machine = %self.name, "state = {dest_name}");
        }

        // Any state change invalidates all raised events, no matter
        // which transition (if any) triggered it.
        self.session.raised.clear();

        let prev_name = self.session.current.map(|id| self.states[id.0].name.clone());

        if let Some(current) = self.session.current {
            self.session.phase = Phase::Leaving;
            {
                let Self {
                    states,
                    session,
                    events,
                    name,
                    ..
                } = self;
                if let Some(callback) = states[current.0].on_leave.as_mut() {
                    let mut ctx = Context::new(session, events, name);
                    callback(&mut ctx, &dest_name);
                }
            }
            self.session.phase = Phase::Idle;
        }

        self.session.current = Some(dest);
        self.states[dest.0].entered_at = Some(now);

        if self.options.show_state {
            self.env.write_display(&self.states[dest.0].short);
        }

        let activate = via.and_then(|(src, index)| {
            self.states[src.0].transitions[index].activate.clone()
        });
        if let Some(callback) = activate {
            self.session.phase = Phase::Activating;
            {
                let Self {
                    session,
                    events,
                    name,
                    ..
                } = self;
                let mut ctx = Context::new(session, events, name);
                callback(&mut ctx, prev_name.as_deref());
            }
            self.session.phase = Phase::Idle;
        }

        self.session.phase = Phase::Entering;
        {
            let Self {
                states,
                session,
                events,
                name,
                ..
            } = self;
            if let Some(callback) = states[dest.0].on_enter.as_mut() {
                let mut ctx = Context::new(session, events, name);
                callback(&mut ctx, prev_name.as_deref());
            }
        }
        self.session.phase = Phase::Idle;
    }

    /// Run jobs deferred during this tick. Jobs queued by the jobs
    /// themselves wait for the next tick.
    fn drain_deferred(&mut self) {
        let jobs = std::mem::take(&mut self.session.deferred);
        let Self {
            session,
            events,
            name,
            ..
        } = self;
        for job in jobs {
            let mut ctx = Context::new(session, events, name);
            job(&mut ctx);
        }
    }

    /// Name of the current state, or `None` before the first state is
    /// defined.
    pub fn current_state(&self) -> Option<&str> {
        self.session
            .current
            .map(|id| self.states[id.0].name.as_str())
    }

    /// Force the machine into a named state, bypassing transition
    /// evaluation but following the normal callback ordering.
    ///
    /// # Errors
    ///
    /// Unknown names are rejected with a diagnostic; the machine is
    /// unchanged.
    pub fn set_state(&mut self, name: &str) -> Result<(), UsageError> {
        match self.lookup(name) {
            Some(id) => {
                self.change_state(id, None);
                Ok(())
            }
            None => {
                tracing::warn!(
                    machine = %self.name,
                    state = %name,
                    "set_state rejected: unknown state"
                );
                Err(UsageError::UnknownState(name.to_string()))
            }
        }
    }

    /// Return to the first-defined state, following the normal callback
    /// ordering.
    pub fn reset(&mut self) -> Result<(), UsageError> {
        if self.states.is_empty() {
            tracing::warn!(machine = %self.name, "reset rejected: no states defined");
            return Err(UsageError::NoStates);
        }
        self.change_state(StateId(0), None);
        Ok(())
    }

    /// Raise an event flag. The event must be consumed by some
    /// transition, and event changes are forbidden while a leave,
    /// activate or enter callback is executing.
    ///
    /// Raised events persist across ticks until cleared, consumed, or
    /// any state change occurs.
    pub fn raise(&mut self, event: &str) -> Result<(), UsageError> {
        self.session.raise(&self.events, &self.name, event)
    }

    /// Clear a raised event flag. Same restrictions as [`raise`](Self::raise).
    pub fn clear(&mut self, event: &str) -> Result<(), UsageError> {
        self.session.clear(&self.events, &self.name, event)
    }

    /// Check whether an event is currently raised.
    pub fn is_raised(&self, event: &str) -> bool {
        self.events
            .lookup(event)
            .is_some_and(|id| self.session.raised.contains(&id))
    }

    /// How long the current state has been active.
    pub fn time_in_state(&self) -> Option<Duration> {
        let current = self.session.current?;
        let since = self.states[current.0].entered_at?;
        Some(self.env.now().saturating_sub(since))
    }

    /// Whether a state with this name is defined.
    pub fn contains_state(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Graph description of the machine for external visualization.
    ///
    /// Deterministic: states and transitions appear in definition order.
    /// With `mark_current`, the currently-active state is flagged.
    pub fn snapshot(&self, mark_current: bool) -> GraphSnapshot {
        GraphSnapshot {
            machine: self.name.clone(),
            current: if mark_current {
                self.current_state().map(str::to_string)
            } else {
                None
            },
            states: self
                .states
                .iter()
                .enumerate()
                .map(|(index, state)| StateInfo {
                    name: state.name.clone(),
                    short: state.short.clone(),
                    initial: index == 0,
                    current: mark_current && self.session.current == Some(StateId(index)),
                })
                .collect(),
            transitions: self
                .states
                .iter()
                .flat_map(|state| {
                    state.transitions.iter().map(move |t| TransitionInfo {
                        name: t.name.clone(),
                        from: state.name.clone(),
                        to: self.states[t.dest.0].name.clone(),
                        guards: t.guard_summary(&self.events),
                    })
                })
                .collect(),
        }
    }

    fn lookup(&self, name: &str) -> Option<StateId> {
        self.ids.get(&canonical(name)).copied()
    }
}
