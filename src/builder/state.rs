//! Builder for state definitions.

use crate::core::context::Context;
use crate::core::state::{EnterCallback, LeaveCallback, RunCallback, StateNode};

/// Definition of a single state, passed to
/// [`StateMachine::add_state`](crate::StateMachine::add_state).
///
/// Only the name is required; the short label defaults to the uppercased
/// name and every callback defaults to a no-op.
///
/// # Example
///
/// ```rust
/// use fsmkit::StateDef;
///
/// let filling = StateDef::new("filling")
///     .short("FILL")
///     .on_enter(|_ctx, prev| println!("filling (from {prev:?})"))
///     .on_run(|_ctx| { /* polled every tick */ });
/// ```
pub struct StateDef {
    pub(crate) name: String,
    pub(crate) short: Option<String>,
    pub(crate) on_enter: Option<EnterCallback>,
    pub(crate) on_leave: Option<LeaveCallback>,
    pub(crate) on_run: Option<RunCallback>,
}

impl StateDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            on_enter: None,
            on_leave: None,
            on_run: None,
        }
    }

    /// Short display label, mirrored to the display surface when the
    /// machine's `show_state` option is on. Defaults to the uppercased
    /// state name.
    pub fn short(mut self, label: impl Into<String>) -> Self {
        self.short = Some(label.into());
        self
    }

    /// Callback invoked when the state becomes current. Receives the
    /// previous state's name, or `None` for the initial entry at
    /// definition time.
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut Context<'_>, Option<&str>) + 'static,
    {
        self.on_enter = Some(Box::new(callback));
        self
    }

    /// Callback invoked when the state stops being current. Receives the
    /// name of the state being entered.
    pub fn on_leave<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut Context<'_>, &str) + 'static,
    {
        self.on_leave = Some(Box::new(callback));
        self
    }

    /// Callback invoked once per tick while the state is current, before
    /// transitions are evaluated.
    pub fn on_run<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.on_run = Some(Box::new(callback));
        self
    }

    pub(crate) fn into_node(self) -> StateNode {
        let short = self.short.unwrap_or_else(|| self.name.to_uppercase());
        StateNode {
            name: self.name,
            short,
            on_enter: self.on_enter,
            on_leave: self.on_leave,
            on_run: self.on_run,
            transitions: Vec::new(),
            entered_at: None,
        }
    }
}
