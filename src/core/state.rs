//! Runtime state representation.

use crate::core::context::Context;
use crate::core::transition::Transition;
use std::time::Duration;

/// Per-tick callback invoked while a state is current.
pub type RunCallback = Box<dyn FnMut(&mut Context<'_>)>;

/// Callback invoked when a state becomes current. The argument is the
/// name of the previous state, or `None` when the machine enters its
/// very first state at definition time.
pub type EnterCallback = Box<dyn FnMut(&mut Context<'_>, Option<&str>)>;

/// Callback invoked when a state stops being current. The argument is
/// the name of the state being entered.
pub type LeaveCallback = Box<dyn FnMut(&mut Context<'_>, &str)>;

/// A defined state: immutable after definition apart from its outgoing
/// transition list (appended to by later `add_transition` calls) and
/// the activation timestamp maintained by the engine.
pub(crate) struct StateNode {
    /// Original name, as spelled at definition time.
    pub(crate) name: String,
    /// Short display label, mirrored to the display surface when the
    /// machine's `show_state` option is on.
    pub(crate) short: String,
    pub(crate) on_enter: Option<EnterCallback>,
    pub(crate) on_leave: Option<LeaveCallback>,
    pub(crate) on_run: Option<RunCallback>,
    /// Outgoing transitions in definition order; first match wins.
    pub(crate) transitions: Vec<Transition>,
    /// Monotonic timestamp of when this state last became current.
    pub(crate) entered_at: Option<Duration>,
}
