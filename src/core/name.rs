//! Canonical names and definition-time handles.
//!
//! States and events are addressed by name in the public API, but all
//! runtime comparisons use opaque handles assigned at definition time.
//! The canonical form of a name is the lookup key; the original string
//! is kept only for display and diagnostics.

use std::collections::HashMap;

/// The reserved source name used by wildcard transitions.
pub(crate) const RESERVED_ALL: &str = "all";

/// Compute the canonical lookup key for a state or event name.
///
/// Canonicalization makes name comparisons insensitive to case and
/// whitespace while leaving the original string untouched for display.
///
/// # Example
///
/// ```rust
/// use fsmkit::core::canonical;
///
/// assert_eq!(canonical("Fill Pending"), "fillpending");
/// assert_eq!(canonical("  IDLE "), "idle");
/// assert_eq!(canonical("idle"), canonical("Idle"));
/// ```
pub fn canonical(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Definition-time handle for a state.
///
/// Indexes into the machine's state table; assigned in definition order,
/// so handle 0 is always the initial state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StateId(pub(crate) usize);

/// Definition-time handle for an event registered by some transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct EventId(pub(crate) usize);

/// Registry of event names seen across all transitions of a machine.
///
/// `raise`/`clear` calls are validated against this registry; an event
/// that no transition consumes cannot be raised.
#[derive(Default)]
pub(crate) struct EventRegistry {
    by_key: HashMap<String, EventId>,
    names: Vec<String>,
}

impl EventRegistry {
    /// Register an event name, returning its handle. Idempotent: the
    /// first-seen spelling of the name is kept for diagnostics.
    pub(crate) fn intern(&mut self, name: &str) -> EventId {
        let key = canonical(name);
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = EventId(self.names.len());
        self.names.push(name.to_string());
        self.by_key.insert(key, id);
        id
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<EventId> {
        self.by_key.get(&canonical(name)).copied()
    }

    pub(crate) fn name(&self, id: EventId) -> &str {
        &self.names[id.0]
    }
}
