//! Serializable graph description of a machine.

use serde::{Deserialize, Serialize};

/// Snapshot of a machine's full state/transition graph, produced by
/// [`StateMachine::snapshot`](crate::StateMachine::snapshot).
///
/// Deterministic: states and transitions appear in definition order.
/// Serializes with serde for tooling that wants JSON instead of a
/// rendered text format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Machine name.
    pub machine: String,
    /// Name of the current state, when the snapshot was asked to mark it.
    pub current: Option<String>,
    pub states: Vec<StateInfo>,
    pub transitions: Vec<TransitionInfo>,
}

/// One state in a [`GraphSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInfo {
    pub name: String,
    /// Short display label.
    pub short: String,
    /// Whether this is the first-defined (initial) state.
    pub initial: bool,
    /// Whether this state was current when the snapshot was taken.
    /// Always false unless the snapshot was asked to mark it.
    pub current: bool,
}

/// One transition in a [`GraphSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionInfo {
    /// Diagnostic name of the transition.
    pub name: String,
    pub from: String,
    pub to: String,
    /// Human-readable guard summaries, in evaluation order; empty for
    /// an unconditional transition.
    pub guards: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_through_json() {
        let snapshot = GraphSnapshot {
            machine: "dosing".to_string(),
            current: Some("idle".to_string()),
            states: vec![StateInfo {
                name: "idle".to_string(),
                short: "IDLE".to_string(),
                initial: true,
                current: true,
            }],
            transitions: vec![TransitionInfo {
                name: "idle-fill".to_string(),
                from: "idle".to_string(),
                to: "fill".to_string(),
                guards: vec!["event = start".to_string()],
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GraphSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
