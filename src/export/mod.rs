//! Introspection and export of machine definitions.
//!
//! [`StateMachine::snapshot`](crate::StateMachine::snapshot) produces a
//! [`GraphSnapshot`] — a plain, serde-serializable description of the
//! machine's states and transitions. Renderers turn snapshots into text
//! for external tooling; the snapshot format, not any rendered text, is
//! the engine's only introspection surface.

pub mod dot;
pub mod graph;

pub use dot::DotRenderer;
pub use graph::{GraphSnapshot, StateInfo, TransitionInfo};

/// A pure snapshot-to-text formatter.
///
/// Decoupled from the engine's data model: renderers see only the
/// [`GraphSnapshot`], so alternate formats can be added without touching
/// the machine.
pub trait Render {
    fn render(&self, graph: &GraphSnapshot) -> String;
}
