//! Graphviz rendering of graph snapshots.

use crate::export::graph::GraphSnapshot;
use crate::export::Render;

const NODE_FILL: &str = "gray92";
const CURRENT_FILL: &str = "palegreen";

/// Renders a [`GraphSnapshot`] as a Graphviz `digraph`.
///
/// Nodes are states (the initial state drawn with a heavier border, the
/// current one filled when marked); edges are transitions labelled with
/// their guard summaries. Output is deterministic for a given snapshot.
///
/// # Example
///
/// ```rust
/// use fsmkit::{DotRenderer, Render, StandaloneEnv, StateDef, StateMachine};
///
/// let mut machine = StateMachine::new("demo", StandaloneEnv::new());
/// machine.add_state(StateDef::new("idle"))?;
///
/// let dot = DotRenderer::default().render(&machine.snapshot(true));
/// assert!(dot.starts_with("digraph \"demo\""));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DotRenderer;

impl Render for DotRenderer {
    fn render(&self, graph: &GraphSnapshot) -> String {
        let mut out = String::new();
        out.push_str(&format!("digraph \"{}\" {{\n", escape(&graph.machine)));
        out.push_str("    rankdir=LR;\n");
        out.push_str(&format!(
            "    node [shape=box, style=\"rounded,filled\", fillcolor=\"{NODE_FILL}\"];\n"
        ));

        for state in &graph.states {
            let mut attrs = vec![format!("label=\"{}\"", escape(&state.name))];
            if state.initial {
                attrs.push("penwidth=2".to_string());
            }
            if state.current {
                attrs.push(format!("fillcolor=\"{CURRENT_FILL}\""));
            }
            out.push_str(&format!(
                "    \"{}\" [{}];\n",
                escape(&state.name),
                attrs.join(", ")
            ));
        }

        for transition in &graph.transitions {
            if transition.guards.is_empty() {
                out.push_str(&format!(
                    "    \"{}\" -> \"{}\";\n",
                    escape(&transition.from),
                    escape(&transition.to)
                ));
            } else {
                out.push_str(&format!(
                    "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
                    escape(&transition.from),
                    escape(&transition.to),
                    escape(&transition.guards.join("\n"))
                ));
            }
        }

        out.push_str("}\n");
        out
    }
}

/// Escape a string for use inside a double-quoted DOT identifier or
/// label. Newlines become label line breaks.
fn escape(text: &str) -> String {
    text.chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            other => vec![other],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::graph::{StateInfo, TransitionInfo};

    fn sample() -> GraphSnapshot {
        GraphSnapshot {
            machine: "dosing".to_string(),
            current: Some("fill".to_string()),
            states: vec![
                StateInfo {
                    name: "idle".to_string(),
                    short: "IDLE".to_string(),
                    initial: true,
                    current: false,
                },
                StateInfo {
                    name: "fill".to_string(),
                    short: "FILL".to_string(),
                    initial: false,
                    current: true,
                },
            ],
            transitions: vec![
                TransitionInfo {
                    name: "idle-fill".to_string(),
                    from: "idle".to_string(),
                    to: "fill".to_string(),
                    guards: vec!["event = start".to_string(), "status[zero]".to_string()],
                },
                TransitionInfo {
                    name: "fill-idle".to_string(),
                    from: "fill".to_string(),
                    to: "idle".to_string(),
                    guards: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn renders_every_state_and_transition() {
        let dot = DotRenderer.render(&sample());

        assert!(dot.contains("digraph \"dosing\""));
        assert!(dot.contains("\"idle\" [label=\"idle\", penwidth=2];"));
        assert!(dot.contains(&format!(
            "\"fill\" [label=\"fill\", fillcolor=\"{CURRENT_FILL}\"];"
        )));
        assert!(dot.contains("\"idle\" -> \"fill\" [label=\"event = start\\nstatus[zero]\"];"));
        assert!(dot.contains("\"fill\" -> \"idle\";"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let graph = sample();
        assert_eq!(DotRenderer.render(&graph), DotRenderer.render(&graph));
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape("a\nb"), "a\\nb");
    }
}
