//! Property-based tests for the engine.
//!
//! These tests use proptest to verify invariants hold across many
//! randomly generated machines, clocks and operation sequences.

use fsmkit::core::canonical;
use fsmkit::{Environment, FlagFamily, StateDef, StateMachine, TransitionDef};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Manual clock with no flags asserted; properties that need hardware
/// flags are covered by the scenario tests.
#[derive(Default)]
struct ClockEnv {
    clock: Cell<Duration>,
}

impl ClockEnv {
    fn advance(&self, by: Duration) {
        self.clock.set(self.clock.get() + by);
    }
}

impl Environment for ClockEnv {
    fn now(&self) -> Duration {
        self.clock.get()
    }

    fn flags_set(&self, _family: FlagFamily, flags: &[String]) -> bool {
        flags.is_empty()
    }
}

fn machine(name: &str) -> (Rc<ClockEnv>, StateMachine<Rc<ClockEnv>>) {
    let env = Rc::new(ClockEnv::default());
    (Rc::clone(&env), StateMachine::new(name, env))
}

prop_compose! {
    /// A lowercase base name plus a case/whitespace-perturbed spelling
    /// of the same name.
    fn perturbed_name()(
        base in "[a-z]{3,8}",
        caps in prop::collection::vec(any::<bool>(), 8),
        spaces in prop::collection::vec(any::<bool>(), 8),
    ) -> (String, String) {
        let mut variant = String::new();
        for (i, c) in base.chars().enumerate() {
            if spaces[i] {
                variant.push(' ');
            }
            if caps[i] {
                variant.extend(c.to_uppercase());
            } else {
                variant.push(c);
            }
        }
        (base, variant)
    }
}

#[derive(Clone, Debug)]
enum Op {
    Run,
    Raise(u8),
    Clear(u8),
    Set(u8),
    Reset,
    Advance(u16),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Run),
        (0..4u8).prop_map(Op::Raise),
        (0..4u8).prop_map(Op::Clear),
        (0..4u8).prop_map(Op::Set),
        Just(Op::Reset),
        (1..2000u16).prop_map(Op::Advance),
    ]
}

proptest! {
    #[test]
    fn canonicalization_is_case_and_whitespace_insensitive(
        (base, variant) in perturbed_name()
    ) {
        prop_assume!(canonical(&base) != "all");

        let (_env, mut m) = machine("prop");
        m.add_state(StateDef::new(variant.clone())).unwrap();

        prop_assert!(m.contains_state(&base));
        prop_assert!(m.contains_state(&variant));
        // The original spelling is what current_state reports.
        prop_assert_eq!(m.current_state(), Some(variant.as_str()));
        // Redefining under any spelling is a duplicate.
        prop_assert!(m.add_state(StateDef::new(base)).is_err());
    }

    #[test]
    fn dwell_guard_never_fires_early(
        dwell_ms in 1u64..5_000,
        steps in prop::collection::vec(1u64..500, 1..20),
    ) {
        let (env, mut m) = machine("prop");
        m.add_state(StateDef::new("a")).unwrap();
        m.add_state(StateDef::new("b")).unwrap();
        m.add_transition(
            TransitionDef::new("a", "b").after(Duration::from_millis(dwell_ms)),
        ).unwrap();

        for step in steps {
            env.advance(Duration::from_millis(step));
            m.run();
            let elapsed = env.now();
            if elapsed < Duration::from_millis(dwell_ms) {
                prop_assert_eq!(m.current_state(), Some("a"));
            } else {
                prop_assert_eq!(m.current_state(), Some("b"));
                break;
            }
        }
    }

    #[test]
    fn first_matching_transition_wins_regardless_of_later_ones(
        extra in 1usize..5,
    ) {
        let (_env, mut m) = machine("prop");
        m.add_state(StateDef::new("src")).unwrap();
        m.add_state(StateDef::new("first")).unwrap();
        m.add_state(StateDef::new("other")).unwrap();
        m.add_transition(TransitionDef::new("src", "first")).unwrap();
        for _ in 0..extra {
            m.add_transition(TransitionDef::new("src", "other")).unwrap();
        }

        m.run();
        prop_assert_eq!(m.current_state(), Some("first"));
    }

    #[test]
    fn engine_never_panics_and_stays_in_defined_states(
        ops in prop::collection::vec(arbitrary_op(), 0..60),
    ) {
        let states = ["s0", "s1", "s2", "s3"];
        let events = ["e0", "e1", "e2", "e3"];

        let (env, mut m) = machine("prop");
        for state in states {
            m.add_state(StateDef::new(state)).unwrap();
        }
        // Ring of event-guarded transitions plus one wildcard escape.
        m.add_transition(TransitionDef::new("s0", "s1").on_event("e0")).unwrap();
        m.add_transition(TransitionDef::new("s1", "s2").on_event("e1")).unwrap();
        m.add_transition(TransitionDef::new("s2", "s3").on_event("e2")).unwrap();
        m.add_transition(TransitionDef::from_all("s0").on_event("e3")).unwrap();

        for op in ops {
            let before = m.current_state().map(str::to_string);
            match op {
                Op::Run => m.run(),
                Op::Raise(i) => {
                    let _ = m.raise(events[i as usize % events.len()]);
                }
                Op::Clear(i) => {
                    let _ = m.clear(events[i as usize % events.len()]);
                }
                Op::Set(i) => {
                    let target = states[i as usize % states.len()];
                    m.set_state(target).unwrap();
                    prop_assert_eq!(m.current_state(), Some(target));
                }
                Op::Reset => {
                    m.reset().unwrap();
                    prop_assert_eq!(m.current_state(), Some("s0"));
                }
                Op::Advance(ms) => env.advance(Duration::from_millis(u64::from(ms))),
            }

            let current = m.current_state().expect("machine has states");
            prop_assert!(states.contains(&current));

            // Any state change clears the raised set.
            if m.current_state().map(str::to_string) != before {
                for event in events {
                    prop_assert!(!m.is_raised(event));
                }
            }
        }
    }

    #[test]
    fn snapshot_is_stable_across_ticks(
        ticks in 0usize..20,
    ) {
        let (_env, mut m) = machine("prop");
        m.add_state(StateDef::new("a")).unwrap();
        m.add_state(StateDef::new("b")).unwrap();
        m.add_transition(TransitionDef::new("a", "b").on_event("go")).unwrap();
        m.add_transition(TransitionDef::new("b", "a").on_event("go")).unwrap();

        let structure = m.snapshot(false);
        for _ in 0..ticks {
            let _ = m.raise("go");
            m.run();
        }
        // Running the machine never changes the definition.
        prop_assert_eq!(m.snapshot(false), structure);
    }
}
