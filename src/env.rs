//! External interfaces consumed by the engine.
//!
//! The engine owns no clock, no hardware state and no display; it asks
//! the surrounding application for all three through the [`Environment`]
//! trait. Implementations are expected to be cheap and non-blocking —
//! the engine queries them on every tick.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The three independent families of boolean hardware flags that
/// transitions can require.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlagFamily {
    /// Instrument status flags.
    Status,
    /// Digital I/O lines.
    Io,
    /// Setpoint outputs.
    Setpoint,
}

impl fmt::Display for FlagFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Status => "status",
            Self::Io => "io",
            Self::Setpoint => "setpoint",
        };
        f.write_str(name)
    }
}

/// Capabilities the engine consumes from its surroundings.
///
/// # Example
///
/// ```rust
/// use fsmkit::{Environment, FlagFamily};
/// use std::time::{Duration, Instant};
///
/// struct HostEnv {
///     started: Instant,
/// }
///
/// impl Environment for HostEnv {
///     fn now(&self) -> Duration {
///         self.started.elapsed()
///     }
///
///     fn flags_set(&self, family: FlagFamily, flags: &[String]) -> bool {
///         // Query the instrument; empty requirements are vacuously true.
///         let _ = family;
///         flags.is_empty()
///     }
/// }
/// ```
pub trait Environment {
    /// Monotonic clock used for dwell-time arithmetic. Only differences
    /// between successive readings are meaningful.
    fn now(&self) -> Duration;

    /// True iff every named flag in the family is currently asserted.
    /// Called with a non-empty slice only.
    fn flags_set(&self, family: FlagFamily, flags: &[String]) -> bool;

    /// Best-effort write of a short state label to the display surface.
    /// Used only when the machine's `show_state` option is on.
    fn write_display(&self, _text: &str) {}
}

impl<E: Environment + ?Sized> Environment for &E {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn flags_set(&self, family: FlagFamily, flags: &[String]) -> bool {
        (**self).flags_set(family, flags)
    }

    fn write_display(&self, text: &str) {
        (**self).write_display(text);
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn flags_set(&self, family: FlagFamily, flags: &[String]) -> bool {
        (**self).flags_set(family, flags)
    }

    fn write_display(&self, text: &str) {
        (**self).write_display(text);
    }
}

impl<E: Environment + ?Sized> Environment for Rc<E> {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn flags_set(&self, family: FlagFamily, flags: &[String]) -> bool {
        (**self).flags_set(family, flags)
    }

    fn write_display(&self, text: &str) {
        (**self).write_display(text);
    }
}

impl<E: Environment + ?Sized> Environment for Arc<E> {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn flags_set(&self, family: FlagFamily, flags: &[String]) -> bool {
        (**self).flags_set(family, flags)
    }

    fn write_display(&self, text: &str) {
        (**self).write_display(text);
    }
}

/// Environment for machines with no instrument attached: a process-local
/// monotonic clock, no flags ever asserted, display writes discarded.
///
/// Useful for pure-software machines and for examples.
pub struct StandaloneEnv {
    epoch: Instant,
}

impl StandaloneEnv {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for StandaloneEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for StandaloneEnv {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn flags_set(&self, _family: FlagFamily, flags: &[String]) -> bool {
        flags.is_empty()
    }
}
