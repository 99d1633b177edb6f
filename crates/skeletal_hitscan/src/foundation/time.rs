//! Simulation step counting
//!
//! Bone transforms are valid for exactly one simulation step. The step
//! counter here is handed explicitly to whatever caches per-step data, so
//! independent simulations (or tests) never share hidden global state.

use std::fmt;

/// Index of a simulation step
///
/// Monotonically increasing for a given [`StepClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimulationStep(u64);

impl SimulationStep {
    /// The first step of a simulation
    pub const ZERO: Self = Self(0);

    /// Create a step from a raw counter value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw counter value
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The step following this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SimulationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.0)
    }
}

/// Step counter owned by the simulation loop
///
/// Call [`StepClock::advance`] once per simulation step, before the
/// animation system writes bone transforms for that step.
#[derive(Debug, Clone, Default)]
pub struct StepClock {
    current: SimulationStep,
    fixed_delta: f32,
    total_time: f32,
}

impl StepClock {
    /// Create a clock at step zero with the given fixed step length in seconds
    pub fn new(fixed_delta: f32) -> Self {
        Self {
            current: SimulationStep::ZERO,
            fixed_delta,
            total_time: 0.0,
        }
    }

    /// Advance to the next step and return it
    pub fn advance(&mut self) -> SimulationStep {
        self.current = self.current.next();
        self.total_time += self.fixed_delta;
        self.current
    }

    /// The step currently being simulated
    pub fn current(&self) -> SimulationStep {
        self.current
    }

    /// Fixed step length in seconds
    pub fn fixed_delta(&self) -> f32 {
        self.fixed_delta
    }

    /// Simulated seconds since the clock started
    pub fn total_time(&self) -> f32 {
        self.total_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_monotonically() {
        let mut clock = StepClock::new(1.0 / 60.0);
        assert_eq!(clock.current(), SimulationStep::ZERO);

        let first = clock.advance();
        let second = clock.advance();

        assert!(second > first);
        assert_eq!(second.value(), 2);
        assert!((clock.total_time() - 2.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_independent_clocks_do_not_interfere() {
        let mut a = StepClock::new(0.1);
        let b = StepClock::new(0.1);

        a.advance();
        a.advance();

        assert_eq!(a.current(), SimulationStep::new(2));
        assert_eq!(b.current(), SimulationStep::ZERO);
    }
}
