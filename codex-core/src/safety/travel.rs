//! Descent travel guard
//!
//! Counts commanded downward travel while lowering onto the stack. If the
//! contact sensor fails, or the stack is empty, the guard is the only thing
//! that stops the descent.

use crate::motion::MOTION_EPSILON_MM;

/// Guard condition status
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardStatus {
    /// Another step is allowed
    Ok,
    /// Limit reached; descent must abort
    Tripped { limit_mm: f64, traveled_mm: f64 },
}

/// Travel accounting for one descent
#[derive(Debug, Clone)]
pub struct TravelGuard {
    /// Maximum downward travel, or `None` for unbounded
    limit_mm: Option<f64>,
    /// Travel commanded so far
    traveled_mm: f64,
    /// Steps commanded so far
    steps: u32,
}

impl TravelGuard {
    /// Create a guard for a fresh descent
    pub fn new(limit_mm: Option<f64>) -> Self {
        Self {
            limit_mm,
            traveled_mm: 0.0,
            steps: 0,
        }
    }

    /// Record one commanded step
    pub fn record_step(&mut self, step_mm: f64) {
        self.traveled_mm += step_mm;
        self.steps = self.steps.saturating_add(1);
    }

    /// Check whether another step is allowed
    ///
    /// Trips once travel reaches the limit, not only when it passes it.
    /// Summed steps drift, so travel within the motion epsilon of the limit
    /// counts as reached.
    pub fn check(&self) -> GuardStatus {
        match self.limit_mm {
            Some(limit_mm) if self.traveled_mm >= limit_mm - MOTION_EPSILON_MM => {
                GuardStatus::Tripped {
                    limit_mm,
                    traveled_mm: self.traveled_mm,
                }
            }
            _ => GuardStatus::Ok,
        }
    }

    /// Downward travel commanded so far
    pub fn traveled_mm(&self) -> f64 {
        self.traveled_mm
    }

    /// Steps commanded so far
    pub fn steps(&self) -> u32 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_guard_is_ok() {
        let guard = TravelGuard::new(Some(5.0));
        assert_eq!(guard.check(), GuardStatus::Ok);
        assert_eq!(guard.steps(), 0);
    }

    #[test]
    fn test_trips_at_limit() {
        let mut guard = TravelGuard::new(Some(5.0));
        for _ in 0..4 {
            guard.record_step(1.0);
            assert_eq!(guard.check(), GuardStatus::Ok);
        }

        guard.record_step(1.0);
        assert_eq!(
            guard.check(),
            GuardStatus::Tripped {
                limit_mm: 5.0,
                traveled_mm: 5.0
            }
        );
        assert_eq!(guard.steps(), 5);
    }

    #[test]
    fn test_half_millimeter_steps() {
        let mut guard = TravelGuard::new(Some(2.0));
        let mut steps = 0;
        while guard.check() == GuardStatus::Ok {
            guard.record_step(0.5);
            steps += 1;
        }
        assert_eq!(steps, 4);
    }

    #[test]
    fn test_tenth_millimeter_steps_trip_at_limit() {
        // 0.1 summed ten times is just under 1.0
        let mut guard = TravelGuard::new(Some(1.0));
        let mut steps = 0;
        while guard.check() == GuardStatus::Ok {
            guard.record_step(0.1);
            steps += 1;
        }
        assert_eq!(steps, 10);
        assert!(guard.traveled_mm() < 1.0);
    }

    #[test]
    fn test_unbounded_never_trips() {
        let mut guard = TravelGuard::new(None);
        for _ in 0..10_000 {
            guard.record_step(1.0);
        }
        assert_eq!(guard.check(), GuardStatus::Ok);
        assert_eq!(guard.traveled_mm(), 10_000.0);
    }

    #[test]
    fn test_zero_limit_trips_immediately() {
        let guard = TravelGuard::new(Some(0.0));
        assert!(matches!(guard.check(), GuardStatus::Tripped { .. }));
    }
}
