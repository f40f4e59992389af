//! Contact descent
//!
//! Lowers the head one step at a time until the contact sensor closes. The
//! sensor is read before every step, so a head already in contact does not
//! move at all. A travel guard bounds the whole descent.

use codex_core::motion::{DescentError, MotionRequest, MOTION_EPSILON_MM};
use codex_core::safety::{GuardStatus, TravelGuard};
use codex_core::traits::{ContactSensor, StageClient};
use embedded_hal::delay::DelayNs;
use tracing::{debug, error, info};

use super::MotionDriver;

/// Outcome of a descent that reached contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentReport {
    /// Steps taken before contact
    pub steps: u32,
    /// Downward travel commanded before contact
    pub traveled_mm: f64,
}

/// Stepwise descent gated by a contact sensor
#[derive(Debug, Clone, Copy)]
pub struct ContactDescent {
    /// Wait after each step before reading the sensor again
    poll_interval_ms: u32,
}

impl ContactDescent {
    pub fn new(poll_interval_ms: u32) -> Self {
        Self { poll_interval_ms }
    }

    /// Lower until the sensor reports contact
    ///
    /// # Arguments
    /// - `step_mm`: Distance lowered per step; must exceed the motion
    ///   epsilon, or the driver would never send it
    /// - `max_travel_mm`: Abort once this much travel was commanded without
    ///   contact; `None` descends until contact or a stage failure
    pub fn descend_until_contact<S, D, C>(
        &self,
        driver: &mut MotionDriver<S, D>,
        sensor: &mut C,
        step_mm: f64,
        max_travel_mm: Option<f64>,
    ) -> Result<DescentReport, DescentError>
    where
        S: StageClient,
        D: DelayNs,
        C: ContactSensor,
    {
        if step_mm.is_nan() || step_mm <= MOTION_EPSILON_MM {
            return Err(DescentError::InvalidStep { step_mm });
        }

        let mut guard = TravelGuard::new(max_travel_mm);
        debug!(step_mm, ?max_travel_mm, "descending to contact");

        loop {
            if sensor.is_pressed() {
                info!(
                    steps = guard.steps(),
                    traveled_mm = guard.traveled_mm(),
                    "contact"
                );
                return Ok(DescentReport {
                    steps: guard.steps(),
                    traveled_mm: guard.traveled_mm(),
                });
            }

            if let GuardStatus::Tripped {
                limit_mm,
                traveled_mm,
            } = guard.check()
            {
                error!(limit_mm, traveled_mm, "no contact within travel limit");
                return Err(DescentError::TravelLimitExceeded {
                    limit_mm,
                    traveled_mm,
                });
            }

            let z = driver.position().z - step_mm;
            driver.move_to(MotionRequest::z(z))?;
            guard.record_step(step_mm);
            driver.pause(self.poll_interval_ms, "descent poll");
        }
    }
}
