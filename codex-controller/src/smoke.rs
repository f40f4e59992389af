//! Rig smoke test
//!
//! Exercises every actuator once before a real run: home, a short jog on X,
//! suction on for a moment, suction off.

use codex_core::motion::{MotionError, MotionRequest};
use codex_core::traits::{StageClient, SuctionActuator};
use embedded_hal::delay::DelayNs;
use tracing::{error, info};

use crate::motion::MotionDriver;

/// Jog distance on X
pub const SMOKE_JOG_MM: f64 = 10.0;

/// How long suction stays on
pub const SMOKE_HOLD_MS: u32 = 5000;

/// Run the smoke test
///
/// Suction is off afterwards even if a motion command failed.
pub fn smoke_test<S, D, A>(
    driver: &mut MotionDriver<S, D>,
    suction: &mut A,
    hold_ms: u32,
) -> Result<(), MotionError>
where
    S: StageClient,
    D: DelayNs,
    A: SuctionActuator,
{
    let result = run(driver, suction, hold_ms);
    suction.off();

    match &result {
        Ok(()) => info!("smoke test passed, rig is ready for a run"),
        Err(e) => error!(error = %e, "smoke test failed"),
    }
    result
}

fn run<S, D, A>(
    driver: &mut MotionDriver<S, D>,
    suction: &mut A,
    hold_ms: u32,
) -> Result<(), MotionError>
where
    S: StageClient,
    D: DelayNs,
    A: SuctionActuator,
{
    driver.home()?;

    info!(mm = SMOKE_JOG_MM, "jogging on X");
    let x = driver.position().x + SMOKE_JOG_MM;
    driver.move_to(MotionRequest::x(x))?;

    info!(hold_ms, "suction on");
    suction.on();
    driver.pause(hold_ms, "suction hold");
    Ok(())
}
