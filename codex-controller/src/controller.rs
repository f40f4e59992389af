//! Cycle orchestrator
//!
//! Sequences one run of the sorter:
//! - Setup, gated by three operator presses (home, front, attach confirm)
//! - N sort cycles: pick, read, route, drop, re-home
//! - Suction off at the end, whatever happened
//!
//! Classification failures are absorbed (one retry, then the unknown bin).
//! Motion and descent failures abort the run.

use std::num::NonZeroU32;

use codex_core::config::{DescentConfig, MotionConfig};
use codex_core::motion::MotionRequest;
use codex_core::routing::{Bin, RoutingTable};
use codex_core::state::{CycleState, Event};
use codex_core::traits::{ContactSensor, Label, StageClient, SuctionActuator, VisionClassifier};
use embedded_hal::delay::DelayNs;
use tracing::{debug, error, info, warn};

use crate::config::RigConfig;
use crate::error::RunError;
use crate::motion::{ContactDescent, MotionDriver};

/// Collaborators making up one rig
pub struct Rig<S, C, A, V> {
    /// Motion stage
    pub stage: S,
    /// Contact sensor, doubling as the operator button
    pub sensor: C,
    /// Suction fan
    pub suction: A,
    /// Camera and recognizer
    pub vision: V,
}

/// What a completed run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles completed
    pub cycles: u32,
    /// Cards dropped per bin, indexed by [`Bin::index`]
    pub per_bin: [u32; 3],
    /// Classification retries taken
    pub retries: u32,
}

impl RunSummary {
    /// Cards dropped in a bin
    pub fn count(&self, bin: Bin) -> u32 {
        self.per_bin[bin.index()]
    }

    fn record(&mut self, bin: Bin) {
        self.per_bin[bin.index()] += 1;
    }
}

/// Top-level run sequencer
pub struct CycleOrchestrator<S, C, A, V, D> {
    motion: MotionDriver<S, D>,
    descent: ContactDescent,
    routing: RoutingTable,
    sensor: C,
    suction: A,
    vision: V,
    state: CycleState,
    motion_config: MotionConfig,
    descent_config: DescentConfig,
    /// Wait between cycle phases
    pause_ms: u32,
    /// Operator button polling interval
    button_poll_ms: u32,
}

impl<S, C, A, V, D> CycleOrchestrator<S, C, A, V, D>
where
    S: StageClient,
    C: ContactSensor,
    A: SuctionActuator,
    V: VisionClassifier,
    D: DelayNs,
{
    /// Create an orchestrator for a rig
    pub fn new(rig: Rig<S, C, A, V>, delay: D, config: &RigConfig) -> Self {
        let motion_config = config.motion;

        Self {
            motion: MotionDriver::new(rig.stage, delay, motion_config.post_home, &config.timing),
            descent: ContactDescent::new(config.timing.descent_poll_ms),
            routing: RoutingTable::new(motion_config.post_home, &config.routing),
            sensor: rig.sensor,
            suction: rig.suction,
            vision: rig.vision,
            state: CycleState::AwaitingHome,
            motion_config,
            descent_config: config.descent,
            pause_ms: config.timing.pause_ms,
            button_poll_ms: config.timing.button_poll_ms,
        }
    }

    /// Current run state
    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn motion(&self) -> &MotionDriver<S, D> {
        &self.motion
    }

    pub fn sensor(&self) -> &C {
        &self.sensor
    }

    pub fn suction(&self) -> &A {
        &self.suction
    }

    pub fn vision(&self) -> &V {
        &self.vision
    }

    /// Run setup and `cycles` sort cycles
    ///
    /// Suction is switched off before returning, on success and on error.
    pub fn run(&mut self, cycles: NonZeroU32) -> Result<RunSummary, RunError> {
        info!(cycles = cycles.get(), "starting card sorter");

        let result = self.setup().and_then(|()| self.sort(cycles));

        // Idempotent; the fan must never be left running
        self.suction.off();

        match &result {
            Ok(summary) => {
                self.advance(Event::RunComplete);
                info!(
                    cycles = summary.cycles,
                    unknown = summary.count(Bin::Unknown),
                    special = summary.count(Bin::Special),
                    identified = summary.count(Bin::Identified),
                    retries = summary.retries,
                    "sorting run finished"
                );
            }
            Err(e) => error!(error = %e, state = ?self.state, "run aborted, suction off"),
        }

        result
    }

    /// Home, bring the head to the front, wait for the tool head
    fn setup(&mut self) -> Result<(), RunError> {
        self.state = CycleState::AwaitingHome;

        self.wait_for_press("press once to home the machine");
        self.motion.home()?;
        self.advance(Event::HomeComplete);
        self.motion.pause(self.pause_ms, "after homing");
        self.advance(Event::Settled);

        self.wait_for_press("press again to position the tool head");
        let front = self.motion_config.front;
        self.motion.move_to(MotionRequest::x(front.x))?;
        self.motion.pause(self.pause_ms, "after moving to front");
        self.motion.move_to(MotionRequest::z(front.z))?;
        self.advance(Event::AttachPositionReached);
        self.motion.pause(self.pause_ms, "after lowering bed");
        self.advance(Event::Settled);

        self.wait_for_press("attach the tool head and press the button");
        self.advance(Event::AttachConfirmed);
        info!("tool head confirmed, beginning sort cycles");
        Ok(())
    }

    fn sort(&mut self, cycles: NonZeroU32) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();

        for i in 0..cycles.get() {
            info!(cycle = i + 1, of = cycles.get(), "sort cycle");
            self.cycle(&mut summary)?;
            summary.cycles += 1;
            if i + 1 < cycles.get() {
                self.advance(Event::CycleComplete);
            }
        }

        Ok(summary)
    }

    /// One pick, read, route, drop, re-home pass
    fn cycle(&mut self, summary: &mut RunSummary) -> Result<(), RunError> {
        let stack = self.motion_config.input_stack;
        self.motion.move_to(MotionRequest {
            target_x: Some(stack.x),
            target_y: Some(stack.y),
            target_z: Some(self.motion_config.safe_z),
        })?;
        self.motion.pause(self.pause_ms, "above input stack");

        let report = self.descent.descend_until_contact(
            &mut self.motion,
            &mut self.sensor,
            self.descent_config.step_mm,
            self.descent_config.max_travel_mm,
        )?;
        debug!(steps = report.steps, traveled_mm = report.traveled_mm, "on stack");
        self.motion.pause(self.pause_ms, "after contact");

        debug_assert!(self.state.suction_allowed());
        self.suction.on();
        self.motion.pause(self.pause_ms, "after suction on");

        let label = self.classify_with_retry(summary);
        let classification = label.as_ref().map(|l| l.as_str());
        match classification {
            Some(name) => info!(card = name, "card identified"),
            None => warn!("classification failed twice, treating card as unknown"),
        }

        let bin = self.routing.bin_for(classification);
        let dest = self.routing.destination(bin);
        info!(bin = bin.name(), x = dest.x, y = dest.y, z = dest.z, "routing card");

        // Clear of the stack laterally before changing height
        self.motion.move_to(dest.lateral())?;
        self.motion.pause(self.pause_ms, "after lateral travel");
        self.motion.move_to(dest.vertical())?;
        self.motion.pause(self.pause_ms, "after final z");

        self.suction.off();
        summary.record(bin);
        self.motion.pause(self.pause_ms, "after drop");

        self.motion.home()?;
        self.motion.pause(self.pause_ms, "after re-home");
        Ok(())
    }

    /// Capture and classify, retrying once on a failed read
    fn classify_with_retry(&mut self, summary: &mut RunSummary) -> Option<Label> {
        if let Some(label) = self.classify_once() {
            return Some(label);
        }

        warn!("classification failed, retrying once");
        summary.retries += 1;
        self.motion.pause(self.pause_ms, "retry classification");
        self.classify_once()
    }

    /// One attempt; no frame or an empty label counts as a failure
    fn classify_once(&mut self) -> Option<Label> {
        let frame = self.vision.capture()?;
        self.vision.classify(&frame).filter(|label| !label.is_empty())
    }

    /// Block until the operator presses the button
    ///
    /// Needs a release first, so a button still held from the previous
    /// gate does not count. No timeout.
    fn wait_for_press(&mut self, prompt: &str) {
        info!("waiting for button: {}", prompt);

        let mut released = false;
        loop {
            let pressed = self.sensor.is_pressed();
            if !pressed {
                released = true;
            } else if released {
                break;
            }
            self.motion.pause(self.button_poll_ms, "button poll");
        }

        info!("button pressed");
    }

    fn advance(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            debug!(from = ?self.state, to = ?next, ?event, "state change");
        }
        self.state = next;
    }
}
