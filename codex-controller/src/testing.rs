//! Fake collaborators for controller tests

use std::collections::VecDeque;

use codex_core::traits::{
    ContactSensor, Label, StageClient, StageError, SuctionActuator, VisionClassifier,
};
use embedded_hal::delay::DelayNs;

/// Stage command as seen by the fake
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageCall {
    Home,
    Jog(f64, f64, f64),
}

/// Stage that records commands and can be told to fail
#[derive(Debug, Default)]
pub struct FakeStage {
    pub calls: Vec<StageCall>,
    /// Fail the jog with this zero-based index
    pub fail_jog: Option<usize>,
    pub fail_home: bool,
    jogs: usize,
}

impl FakeStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_jog(index: usize) -> Self {
        Self {
            fail_jog: Some(index),
            ..Self::default()
        }
    }

    pub fn jogs(&self) -> Vec<(f64, f64, f64)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                StageCall::Jog(dx, dy, dz) => Some((*dx, *dy, *dz)),
                StageCall::Home => None,
            })
            .collect()
    }

    pub fn homes(&self) -> usize {
        self.calls.iter().filter(|c| **c == StageCall::Home).count()
    }
}

impl StageClient for FakeStage {
    fn home(&mut self) -> Result<(), StageError> {
        if self.fail_home {
            return Err(StageError::Communication);
        }
        self.calls.push(StageCall::Home);
        Ok(())
    }

    fn jog(&mut self, dx: f64, dy: f64, dz: f64) -> Result<(), StageError> {
        let index = self.jogs;
        self.jogs += 1;
        if self.fail_jog == Some(index) {
            return Err(StageError::Rejected);
        }
        self.calls.push(StageCall::Jog(dx, dy, dz));
        Ok(())
    }
}

/// Sensor that plays back readings, then repeats a fallback
#[derive(Debug)]
pub struct ScriptedSensor {
    readings: VecDeque<bool>,
    fallback: bool,
    pub polls: usize,
}

impl ScriptedSensor {
    pub fn new(readings: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            fallback,
            polls: 0,
        }
    }

    /// Never pressed
    pub fn open() -> Self {
        Self::new([], false)
    }

    /// Always pressed
    pub fn closed() -> Self {
        Self::new([], true)
    }

    /// Three operator presses, each as a release then a press
    pub fn setup_presses() -> Vec<bool> {
        [false, true].repeat(3)
    }

    /// Open for `steps` polls, then closed once
    pub fn contact_after(steps: usize) -> Vec<bool> {
        let mut readings = vec![false; steps];
        readings.push(true);
        readings
    }
}

impl ContactSensor for ScriptedSensor {
    fn is_pressed(&mut self) -> bool {
        self.polls += 1;
        self.readings.pop_front().unwrap_or(self.fallback)
    }
}

/// Suction that logs every switch
#[derive(Debug, Default)]
pub struct FakeSuction {
    pub on: bool,
    pub log: Vec<bool>,
}

impl SuctionActuator for FakeSuction {
    fn on(&mut self) {
        self.on = true;
        self.log.push(true);
    }

    fn off(&mut self) {
        self.on = false;
        self.log.push(false);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// Vision that plays back classification results
///
/// `None` in the script is a failed read; an exhausted script keeps failing.
#[derive(Debug, Default)]
pub struct ScriptedVision {
    results: VecDeque<Option<&'static str>>,
    pub captures: usize,
    pub classifications: usize,
    /// Capture returns no frame for this many calls
    pub dead_frames: usize,
}

impl ScriptedVision {
    pub fn new(results: impl IntoIterator<Item = Option<&'static str>>) -> Self {
        Self {
            results: results.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl VisionClassifier for ScriptedVision {
    type Frame = usize;

    fn capture(&mut self) -> Option<usize> {
        self.captures += 1;
        if self.dead_frames > 0 {
            self.dead_frames -= 1;
            return None;
        }
        Some(self.captures)
    }

    fn classify(&mut self, _frame: &usize) -> Option<Label> {
        self.classifications += 1;
        let name = self.results.pop_front().flatten()?;
        let mut label = Label::new();
        label.push_str(name).ok()?;
        Some(label)
    }
}

/// Delay that adds up requested time without sleeping
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
    pub calls: usize,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.calls += 1;
    }
}

/// Float comparison for accumulated positions
pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
