//! Blocking delay for the host
//!
//! Every wait in a run (settle, polling, fan spin) goes through
//! `embedded_hal::delay::DelayNs`, so tests can swap in a fake clock.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// Delay backed by `thread::sleep` on the control thread
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        if ms > 0 {
            thread::sleep(Duration::from_millis(ms as u64));
        }
    }
}
