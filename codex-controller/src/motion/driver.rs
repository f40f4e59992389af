//! Motion driver
//!
//! The stage only takes relative jogs and never reports where it is, so the
//! driver keeps the position belief and turns absolute requests into deltas
//! against it. The belief advances only after the stage accepted a jog.
//!
//! There is no motion-complete signal either. Every home and every jog that
//! was actually sent is followed by a fixed settle wait.

use codex_core::config::TimingConfig;
use codex_core::motion::{MotionError, MotionRequest, Position, PositionTracker};
use codex_core::traits::StageClient;
use embedded_hal::delay::DelayNs;
use tracing::{debug, error, info};

/// Absolute-position driver for a relative-jog stage
pub struct MotionDriver<S, D> {
    /// Stage client
    stage: S,
    /// Position belief
    tracker: PositionTracker,
    /// Blocking delay for settle waits
    delay: D,
    /// Where the head goes right after a firmware home
    post_home: Position,
    /// Wait after the firmware home command
    home_settle_ms: u32,
    /// Wait after every sent jog
    move_settle_ms: u32,
}

impl<S: StageClient, D: DelayNs> MotionDriver<S, D> {
    /// Create a driver; belief starts at firmware zero
    pub fn new(stage: S, delay: D, post_home: Position, timing: &TimingConfig) -> Self {
        Self {
            stage,
            tracker: PositionTracker::new(),
            delay,
            post_home,
            home_settle_ms: timing.home_settle_ms,
            move_settle_ms: timing.move_settle_ms,
        }
    }

    /// Believed head position
    pub fn position(&self) -> Position {
        self.tracker.current()
    }

    /// Post-home offset this driver synchronizes to
    pub fn post_home(&self) -> Position {
        self.post_home
    }

    /// Move to an absolute position; absent axes stay put
    ///
    /// A request that works out to no motion is not sent. On a failed send
    /// the belief is left untouched.
    pub fn move_to(&mut self, request: MotionRequest) -> Result<(), MotionError> {
        if !request.is_finite() {
            error!(?request, "non-finite target, nothing sent");
            return Err(MotionError::NonFiniteTarget);
        }

        let current = self.tracker.current();
        let delta = request.delta_from(current);

        if delta.is_negligible() {
            debug!(?request, "already in position, nothing sent");
            return Ok(());
        }

        debug!(dx = delta.dx, dy = delta.dy, dz = delta.dz, "jog");
        if let Err(e) = self.stage.jog(delta.dx, delta.dy, delta.dz) {
            error!(error = %e, dx = delta.dx, dy = delta.dy, dz = delta.dz, "jog failed");
            return Err(MotionError::SendFailed(e));
        }

        self.tracker.apply(delta.dx, delta.dy, delta.dz);
        self.settle(self.move_settle_ms);
        Ok(())
    }

    /// Home the stage and move to the post-home offset
    ///
    /// Firmware homing puts the head at firmware zero, so the belief is
    /// reset there before the post-home move. Afterwards the belief equals
    /// the post-home offset whatever it was before.
    pub fn home(&mut self) -> Result<(), MotionError> {
        info!("homing stage");
        if let Err(e) = self.stage.home() {
            error!(error = %e, "home failed");
            return Err(MotionError::SendFailed(e));
        }

        self.tracker.reset();
        self.settle(self.home_settle_ms);
        self.move_to(MotionRequest::to(self.post_home))?;

        debug!(position = ?self.tracker.current(), "homed");
        Ok(())
    }

    /// Fixed wait between phases
    pub fn pause(&mut self, ms: u32, reason: &str) {
        if ms > 0 {
            debug!(ms, reason, "pause");
            self.delay.delay_ms(ms);
        }
    }

    /// Delay shared by everything driven from this thread
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    fn settle(&mut self, ms: u32) {
        if ms > 0 {
            debug!(ms, "settle");
            self.delay.delay_ms(ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{approx, FakeStage, RecordingDelay, StageCall};
    use codex_core::traits::StageError;
    use proptest::prelude::*;

    const POST_HOME: Position = Position::new(180.0, 20.0, 40.0);

    fn timing() -> TimingConfig {
        TimingConfig {
            home_settle_ms: 2000,
            move_settle_ms: 100,
            ..TimingConfig::instant()
        }
    }

    fn driver(stage: FakeStage) -> MotionDriver<FakeStage, RecordingDelay> {
        MotionDriver::new(stage, RecordingDelay::default(), POST_HOME, &timing())
    }

    #[test]
    fn test_move_sends_delta_and_tracks() {
        let mut d = driver(FakeStage::new());
        d.move_to(MotionRequest::to(Position::new(10.0, 5.0, 2.0)))
            .unwrap();
        d.move_to(MotionRequest::x(4.0)).unwrap();

        assert_eq!(d.stage().jogs(), vec![(10.0, 5.0, 2.0), (-6.0, 0.0, 0.0)]);
        assert_eq!(d.position(), Position::new(4.0, 5.0, 2.0));
    }

    #[test]
    fn test_empty_request_sends_nothing() {
        let mut d = driver(FakeStage::new());
        d.move_to(MotionRequest::x(12.0)).unwrap();
        let before = d.position();

        d.move_to(MotionRequest::default()).unwrap();
        assert_eq!(d.stage().calls.len(), 1);
        assert_eq!(d.position(), before);
    }

    #[test]
    fn test_move_to_current_position_sends_nothing() {
        let mut d = driver(FakeStage::new());
        d.move_to(MotionRequest::z(0.0)).unwrap();
        assert!(d.stage().calls.is_empty());
        assert_eq!(d.delay_mut().calls, 0);
    }

    #[test]
    fn test_failed_send_keeps_belief() {
        let mut d = driver(FakeStage::failing_jog(1));
        d.move_to(MotionRequest::x(10.0)).unwrap();

        let err = d.move_to(MotionRequest::x(50.0)).unwrap_err();
        assert_eq!(err, MotionError::SendFailed(StageError::Rejected));
        assert_eq!(d.position(), Position::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_non_finite_target_rejected() {
        let mut d = driver(FakeStage::new());
        d.move_to(MotionRequest::x(10.0)).unwrap();

        for request in [
            MotionRequest::z(f64::NAN),
            MotionRequest::xy(f64::INFINITY, 0.0),
        ] {
            assert_eq!(d.move_to(request), Err(MotionError::NonFiniteTarget));
        }
        assert_eq!(d.stage().calls.len(), 1);
        assert_eq!(d.position(), Position::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_home_reaches_post_home_offset() {
        let mut d = driver(FakeStage::new());
        d.home().unwrap();
        assert_eq!(d.position(), POST_HOME);
        assert_eq!(
            d.stage().calls,
            vec![StageCall::Home, StageCall::Jog(180.0, 20.0, 40.0)]
        );
    }

    #[test]
    fn test_home_from_anywhere() {
        let mut d = driver(FakeStage::new());
        d.home().unwrap();
        d.move_to(MotionRequest::to(Position::new(-33.0, 250.0, 4.5)))
            .unwrap();

        d.home().unwrap();
        assert_eq!(d.position(), POST_HOME);
        assert_eq!(d.stage().homes(), 2);
        // Second post-home jog starts from firmware zero again
        assert_eq!(d.stage().jogs().last(), Some(&(180.0, 20.0, 40.0)));
    }

    #[test]
    fn test_failed_home_sends_no_jog() {
        let mut stage = FakeStage::new();
        stage.fail_home = true;
        let mut d = driver(stage);

        assert_eq!(
            d.home(),
            Err(MotionError::SendFailed(StageError::Communication))
        );
        assert!(d.stage().calls.is_empty());
        assert_eq!(d.position(), Position::ORIGIN);
    }

    #[test]
    fn test_settle_waits() {
        let mut d = driver(FakeStage::new());
        d.home().unwrap();
        assert_eq!(d.delay_mut().total_ms(), 2100);

        // Not sent, no settle
        d.move_to(MotionRequest::to(POST_HOME)).unwrap();
        assert_eq!(d.delay_mut().total_ms(), 2100);

        d.move_to(MotionRequest::z(50.0)).unwrap();
        assert_eq!(d.delay_mut().total_ms(), 2200);
    }

    #[test]
    fn test_pause_zero_does_not_wait() {
        let mut d = driver(FakeStage::new());
        d.pause(0, "nothing");
        assert_eq!(d.delay_mut().calls, 0);
        d.pause(8000, "phase");
        assert_eq!(d.delay_mut().total_ms(), 8000);
    }

    fn request() -> impl Strategy<Value = MotionRequest> {
        let axis = || prop::option::of(-300.0f64..300.0);
        (axis(), axis(), axis()).prop_map(|(x, y, z)| MotionRequest {
            target_x: x,
            target_y: y,
            target_z: z,
        })
    }

    proptest! {
        #[test]
        fn prop_belief_matches_sent_jogs(requests in prop::collection::vec(request(), 0..24)) {
            let mut d = driver(FakeStage::new());
            d.home().unwrap();

            let mut expected = POST_HOME;
            for r in &requests {
                d.move_to(*r).unwrap();
                expected = Position::new(
                    r.target_x.unwrap_or(expected.x),
                    r.target_y.unwrap_or(expected.y),
                    r.target_z.unwrap_or(expected.z),
                );
            }

            let p = d.position();
            prop_assert!(approx(p.x, expected.x));
            prop_assert!(approx(p.y, expected.y));
            prop_assert!(approx(p.z, expected.z));

            // Belief is post-home offset plus every jog the stage accepted
            let (mut sx, mut sy, mut sz) = (0.0, 0.0, 0.0);
            for (dx, dy, dz) in d.stage().jogs() {
                sx += dx;
                sy += dy;
                sz += dz;
            }
            prop_assert!(approx(p.x, sx));
            prop_assert!(approx(p.y, sy));
            prop_assert!(approx(p.z, sz));
        }
    }
}
