use std::time::Duration;

use cadence_core::{TimeIncrement, whole_steps};
use tracing::{debug, trace, warn};

use crate::{ConfigError, DrainPolicy, Playback};

/// Whether a [`Transport`] is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Stopped,
    Running,
}

/// Play/pause/reset/scrub controls over a timeline of evenly spaced positions.
///
/// The timeline has `num_steps = floor(time_end / fixed_step) + 1` positions.
/// Position `k` corresponds to time `k * fixed_step`. While running, each
/// [`tick`](Self::tick) accumulates the elapsed time since the previous tick
/// and advances the position when a full fixed step has accumulated. Playback
/// stops on its own at the final position.
///
/// Timestamps passed to `tick` are offsets from any fixed origin, typically
/// an [`Instant`](std::time::Instant) captured by the host at startup.
#[derive(Debug)]
pub struct Transport<P> {
    fixed_step: Duration,
    step_seconds: f64,
    num_steps: usize,
    position: usize,
    accumulator: Duration,
    prev_time: Option<Duration>,
    state: State,
    policy: DrainPolicy,
    playback: P,
}

impl<P: Playback> Transport<P> {
    /// Creates a stopped transport at position zero.
    ///
    /// # Errors
    ///
    /// Returns an error if `fixed_step` is not a finite positive number of at
    /// least one nanosecond, or if `time_end` is negative or not finite.
    pub fn new(time_end: f64, fixed_step: f64, playback: P) -> Result<Self, ConfigError> {
        let step = TimeIncrement::from_seconds(fixed_step)?;
        if !time_end.is_finite() || time_end < 0.0 {
            return Err(ConfigError::TimeEnd(time_end));
        }
        let duration = step.as_duration();
        if duration.is_zero() {
            return Err(ConfigError::BelowResolution(fixed_step));
        }

        Ok(Self {
            fixed_step: duration,
            step_seconds: step.seconds(),
            num_steps: whole_steps(time_end, fixed_step) + 1,
            position: 0,
            accumulator: Duration::ZERO,
            prev_time: None,
            state: State::Stopped,
            policy: DrainPolicy::default(),
            playback,
        })
    }

    /// Sets how accumulated time is converted into positions.
    #[must_use]
    pub fn with_policy(mut self, policy: DrainPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Starts playback from the current position.
    ///
    /// The accumulator is cleared and the next tick measures no elapsed time.
    pub fn start(&mut self) {
        self.accumulator = Duration::ZERO;
        self.prev_time = None;
        self.state = State::Running;
        debug!(position = self.position, "transport started");
    }

    /// Pauses playback, discarding any partial progress toward the next
    /// position.
    pub fn stop(&mut self) {
        self.state = State::Stopped;
        self.accumulator = Duration::ZERO;
        debug!(position = self.position, "transport stopped");
    }

    /// Processes one frame at timestamp `now`.
    ///
    /// Stops if already at the final position. Otherwise, while running,
    /// accumulates the time since the previous tick and advances according to
    /// the [`DrainPolicy`]. The playback is notified with the current time on
    /// every call, running or not.
    pub fn tick(&mut self, now: Duration) {
        let dt = match self.prev_time {
            Some(prev) if now < prev => {
                warn!(?now, ?prev, "timestamp went backwards, treating as zero");
                Duration::ZERO
            }
            Some(prev) => now - prev,
            None => Duration::ZERO,
        };
        self.prev_time = Some(now);

        if self.is_running() && self.position == self.last_position() {
            self.stop();
        }

        if self.is_running() {
            self.accumulator += dt;
            match self.policy {
                DrainPolicy::SingleStep => {
                    if self.accumulator >= self.fixed_step {
                        self.step_forward();
                    }
                }
                DrainPolicy::CatchUp => {
                    while self.accumulator >= self.fixed_step
                        && self.position < self.last_position()
                    {
                        self.step_forward();
                    }
                }
            }
        }

        self.notify();
    }

    /// Returns the position the next advance moves to, wrapping to zero after
    /// the final position.
    #[must_use]
    pub fn next_value(&self) -> usize {
        (self.position + 1) % self.num_steps
    }

    /// Play/pause toggle.
    ///
    /// A stopped transport first seeks to [`next_value`](Self::next_value) so
    /// the first visible frame is the one about to be played, notifies the
    /// playback, and then starts.
    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.seek(self.next_value());
            self.notify();
            self.start();
        }
    }

    /// Moves directly to `position`, clamped to the final position, and
    /// notifies the playback.
    pub fn scrub(&mut self, position: usize) {
        let clamped = position.min(self.last_position());
        if clamped != position {
            warn!(position, clamped, "scrub position out of range");
        }
        self.seek(clamped);
        self.notify();
    }

    /// Stops playback, returns to position zero, notifies the playback with
    /// time zero, and then resets it.
    pub fn reset(&mut self) {
        if self.is_running() {
            self.stop();
        }
        self.seek(0);
        self.notify();
        self.playback.reset();
        debug!("transport reset");
    }

    /// Returns the read-out for the current position, in seconds with two
    /// decimals.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:.2}", self.position_time())
    }

    /// Returns the time reported to the playback: the current position's time
    /// plus any accumulated partial step.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.position_time() + self.accumulator.as_secs_f64()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    #[must_use]
    pub fn last_position(&self) -> usize {
        self.num_steps - 1
    }

    #[must_use]
    pub fn fixed_step(&self) -> Duration {
        self.fixed_step
    }

    #[must_use]
    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    #[must_use]
    pub fn policy(&self) -> DrainPolicy {
        self.policy
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut P {
        &mut self.playback
    }

    pub fn into_playback(self) -> P {
        self.playback
    }

    fn step_forward(&mut self) {
        self.seek(self.next_value());
        self.accumulator -= self.fixed_step;
    }

    fn seek(&mut self, position: usize) {
        self.position = position;
        trace!(position, "seek");
    }

    fn notify(&mut self) {
        let time = self.time();
        self.playback.update(time);
    }

    #[allow(clippy::cast_precision_loss)]
    fn position_time(&self) -> f64 {
        self.position as f64 * self.step_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[derive(Debug, Default)]
    struct Recorder {
        updates: Vec<f64>,
        resets: usize,
    }

    impl Playback for Recorder {
        fn update(&mut self, time: f64) {
            self.updates.push(time);
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    fn transport(time_end: f64, fixed_step: f64) -> Transport<Recorder> {
        Transport::new(time_end, fixed_step, Recorder::default()).unwrap()
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn num_steps_includes_both_ends() {
        assert_eq!(transport(1.0, 0.25).num_steps(), 5);
        assert_eq!(transport(10.0, 0.1).num_steps(), 101);
        assert_eq!(transport(0.0, 0.1).num_steps(), 1);
        assert_eq!(transport(1.1, 0.5).num_steps(), 3);
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(
            Transport::new(1.0, 0.0, ()),
            Err(ConfigError::FixedStep(_))
        ));
        assert!(matches!(
            Transport::new(1.0, -0.5, ()),
            Err(ConfigError::FixedStep(_))
        ));
        assert!(matches!(
            Transport::new(-1.0, 0.1, ()),
            Err(ConfigError::TimeEnd(_))
        ));
        assert!(matches!(
            Transport::new(f64::NAN, 0.1, ()),
            Err(ConfigError::TimeEnd(_))
        ));
        assert!(matches!(
            Transport::new(1.0, 1e-12, ()),
            Err(ConfigError::BelowResolution(_))
        ));
    }

    #[test]
    fn first_tick_after_start_measures_nothing() {
        let mut t = transport(1.0, 0.25);
        t.start();
        t.tick(ms(5_000));

        assert_eq!(t.position(), 0);
        assert_eq!(t.accumulator(), Duration::ZERO);
        assert_eq!(t.playback().updates, vec![0.0]);
    }

    #[test]
    fn advances_one_position_per_fixed_step() {
        let mut t = transport(1.0, 0.25);
        t.start();
        t.tick(ms(0));
        t.tick(ms(100));
        assert_eq!(t.position(), 0);
        t.tick(ms(250));
        assert_eq!(t.position(), 1);
        t.tick(ms(600));
        assert_eq!(t.position(), 2);
        assert_eq!(t.accumulator(), ms(100));

        let updates = &t.playback().updates;
        assert_eq!(updates.len(), 4);
        assert_relative_eq!(updates[1], 0.1);
        assert_relative_eq!(updates[2], 0.25);
        assert_relative_eq!(updates[3], 0.6);
    }

    #[test]
    fn single_step_policy_lags_after_a_stall() {
        let mut t = transport(10.0, 0.1);
        t.start();
        t.tick(ms(0));
        t.tick(ms(1_000));

        assert_eq!(t.position(), 1);
        assert_eq!(t.accumulator(), ms(900));
    }

    #[test]
    fn catch_up_policy_drains_whole_steps() {
        let mut t = transport(10.0, 0.1).with_policy(DrainPolicy::CatchUp);
        t.start();
        t.tick(ms(0));
        t.tick(ms(1_050));

        assert_eq!(t.position(), 10);
        assert_eq!(t.accumulator(), ms(50));
    }

    #[test]
    fn catch_up_stops_advancing_at_the_final_position() {
        let mut t = transport(0.5, 0.1).with_policy(DrainPolicy::CatchUp);
        t.start();
        t.tick(ms(0));
        t.tick(ms(5_000));
        assert_eq!(t.position(), 5);

        t.tick(ms(5_100));
        assert_eq!(t.state(), State::Stopped);
        assert_eq!(t.position(), 5);
    }

    #[test]
    fn auto_stops_at_the_final_position() {
        let mut t = transport(0.5, 0.25);
        t.start();
        for k in 0..=3 {
            t.tick(ms(250 * k));
        }
        assert_eq!(t.position(), 2);
        assert_eq!(t.state(), State::Stopped);
        assert_eq!(t.accumulator(), Duration::ZERO);
    }

    #[test]
    fn stopped_transport_still_notifies() {
        let mut t = transport(1.0, 0.25);
        t.tick(ms(0));
        t.tick(ms(1_000));

        assert_eq!(t.position(), 0);
        assert_eq!(t.playback().updates, vec![0.0, 0.0]);
    }

    #[test]
    fn stop_discards_partial_progress() {
        let mut t = transport(1.0, 0.25);
        t.start();
        t.tick(ms(0));
        t.tick(ms(200));
        assert_eq!(t.accumulator(), ms(200));

        t.stop();
        assert_eq!(t.accumulator(), Duration::ZERO);
        assert!(!t.is_running());
    }

    #[test]
    fn toggle_pre_advances_before_starting() {
        let mut t = transport(1.0, 0.25);
        t.toggle();

        assert!(t.is_running());
        assert_eq!(t.position(), 1);
        assert_eq!(t.playback().updates, vec![0.25]);

        t.toggle();
        assert!(!t.is_running());
        assert_eq!(t.position(), 1);
    }

    #[test]
    fn toggle_from_the_final_position_wraps_to_zero() {
        let mut t = transport(0.5, 0.25);
        t.scrub(2);
        t.toggle();
        assert_eq!(t.position(), 0);
        assert!(t.is_running());
    }

    #[test]
    fn next_value_wraps() {
        let mut t = transport(0.5, 0.25);
        assert_eq!(t.next_value(), 1);
        t.scrub(2);
        assert_eq!(t.next_value(), 0);
    }

    #[test]
    fn scrub_notifies_and_clamps() {
        let mut t = transport(1.0, 0.25);
        t.scrub(3);
        assert_eq!(t.position(), 3);
        assert_eq!(t.label(), "0.75");

        t.scrub(99);
        assert_eq!(t.position(), 4);
        assert_eq!(t.playback().updates, vec![0.75, 1.0]);
    }

    #[test]
    fn reset_stops_seeks_notifies_then_resets_playback() {
        let mut t = transport(1.0, 0.25);
        t.toggle();
        t.tick(ms(0));
        t.tick(ms(250));
        assert_eq!(t.position(), 2);

        t.reset();

        assert_eq!(t.state(), State::Stopped);
        assert_eq!(t.position(), 0);
        assert_eq!(t.playback().resets, 1);
        assert_eq!(t.playback().updates.last(), Some(&0.0));
    }

    #[test]
    fn reset_while_stopped_keeps_state() {
        let mut t = transport(1.0, 0.25);
        t.scrub(2);
        t.reset();
        assert_eq!(t.state(), State::Stopped);
        assert_eq!(t.position(), 0);
    }

    #[test]
    fn backwards_timestamp_is_ignored() {
        let mut t = transport(1.0, 0.25);
        t.start();
        t.tick(ms(500));
        t.tick(ms(400));
        assert_eq!(t.accumulator(), Duration::ZERO);
        t.tick(ms(650));
        assert_eq!(t.position(), 1);
    }

    #[test]
    fn label_uses_two_decimals() {
        let mut t = transport(2.0, 0.1);
        t.scrub(13);
        assert_eq!(t.label(), "1.30");
    }
}
