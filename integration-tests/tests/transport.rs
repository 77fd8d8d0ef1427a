use std::time::Duration;

use approx::assert_relative_eq;
use cadence_player::{DrainPolicy, Playback, State, Transport};
use cadence_wmr::{ClosedForm, WmrConfig};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Poses a closed-form robot at each reported time.
struct Posed {
    model: ClosedForm,
    times: Vec<f64>,
}

impl Playback for Posed {
    fn update(&mut self, time: f64) {
        self.model.evaluate(time);
        self.times.push(time);
    }

    fn reset(&mut self) {
        self.model.reset();
        self.times.clear();
    }
}

fn posed() -> Posed {
    let config = WmrConfig::default();
    Posed {
        model: ClosedForm::new(
            config.robot().unwrap(),
            config.initial_position,
            config.angular_velocity,
        ),
        times: Vec::new(),
    }
}

#[test]
fn playback_visits_every_position_once_then_stops() {
    let mut transport = Transport::new(1.0, 0.1, posed()).unwrap();
    assert_eq!(transport.num_steps(), 11);

    transport.start();
    let mut visited = Vec::new();
    for frame in 0..=15 {
        transport.tick(ms(frame * 100));
        if visited.last() != Some(&transport.position()) {
            visited.push(transport.position());
        }
    }

    assert_eq!(visited, (0..=10).collect::<Vec<_>>());
    assert_eq!(transport.state(), State::Stopped);
    assert_eq!(transport.label(), "1.00");

    let playback = transport.into_playback();
    assert_relative_eq!(playback.model.layout().location(), 4.0, epsilon = 1e-12);
}

#[test]
fn frame_rate_does_not_change_the_path() {
    let mut fast = Transport::new(1.0, 0.1, posed()).unwrap();
    let mut slow = Transport::new(1.0, 0.1, posed()).unwrap();
    fast.start();
    slow.start();

    let mut fast_positions = Vec::new();
    for frame in 0..=120 {
        fast.tick(ms(frame * 10));
        if fast_positions.last() != Some(&fast.position()) {
            fast_positions.push(fast.position());
        }
    }
    let mut slow_positions = Vec::new();
    for frame in 0..=12 {
        slow.tick(ms(frame * 100));
        if slow_positions.last() != Some(&slow.position()) {
            slow_positions.push(slow.position());
        }
    }

    assert_eq!(fast_positions, slow_positions);
    assert!(!fast.is_running());
    assert!(!slow.is_running());
}

#[test]
fn single_step_lags_after_a_stall_and_catch_up_does_not() {
    let mut single = Transport::new(10.0, 0.1, ()).unwrap();
    let mut catch_up = Transport::new(10.0, 0.1, ())
        .unwrap()
        .with_policy(DrainPolicy::CatchUp);

    for transport in [&mut single, &mut catch_up] {
        transport.start();
        transport.tick(ms(0));
        transport.tick(ms(500));
    }

    assert_eq!(single.position(), 1);
    assert!(single.accumulator() >= single.fixed_step());
    assert_eq!(catch_up.position(), 5);
    assert!(catch_up.accumulator() < catch_up.fixed_step());
}

#[test]
fn scrub_then_reset_returns_the_robot_home() {
    let mut transport = Transport::new(2.0, 0.25, posed()).unwrap();

    transport.scrub(4);
    assert_eq!(transport.label(), "1.00");
    assert_relative_eq!(transport.playback().model.layout().location(), 4.0);

    transport.scrub(100);
    assert_eq!(transport.position(), transport.last_position());

    transport.reset();
    assert_eq!(transport.position(), 0);
    assert!(transport.playback().times.is_empty());
    assert_relative_eq!(transport.playback().model.layout().location(), 3.0);
}

#[test]
fn toggle_shows_the_next_frame_before_playing() {
    let mut transport = Transport::new(1.0, 0.5, posed()).unwrap();

    transport.toggle();
    assert!(transport.is_running());
    assert_eq!(transport.position(), 1);
    assert_eq!(transport.playback().times, vec![0.5]);

    transport.toggle();
    assert!(!transport.is_running());
    assert_eq!(transport.position(), 1);
}
